//! Repository behaviour against a real database: conditional updates report
//! exactly the rows they touched, and constraint-backed invariants hold.

use photomarket_core::notification::NotificationCategory;
use photomarket_core::trade::TradeStatus;
use photomarket_db::models::card::CreatePhotocard;
use photomarket_db::models::listing::CreateListing;
use photomarket_db::models::trade::CreateTradeProposal;
use photomarket_db::models::user::CreateUser;
use photomarket_db::repositories::{
    ListingRepo, NotificationRepo, PhotocardRepo, PointRepo, TradeRepo, UnitRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, nickname: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{nickname}@example.com"),
            nickname: nickname.to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();
    PointRepo::create_for_user(pool, user.id).await.unwrap();
    user.id
}

async fn new_card(pool: &PgPool, creator_id: i64, name: &str, units: i32) -> i64 {
    let card = PhotocardRepo::create(
        pool,
        &CreatePhotocard {
            creator_id,
            name: name.to_string(),
            description: None,
            image_url: None,
            grade: "RARE".to_string(),
            genre: "KPOP".to_string(),
            price: 100,
            total_issued: units,
        },
    )
    .await
    .unwrap();
    UnitRepo::issue(pool, card.id, creator_id, units).await.unwrap();
    card.id
}

async fn new_listing(pool: &PgPool, card_id: i64, seller_id: i64, count: i32) -> i64 {
    let listing = ListingRepo::create(
        pool,
        &CreateListing {
            photocard_id: card_id,
            seller_id,
            price: 100,
            total_count: count,
            trade_grade: "COMMON".to_string(),
            trade_genre: "KPOP".to_string(),
            trade_note: String::new(),
        },
    )
    .await
    .unwrap();
    let ids = UnitRepo::find_unlisted_ids(pool, card_id, seller_id, count as i64)
        .await
        .unwrap();
    UnitRepo::reserve(pool, &ids, listing.id).await.unwrap();
    listing.id
}

// ---------------------------------------------------------------------------
// Point ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deduct_never_overdraws(pool: PgPool) {
    let user = new_user(&pool, "buyer").await;
    PointRepo::add(&pool, user, 100).await.unwrap();

    let after = PointRepo::deduct(&pool, user, 60).await.unwrap().unwrap();
    assert_eq!(after.balance, 40);

    assert!(PointRepo::deduct(&pool, user, 41).await.unwrap().is_none());
    let ledger = PointRepo::find_by_user(&pool, user).await.unwrap().unwrap();
    assert_eq!(ledger.balance, 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_credit_respects_cooldown(pool: PgPool) {
    let user = new_user(&pool, "collector").await;

    let first = PointRepo::credit_if_cooled_down(&pool, user, 5, 60)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.balance, 5);
    assert!(first.last_grant_at.is_some());

    let second = PointRepo::credit_if_cooled_down(&pool, user, 5, 60).await.unwrap();
    assert!(second.is_none());

    sqlx::query("UPDATE point_ledgers SET last_grant_at = NOW() - INTERVAL '61 minutes'")
        .execute(&pool)
        .await
        .unwrap();
    let third = PointRepo::credit_if_cooled_down(&pool, user, 3, 60)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(third.balance, 8);
}

// ---------------------------------------------------------------------------
// Units and listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_issue_and_reserve_units(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let card = new_card(&pool, seller, "RM", 5).await;
    let listing = new_listing(&pool, card, seller, 3).await;

    assert_eq!(UnitRepo::count_listed(&pool, listing).await.unwrap(), 3);
    assert_eq!(UnitRepo::count_unlisted(&pool, card, seller).await.unwrap(), 2);

    // Reserving already-listed units is a no-op.
    let listed = UnitRepo::find_listed_ids(&pool, listing, 10, false).await.unwrap();
    assert_eq!(UnitRepo::reserve(&pool, &listed, listing).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transfer_listed_only_moves_listed_rows(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let first = new_user(&pool, "first").await;
    let second = new_user(&pool, "second").await;
    let card = new_card(&pool, seller, "Jin", 3).await;
    let listing = new_listing(&pool, card, seller, 3).await;

    let ids = UnitRepo::find_listed_ids(&pool, listing, 2, false).await.unwrap();
    assert_eq!(UnitRepo::transfer_listed(&pool, &ids, listing, first).await.unwrap(), 2);

    // The same ids are no longer listed: a racing buyer moves nothing.
    assert_eq!(UnitRepo::transfer_listed(&pool, &ids, listing, second).await.unwrap(), 0);

    assert_eq!(UnitRepo::count_listed(&pool, listing).await.unwrap(), 1);
    for id in &ids {
        let unit = UnitRepo::find_by_id(&pool, *id).await.unwrap().unwrap();
        assert_eq!(unit.owner_id, first);
        assert_eq!(unit.listing_id, None, "sold units leave the listing");
    }

    assert!(ListingRepo::record_sold(&pool, listing, 2).await.unwrap());
    let summary = ListingRepo::find_summary(&pool, listing).await.unwrap().unwrap();
    assert_eq!(summary.left_count, 1);
    assert_eq!(summary.sold_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_take_listed_requires_the_listing(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let requester = new_user(&pool, "requester").await;
    let card = new_card(&pool, seller, "RM", 2).await;
    let listing = new_listing(&pool, card, seller, 1).await;
    let listed = UnitRepo::first_listed(&pool, listing).await.unwrap().unwrap();

    assert!(!UnitRepo::take_listed(&pool, listed.id, listing + 1, seller, requester)
        .await
        .unwrap());
    assert!(UnitRepo::take_listed(&pool, listed.id, listing, seller, requester)
        .await
        .unwrap());
    assert!(!UnitRepo::take_listed(&pool, listed.id, listing, seller, requester)
        .await
        .unwrap());

    let unit = UnitRepo::find_by_id(&pool, listed.id).await.unwrap().unwrap();
    assert_eq!(unit.owner_id, requester);
    assert!(!unit.is_listed);
    assert_eq!(unit.listing_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sold_count_cannot_exceed_total(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let card = new_card(&pool, seller, "Jimin", 2).await;
    let listing = new_listing(&pool, card, seller, 2).await;

    assert!(ListingRepo::record_sold(&pool, listing, 2).await.unwrap());
    let err = ListingRepo::record_sold(&pool, listing, 1).await.unwrap_err();
    assert_eq!(
        err.as_database_error().unwrap().constraint(),
        Some("ck_listings_sold_count")
    );

    let summary = ListingRepo::find_summary(&pool, listing).await.unwrap().unwrap();
    assert_eq!(summary.left_count, 0);
    assert_eq!(summary.sold_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_all_and_delete_listing(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let card = new_card(&pool, seller, "Suga", 4).await;
    let listing = new_listing(&pool, card, seller, 4).await;

    assert_eq!(UnitRepo::release_all(&pool, listing).await.unwrap(), 4);
    assert!(ListingRepo::delete(&pool, listing).await.unwrap());
    assert!(ListingRepo::find_by_photocard(&pool, card).await.unwrap().is_none());
    assert_eq!(UnitRepo::count_unlisted(&pool, card, seller).await.unwrap(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_listing_per_card(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let card = new_card(&pool, seller, "V", 2).await;
    new_listing(&pool, card, seller, 1).await;

    let duplicate = ListingRepo::create(
        &pool,
        &CreateListing {
            photocard_id: card,
            seller_id: seller,
            price: 10,
            total_count: 1,
            trade_grade: "COMMON".to_string(),
            trade_genre: "KPOP".to_string(),
            trade_note: String::new(),
        },
    )
    .await;
    let err = duplicate.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_listings_photocard_id"));
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_pair_is_unique_until_resolved(pool: PgPool) {
    let seller = new_user(&pool, "seller").await;
    let requester = new_user(&pool, "requester").await;
    let target_card = new_card(&pool, seller, "Jimin", 1).await;
    let offered_card = new_card(&pool, requester, "Jungkook", 1).await;
    let listing = new_listing(&pool, target_card, seller, 1).await;

    let target = UnitRepo::first_listed(&pool, listing).await.unwrap().unwrap();
    let offered = UnitRepo::find_unlisted_ids(&pool, offered_card, requester, 1)
        .await
        .unwrap()[0];
    let input = CreateTradeProposal {
        requester_id: requester,
        offered_unit_id: offered,
        target_unit_id: target.id,
        content: "swap?".to_string(),
    };

    let trade = TradeRepo::create(&pool, &input).await.unwrap();
    assert!(TradeRepo::pending_exists(&pool, offered, target.id).await.unwrap());

    let err = TradeRepo::create(&pool, &input).await.unwrap_err();
    assert_eq!(
        err.as_database_error().unwrap().constraint(),
        Some("uq_trade_proposals_pending_pair")
    );

    assert!(TradeRepo::transition(&pool, trade.id, TradeStatus::Pending, TradeStatus::Rejected)
        .await
        .unwrap());
    assert!(!TradeRepo::transition(&pool, trade.id, TradeStatus::Pending, TradeStatus::Completed)
        .await
        .unwrap());

    // A rejected pair may be proposed again.
    TradeRepo::create(&pool, &input).await.unwrap();

    let history = TradeRepo::list_for_card(&pool, target_card).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].offered_card_name, "Jungkook");
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_flips_once(pool: PgPool) {
    let user = new_user(&pool, "reader").await;
    let other = new_user(&pool, "other").await;
    let n = NotificationRepo::create(&pool, user, NotificationCategory::Sold, "sold")
        .await
        .unwrap();
    NotificationRepo::create(&pool, user, NotificationCategory::SoldOut, "sold out")
        .await
        .unwrap();

    assert!(!NotificationRepo::mark_read(&pool, n.id, other).await.unwrap());
    assert!(NotificationRepo::mark_read(&pool, n.id, user).await.unwrap());
    assert!(!NotificationRepo::mark_read(&pool, n.id, user).await.unwrap());

    assert_eq!(NotificationRepo::count_for_user(&pool, user, true).await.unwrap(), 1);
    assert_eq!(NotificationRepo::mark_all_read(&pool, user).await.unwrap(), 1);
    assert_eq!(NotificationRepo::count_for_user(&pool, user, true).await.unwrap(), 0);
    assert_eq!(NotificationRepo::count_for_user(&pool, user, false).await.unwrap(), 2);
}
