//! Listing lifecycle and market feed.

mod common;

use assert_matches::assert_matches;
use common::*;
use photomarket_core::error::CoreError;
use photomarket_market::cards::{self, GalleryQuery};
use photomarket_market::listings::{self, ListingUpdate, MarketQuery, MyListingsQuery};
use photomarket_market::settlement::{self, PurchaseRequest};
use photomarket_market::trades::{self, NewProposal};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_reserves_lowest_units(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let photocard = card(&pool, seller, "RM", 100, 5).await;

    let summary = listing(&pool, seller, photocard.id, 3).await;
    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.left_count, 3);
    assert_eq!(summary.price, 100, "price defaults to the card's price");

    let units = units_of(&pool, photocard.id, seller).await;
    let listed: Vec<bool> = units.iter().map(|(_, l)| *l).collect();
    assert_eq!(listed, [true, true, true, false, false]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rules(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let stranger = user(&pool, "stranger", 0).await;
    let photocard = card(&pool, seller, "Jin", 100, 3).await;

    assert_matches!(
        core_err(listings::create_listing(&pool, seller, &new_listing(photocard.id, 4)).await),
        CoreError::Validation(_)
    );
    assert_matches!(
        core_err(listings::create_listing(&pool, seller, &new_listing(photocard.id, 0)).await),
        CoreError::Validation(_)
    );
    assert_matches!(
        core_err(listings::create_listing(&pool, stranger, &new_listing(photocard.id, 1)).await),
        CoreError::Forbidden(_)
    );

    listing(&pool, seller, photocard.id, 1).await;
    assert_matches!(
        core_err(listings::create_listing(&pool, seller, &new_listing(photocard.id, 1)).await),
        CoreError::AlreadyInTrade(_)
    );

    let mut bad_grade = new_listing(photocard.id, 1);
    bad_grade.trade_grade = "MYTHIC".to_string();
    assert_matches!(
        core_err(listings::create_listing(&pool, seller, &bad_grade).await),
        CoreError::Validation(_)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_grows_and_shrinks(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let buyer = user(&pool, "buyer", 1000).await;
    let photocard = card(&pool, seller, "Suga", 50, 6).await;
    let summary = listing(&pool, seller, photocard.id, 3).await;

    settlement::purchase(
        &pool,
        buyer,
        &PurchaseRequest {
            listing_id: summary.id,
            count: 1,
        },
    )
    .await
    .unwrap();

    // 2 listed, 1 sold, 3 unlisted: total 6 means 5 listed.
    let grown = listings::update_listing(
        &pool,
        seller,
        photocard.id,
        &ListingUpdate {
            total_count: Some(6),
            price: Some(70),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(grown.total_count, 6);
    assert_eq!(grown.left_count, 5);
    assert_eq!(grown.sold_count, 1);
    assert_eq!(grown.price, 70);

    let shrunk = listings::update_listing(
        &pool,
        seller,
        photocard.id,
        &ListingUpdate {
            total_count: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(shrunk.left_count, 1);
    assert_eq!(shrunk.price, 70, "absent fields are untouched");

    // Shrinking releases the highest ids first.
    let units = units_of(&pool, photocard.id, seller).await;
    let listed: Vec<i64> = units.iter().filter(|(_, l)| *l).map(|(id, _)| *id).collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], units[0].0);

    assert_matches!(
        core_err(
            listings::update_listing(
                &pool,
                seller,
                photocard.id,
                &ListingUpdate {
                    total_count: Some(0),
                    ..Default::default()
                },
            )
            .await
        ),
        CoreError::Validation(_)
    );
    assert_matches!(
        core_err(
            listings::update_listing(
                &pool,
                seller,
                photocard.id,
                &ListingUpdate {
                    total_count: Some(7),
                    ..Default::default()
                },
            )
            .await
        ),
        CoreError::Validation(_)
    );
}

/// A unit that leaves a listing by trade and later comes back to the seller
/// is ordinary unlisted stock; it must not change the listing's counts.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unit_traded_back_then_grow_keeps_counts(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let requester = user(&pool, "requester", 0).await;
    let photocard = card(&pool, seller, "V", 100, 5).await;
    let offered_card = card(&pool, requester, "Jungkook", 100, 1).await;
    let summary = listing(&pool, seller, photocard.id, 3).await;

    let offered_unit = units_of(&pool, offered_card.id, requester).await[0].0;
    let first = trades::propose(
        &pool,
        requester,
        summary.id,
        &NewProposal {
            offered_unit_id: offered_unit,
            content: None,
        },
    )
    .await
    .unwrap();
    trades::approve(&pool, seller, first.id).await.unwrap();
    let returned = first.target_unit_id;

    // The requester offers the traded unit back for the next listed one.
    let second = trades::propose(
        &pool,
        requester,
        summary.id,
        &NewProposal {
            offered_unit_id: returned,
            content: None,
        },
    )
    .await
    .unwrap();
    assert_ne!(second.target_unit_id, returned);
    trades::approve(&pool, seller, second.id).await.unwrap();
    assert!(units_of(&pool, photocard.id, seller).await.contains(&(returned, false)));

    let before = listings::get_listing(&pool, summary.id).await.unwrap();
    assert_eq!(before.left_count, 1);
    assert_eq!(before.sold_count, 2);

    let grown = listings::update_listing(
        &pool,
        seller,
        photocard.id,
        &ListingUpdate {
            total_count: Some(4),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let listed = units_of(&pool, photocard.id, seller)
        .await
        .iter()
        .filter(|(_, l)| *l)
        .count() as i64;
    assert_eq!(grown.total_count, 4);
    assert_eq!(grown.sold_count, 2);
    assert_eq!(grown.left_count, listed);
    assert_eq!(grown.left_count + grown.sold_count, i64::from(grown.total_count));
    assert!(
        units_of(&pool, photocard.id, seller).await.contains(&(returned, true)),
        "the returned unit is the lowest unlisted id and is reserved again"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_releases_units(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let photocard = card(&pool, seller, "V", 10, 4).await;
    let summary = listing(&pool, seller, photocard.id, 4).await;

    listings::remove_listing(&pool, seller, photocard.id).await.unwrap();

    let units = units_of(&pool, photocard.id, seller).await;
    assert!(units.iter().all(|(_, l)| !l));
    assert_matches!(
        core_err(listings::get_listing(&pool, summary.id).await),
        CoreError::NotFound { .. }
    );
    assert_matches!(
        core_err(listings::remove_listing(&pool, seller, photocard.id).await),
        CoreError::NotFound { .. }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_sold_out_listing_is_rejected(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let buyer = user(&pool, "buyer", 100).await;
    let photocard = card(&pool, seller, "Jimin", 10, 1).await;
    let summary = listing(&pool, seller, photocard.id, 1).await;
    settlement::purchase(
        &pool,
        buyer,
        &PurchaseRequest {
            listing_id: summary.id,
            count: 1,
        },
    )
    .await
    .unwrap();

    assert_matches!(
        core_err(listings::remove_listing(&pool, seller, photocard.id).await),
        CoreError::Validation(_)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_market_cursor_walks_every_listing_once(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let mut ids = Vec::new();
    for (i, price) in [300, 100, 200, 100, 500].into_iter().enumerate() {
        let photocard = card(&pool, seller, &format!("Card {i}"), price, 1).await;
        ids.push(listing(&pool, seller, photocard.id, 1).await.id);
    }

    let mut seen = Vec::new();
    let mut prices = Vec::new();
    let mut cursor = None;
    loop {
        let page = listings::get_market(
            &pool,
            &MarketQuery {
                cursor,
                take: Some(2),
                order_by: Some("price_asc".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(page.lists.len() <= 2);
        seen.extend(page.lists.iter().map(|l| l.id));
        prices.extend(page.lists.iter().map(|l| l.price));
        if !page.has_more {
            assert_eq!(page.next_cursor, None);
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(prices, [100, 100, 200, 300, 500]);
    let mut sorted = seen.clone();
    sorted.sort();
    ids.sort();
    assert_eq!(sorted, ids);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_market_filters_and_bad_cursor(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    let buyer = user(&pool, "buyer", 100).await;
    let first = card(&pool, seller, "Sold Out", 10, 1).await;
    let second = card(&pool, seller, "In Stock", 10, 1).await;
    let sold = listing(&pool, seller, first.id, 1).await;
    listing(&pool, seller, second.id, 1).await;
    settlement::purchase(
        &pool,
        buyer,
        &PurchaseRequest {
            listing_id: sold.id,
            count: 1,
        },
    )
    .await
    .unwrap();

    let sold_out = listings::get_market(
        &pool,
        &MarketQuery {
            is_sold_out: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(sold_out.lists.len(), 1);
    assert_eq!(sold_out.lists[0].name, "Sold Out");

    let by_keyword = listings::get_market(
        &pool,
        &MarketQuery {
            keyword: Some("stock".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_keyword.lists.len(), 1);

    assert_matches!(
        core_err(
            listings::get_market(
                &pool,
                &MarketQuery {
                    cursor: Some(9999),
                    ..Default::default()
                },
            )
            .await
        ),
        CoreError::Validation(_)
    );
    assert_matches!(
        core_err(
            listings::get_market(
                &pool,
                &MarketQuery {
                    keyword: Some("k".repeat(51)),
                    ..Default::default()
                },
            )
            .await
        ),
        CoreError::Validation(_)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_keyword_wildcards_match_literally(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    for name in ["100% Jimin", "Jimin_B", "Jimin"] {
        let photocard = card(&pool, seller, name, 10, 1).await;
        listing(&pool, seller, photocard.id, 1).await;
    }

    let market_names = |keyword: &str| {
        let pool = pool.clone();
        let keyword = keyword.to_string();
        async move {
            let page = listings::get_market(
                &pool,
                &MarketQuery {
                    keyword: Some(keyword),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            let mut names: Vec<String> = page.lists.into_iter().map(|l| l.name).collect();
            names.sort();
            names
        }
    };
    assert_eq!(market_names("%").await, ["100% Jimin"]);
    assert_eq!(market_names("_").await, ["Jimin_B"]);
    assert_eq!(market_names("jimin").await.len(), 3);

    let gallery = cards::get_gallery(
        &pool,
        seller,
        &GalleryQuery {
            keyword: Some("%".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(gallery.page.total, 1);
    assert_eq!(gallery.page.items[0].name, "100% Jimin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_my_listings_pages_with_grade_counts(pool: PgPool) {
    let seller = user(&pool, "seller", 0).await;
    for i in 0..3 {
        let photocard = card(&pool, seller, &format!("Mine {i}"), 10, 2).await;
        listing(&pool, seller, photocard.id, 1).await;
    }

    let page = listings::get_my_listings(
        &pool,
        seller,
        &MyListingsQuery {
            page: Some(1),
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.page.items.len(), 2);
    assert_eq!(page.page.total, 3);
    assert_eq!(page.page.total_pages, 2);
    let rare = page.grade_counts.iter().find(|g| g.grade == "RARE").unwrap();
    assert_eq!(rare.count, 3);
}
