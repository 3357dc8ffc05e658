//! Shared fixtures for marketplace integration tests.

#![allow(dead_code)]

use photomarket_db::models::card::Photocard;
use photomarket_db::models::listing::ListingSummary;
use photomarket_db::models::user::CreateUser;
use photomarket_db::repositories::PointRepo;
use photomarket_market::cards::{self, NewCard};
use photomarket_market::listings::{self, NewListing};
use photomarket_market::{accounts, MarketError};
use photomarket_core::error::CoreError;
use sqlx::PgPool;

/// Register a user and top their ledger up to `balance`.
pub async fn user(pool: &PgPool, nickname: &str, balance: i64) -> i64 {
    let user = accounts::register(
        pool,
        &CreateUser {
            email: format!("{nickname}@example.com"),
            nickname: nickname.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap();
    if balance > 0 {
        PointRepo::add(pool, user.id, balance).await.unwrap();
    }
    user.id
}

pub fn new_card(name: &str, price: i64, total_count: i32) -> NewCard {
    NewCard {
        name: name.to_string(),
        description: Some("test card".to_string()),
        image_url: None,
        grade: "RARE".to_string(),
        genre: "KPOP".to_string(),
        price,
        total_count,
    }
}

pub async fn card(pool: &PgPool, creator: i64, name: &str, price: i64, total: i32) -> Photocard {
    cards::create_card(pool, creator, &new_card(name, price, total))
        .await
        .unwrap()
}

pub fn new_listing(photocard_id: i64, total_count: i64) -> NewListing {
    NewListing {
        photocard_id,
        total_count,
        price: None,
        trade_grade: "COMMON".to_string(),
        trade_genre: "ACTOR".to_string(),
        trade_note: Some("anything Common".to_string()),
    }
}

pub async fn listing(pool: &PgPool, seller: i64, photocard_id: i64, count: i64) -> ListingSummary {
    listings::create_listing(pool, seller, &new_listing(photocard_id, count))
        .await
        .unwrap()
}

pub async fn balance(pool: &PgPool, user_id: i64) -> i64 {
    PointRepo::find_by_user(pool, user_id)
        .await
        .unwrap()
        .unwrap()
        .balance
}

/// Units of a card type held by `owner`, as `(id, is_listed)` pairs.
pub async fn units_of(pool: &PgPool, photocard_id: i64, owner: i64) -> Vec<(i64, bool)> {
    sqlx::query_as(
        "SELECT id, is_listed FROM user_photocards
         WHERE photocard_id = $1 AND owner_id = $2 ORDER BY id",
    )
    .bind(photocard_id)
    .bind(owner)
    .fetch_all(pool)
    .await
    .unwrap()
}

pub async fn notification_categories(pool: &PgPool, receiver: i64) -> Vec<String> {
    sqlx::query_scalar("SELECT category FROM notifications WHERE receiver_id = $1 ORDER BY id")
        .bind(receiver)
        .fetch_all(pool)
        .await
        .unwrap()
}

/// Unwrap the domain error out of a failed operation.
pub fn core_err<T: std::fmt::Debug>(result: Result<T, MarketError>) -> CoreError {
    match result.unwrap_err() {
        MarketError::Core(core) => core,
        other => panic!("expected a domain error, got {other:?}"),
    }
}
