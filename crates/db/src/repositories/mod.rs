//! Repository layer.
//!
//! Each repository is a zero-sized struct. Methods that issue a single
//! statement are generic over [`sqlx::PgExecutor`] so they can join a
//! caller's transaction; read models that need several statements take
//! `&PgPool`.

pub mod card_repo;
pub mod listing_repo;
pub mod notification_repo;
pub mod point_repo;
pub mod purchase_repo;
pub mod session_repo;
pub mod trade_repo;
pub mod unit_repo;
pub mod user_repo;

pub use card_repo::PhotocardRepo;
pub use listing_repo::ListingRepo;
pub use notification_repo::NotificationRepo;
pub use point_repo::PointRepo;
pub use purchase_repo::PurchaseRepo;
pub use session_repo::SessionRepo;
pub use trade_repo::TradeRepo;
pub use unit_repo::UnitRepo;
pub use user_repo::UserRepo;
