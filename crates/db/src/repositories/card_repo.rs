//! Repository for the `photocards` table and owner-centric card views.

use photomarket_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::card::{CardFilter, CreatePhotocard, GalleryCard, GradeCount, Photocard};

const COLUMNS: &str = "id, creator_id, name, description, image_url, grade, genre, price, \
                        total_issued, created_at, updated_at";

/// Select list for [`GalleryCard`]; expects `p` (photocards), `c` (creator)
/// and `up` (the owner's units) in scope.
const GALLERY_COLUMNS: &str = "p.id, p.name, p.description, p.image_url, p.grade, p.genre, \
                                p.price, p.total_issued, c.nickname AS creator_nickname, \
                                COUNT(up.id) AS owned_count, \
                                COUNT(up.id) FILTER (WHERE up.is_listed) AS listed_count";

/// Shared filter predicate. `$1` is the owner, `$2..$4` grade/genre/keyword.
const GALLERY_FILTER: &str = "up.owner_id = $1
               AND ($2::TEXT IS NULL OR p.grade = $2)
               AND ($3::TEXT IS NULL OR p.genre = $3)
               AND ($4::TEXT IS NULL OR strpos(lower(p.name), lower($4)) > 0)";

pub struct PhotocardRepo;

impl PhotocardRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreatePhotocard,
    ) -> Result<Photocard, sqlx::Error> {
        let query = format!(
            "INSERT INTO photocards
                (creator_id, name, description, image_url, grade, genre, price, total_issued)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photocard>(&query)
            .bind(input.creator_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.grade)
            .bind(&input.genre)
            .bind(input.price)
            .bind(input.total_issued)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Photocard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photocards WHERE id = $1");
        sqlx::query_as::<_, Photocard>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// One page of the card types `owner_id` holds at least one unit of,
    /// newest card first, plus the number of matching card types.
    pub async fn list_gallery(
        pool: &PgPool,
        owner_id: DbId,
        filter: &CardFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GalleryCard>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {GALLERY_COLUMNS}
             FROM photocards p
             JOIN user_photocards up ON up.photocard_id = p.id
             JOIN users c ON c.id = p.creator_id
             WHERE {GALLERY_FILTER}
             GROUP BY p.id, c.nickname
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, GalleryCard>(&query)
            .bind(owner_id)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(DISTINCT p.id)
             FROM photocards p
             JOIN user_photocards up ON up.photocard_id = p.id
             WHERE {GALLERY_FILTER}"
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(owner_id)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Units held by `owner_id` per grade, under the same filters as the
    /// gallery. Grades with no units are absent.
    pub async fn grade_counts_for_owner<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
        filter: &CardFilter,
    ) -> Result<Vec<GradeCount>, sqlx::Error> {
        let query = format!(
            "SELECT p.grade, COUNT(up.id) AS count
             FROM photocards p
             JOIN user_photocards up ON up.photocard_id = p.id
             WHERE {GALLERY_FILTER}
             GROUP BY p.grade"
        );
        sqlx::query_as::<_, GradeCount>(&query)
            .bind(owner_id)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .fetch_all(executor)
            .await
    }

    /// A single card type as seen by `owner_id`. `None` when they hold no
    /// unit of it.
    pub async fn find_owned<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
        card_id: DbId,
    ) -> Result<Option<GalleryCard>, sqlx::Error> {
        let query = format!(
            "SELECT {GALLERY_COLUMNS}
             FROM photocards p
             JOIN user_photocards up ON up.photocard_id = p.id AND up.owner_id = $1
             JOIN users c ON c.id = p.creator_id
             WHERE p.id = $2
             GROUP BY p.id, c.nickname"
        );
        sqlx::query_as::<_, GalleryCard>(&query)
            .bind(owner_id)
            .bind(card_id)
            .fetch_optional(executor)
            .await
    }
}
