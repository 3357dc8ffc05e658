//! Card issuance and the owner's gallery.

use photomarket_core::card::{self, Genre, Grade};
use photomarket_core::error::CoreError;
use photomarket_core::pagination::{self, PageRequest, DEFAULT_PAGE_SIZE};
use photomarket_core::types::DbId;
use photomarket_db::models::card::{CardFilter, CreatePhotocard, GalleryCard, Photocard};
use photomarket_db::repositories::{PhotocardRepo, UnitRepo};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::MarketResult;
use crate::page::{fill_grade_counts, GradedPage, Page};

/// Request body for issuing a new card type.
#[derive(Debug, Deserialize)]
pub struct NewCard {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub price: i64,
    pub total_count: i32,
}

/// Query parameters shared by the gallery-style lists.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub keyword: Option<String>,
}

/// Parse and validate grade/genre/keyword filters.
pub(crate) fn card_filter(
    grade: Option<&str>,
    genre: Option<&str>,
    keyword: Option<&str>,
) -> Result<CardFilter, CoreError> {
    Ok(CardFilter {
        grade: grade
            .map(str::parse::<Grade>)
            .transpose()?
            .map(|g| g.as_str().to_string()),
        genre: genre
            .map(str::parse::<Genre>)
            .transpose()?
            .map(|g| g.as_str().to_string()),
        keyword: pagination::normalize_keyword(keyword)?,
    })
}

/// Issue a card type and mint `total_count` units to the creator, atomically.
pub async fn create_card(
    pool: &PgPool,
    creator_id: DbId,
    input: &NewCard,
) -> MarketResult<Photocard> {
    let grade: Grade = input.grade.parse()?;
    let genre: Genre = input.genre.parse()?;
    card::validate_new_card(
        &input.name,
        input.description.as_deref(),
        input.price,
        input.total_count,
    )?;

    let mut tx = pool.begin().await?;
    let photocard = PhotocardRepo::create(
        &mut *tx,
        &CreatePhotocard {
            creator_id,
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            grade: grade.as_str().to_string(),
            genre: genre.as_str().to_string(),
            price: input.price,
            total_issued: input.total_count,
        },
    )
    .await?;
    let minted = UnitRepo::issue(&mut *tx, photocard.id, creator_id, input.total_count).await?;
    if minted != input.total_count as u64 {
        return Err(CoreError::Internal(format!(
            "Minted {minted} of {} units",
            input.total_count
        ))
        .into());
    }
    tx.commit().await?;

    tracing::info!(
        user_id = creator_id,
        photocard_id = photocard.id,
        count = input.total_count,
        "Card issued",
    );
    Ok(photocard)
}

/// Card types the user holds at least one unit of.
pub async fn get_gallery(
    pool: &PgPool,
    owner_id: DbId,
    query: &GalleryQuery,
) -> MarketResult<GradedPage<GalleryCard>> {
    let request = PageRequest::new(query.page, query.page_size, DEFAULT_PAGE_SIZE)?;
    let filter = card_filter(
        query.grade.as_deref(),
        query.genre.as_deref(),
        query.keyword.as_deref(),
    )?;

    let (items, total) =
        PhotocardRepo::list_gallery(pool, owner_id, &filter, request.page_size, request.offset())
            .await?;
    let grade_counts = PhotocardRepo::grade_counts_for_owner(pool, owner_id, &filter).await?;

    Ok(GradedPage {
        page: Page::new(items, request, total),
        grade_counts: fill_grade_counts(grade_counts),
    })
}

/// A card type as seen by one of its holders.
pub async fn get_owned_card(
    pool: &PgPool,
    owner_id: DbId,
    card_id: DbId,
) -> MarketResult<GalleryCard> {
    PhotocardRepo::find_owned(pool, owner_id, card_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Photocard",
                id: card_id,
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_normalizes_enum_spelling() {
        let filter = card_filter(Some("SUPER_RARE"), None, Some("  rm ")).unwrap();
        assert_eq!(filter.grade.as_deref(), Some("SUPER_RARE"));
        assert_eq!(filter.genre, None);
        assert_eq!(filter.keyword.as_deref(), Some("rm"));
    }

    #[test]
    fn filter_rejects_unknown_grade() {
        assert!(card_filter(Some("MYTHIC"), None, None).is_err());
        assert!(card_filter(None, Some("opera"), None).is_err());
    }
}
