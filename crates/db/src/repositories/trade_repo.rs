//! Repository for the `trade_proposals` table.

use photomarket_core::trade::TradeStatus;
use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::trade::{CreateTradeProposal, TradeProposal, TradeProposalView};

const COLUMNS: &str = "id, requester_id, offered_unit_id, target_unit_id, content, status, \
                        created_at, updated_at";

/// Select list for [`TradeProposalView`].
const VIEW_COLUMNS: &str = "t.id, t.requester_id, r.nickname AS requester_nickname, \
                             t.offered_unit_id, t.target_unit_id, \
                             op.id AS offered_card_id, op.name AS offered_card_name, \
                             op.grade AS offered_card_grade, op.genre AS offered_card_genre, \
                             tp.id AS target_card_id, tp.name AS target_card_name, \
                             t.content, t.status, t.created_at, t.updated_at";

const VIEW_FROM: &str = "trade_proposals t
             JOIN users r ON r.id = t.requester_id
             JOIN user_photocards ou ON ou.id = t.offered_unit_id
             JOIN photocards op ON op.id = ou.photocard_id
             JOIN user_photocards tu ON tu.id = t.target_unit_id
             JOIN photocards tp ON tp.id = tu.photocard_id";

pub struct TradeRepo;

impl TradeRepo {
    /// Insert a `PENDING` proposal.
    ///
    /// A second pending proposal for the same unit pair violates
    /// `uq_trade_proposals_pending_pair`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateTradeProposal,
    ) -> Result<TradeProposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO trade_proposals (requester_id, offered_unit_id, target_unit_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TradeProposal>(&query)
            .bind(input.requester_id)
            .bind(input.offered_unit_id)
            .bind(input.target_unit_id)
            .bind(&input.content)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TradeProposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trade_proposals WHERE id = $1");
        sqlx::query_as::<_, TradeProposal>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn pending_exists<'e>(
        executor: impl PgExecutor<'e>,
        offered_unit_id: DbId,
        target_unit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM trade_proposals
                WHERE offered_unit_id = $1 AND target_unit_id = $2 AND status = 'PENDING'
             )",
        )
        .bind(offered_unit_id)
        .bind(target_unit_id)
        .fetch_one(executor)
        .await
    }

    /// Move a proposal from `from` to `to`. Returns `false` when the row is
    /// no longer in `from`, which is how a lost race shows up.
    pub async fn transition<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        from: TradeStatus,
        to: TradeStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE trade_proposals SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Proposals whose target unit is of card type `photocard_id`, newest first.
    pub async fn list_for_card<'e>(
        executor: impl PgExecutor<'e>,
        photocard_id: DbId,
    ) -> Result<Vec<TradeProposalView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM {VIEW_FROM}
             WHERE tp.id = $1
             ORDER BY t.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TradeProposalView>(&query)
            .bind(photocard_id)
            .fetch_all(executor)
            .await
    }

    /// Proposals sent by `requester_id`, newest first.
    pub async fn list_for_requester<'e>(
        executor: impl PgExecutor<'e>,
        requester_id: DbId,
    ) -> Result<Vec<TradeProposalView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM {VIEW_FROM}
             WHERE t.requester_id = $1
             ORDER BY t.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TradeProposalView>(&query)
            .bind(requester_id)
            .fetch_all(executor)
            .await
    }
}
