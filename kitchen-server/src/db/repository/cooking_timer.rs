//! Cooking Timer Repository
//!
//! Timer updates go through [`CookingTimerRepository::update_versioned`],
//! a compare-and-swap on the `version` column: the write applies only if
//! the stored version still matches the one the caller read. A `None`
//! result means the version was stale and the caller must re-read.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::CookingTimer;
use shared::CookingStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cooking_timer";

/// Timer statuses still occupying a station
const OPEN_STATUSES: [CookingStatus; 4] = [
    CookingStatus::Idle,
    CookingStatus::Running,
    CookingStatus::Paused,
    CookingStatus::Overdue,
];

#[derive(Clone)]
pub struct CookingTimerRepository {
    base: BaseRepository,
}

impl CookingTimerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new timer record
    pub async fn create(&self, timer: CookingTimer) -> RepoResult<CookingTimer> {
        let created: Option<CookingTimer> = self.base.db().create(TABLE).content(timer).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cooking timer".to_string()))
    }

    /// Find by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CookingTimer>> {
        let timer: Option<CookingTimer> =
            self.base.db().select((TABLE, record_key(id))).await?;
        Ok(timer)
    }

    /// The one open (non-terminal) timer for an order, if any
    pub async fn find_active_by_order(&self, order_id: &str) -> RepoResult<Option<CookingTimer>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cooking_timer WHERE order_id = $order_id \
                 AND status IN $statuses ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("order_id", order_id.to_string()))
            .bind(("statuses", OPEN_STATUSES.to_vec()))
            .await?;
        let timers: Vec<CookingTimer> = result.take(0)?;
        Ok(timers.into_iter().next())
    }

    /// Version-checked full update (optimistic concurrency)
    ///
    /// Writes the timer with `version + 1` only while the stored version
    /// equals the version the caller read. Returns the stored record, or
    /// `None` when the version was stale (zero rows affected).
    pub async fn update_versioned(&self, timer: &CookingTimer) -> RepoResult<Option<CookingTimer>> {
        let id = timer
            .id
            .as_ref()
            .ok_or_else(|| RepoError::Validation("Cooking timer has no id".to_string()))?;
        let expected = timer.version;

        let mut content = timer.clone();
        content.id = None;
        content.version = expected + 1;

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing($table, $key) CONTENT $data \
                 WHERE version = $expected RETURN AFTER",
            )
            .bind(("table", TABLE.to_string()))
            .bind(("key", record_key(id).to_string()))
            .bind(("data", content))
            .bind(("expected", expected))
            .await?;
        let rows: Vec<CookingTimer> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Open timers bound to one workstation, for station capacity
    pub async fn find_by_workstation(&self, workstation_id: &str) -> RepoResult<Vec<CookingTimer>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cooking_timer WHERE workstation_id = $workstation_id \
                 AND status IN $statuses ORDER BY created_at ASC",
            )
            .bind(("workstation_id", workstation_id.to_string()))
            .bind(("statuses", OPEN_STATUSES.to_vec()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Non-terminal timers already past their estimated end
    pub async fn find_overdue(&self, now: i64) -> RepoResult<Vec<CookingTimer>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cooking_timer WHERE status IN $statuses \
                 AND estimated_end_time != NONE AND estimated_end_time < $now \
                 ORDER BY estimated_end_time ASC",
            )
            .bind(("statuses", OPEN_STATUSES.to_vec()))
            .bind(("now", now))
            .await?;
        Ok(result.take(0)?)
    }
}
