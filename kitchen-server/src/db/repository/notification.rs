//! Notification Repository
//!
//! Per-recipient rows; bulk mark-all-read is a single statement so each
//! call is atomic. Cleanup deletes are best-effort housekeeping.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::Notification;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist one notification (one recipient)
    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// Find by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let notification: Option<Notification> =
            self.base.db().select((TABLE, record_key(id))).await?;
        Ok(notification)
    }

    /// All notifications for a staff member, newest first
    pub async fn find_by_staff(&self, staff_id: &str) -> RepoResult<Vec<Notification>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE recipient_staff_id = $staff_id \
                 ORDER BY sent_at DESC",
            )
            .bind(("staff_id", staff_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Unread notifications for a staff member, newest first
    pub async fn find_unread_by_staff(&self, staff_id: &str) -> RepoResult<Vec<Notification>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE recipient_staff_id = $staff_id \
                 AND read = false ORDER BY sent_at DESC",
            )
            .bind(("staff_id", staff_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Unread count for a staff member
    pub async fn count_unread(&self, staff_id: &str) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM notification \
                 WHERE recipient_staff_id = $staff_id AND read = false GROUP ALL",
            )
            .bind(("staff_id", staff_id.to_string()))
            .await?;
        let rows: Vec<super::CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }

    /// Mark one notification read; idempotent
    pub async fn mark_as_read(&self, id: &str, now: i64) -> RepoResult<Notification> {
        let mut notification = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Notification {} not found", id)))?;
        if notification.read {
            return Ok(notification);
        }
        notification.mark_read(now);
        let mut content = notification.clone();
        content.id = None;
        let updated: Option<Notification> = self
            .base
            .db()
            .update((TABLE, record_key(id)))
            .content(content)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Notification {} not found", id)))
    }

    /// Mark every unread notification for a staff member read in one
    /// statement; returns how many were flipped
    pub async fn mark_all_as_read(&self, staff_id: &str, now: i64) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE notification SET read = true, read_at = $now \
                 WHERE recipient_staff_id = $staff_id AND read = false RETURN AFTER",
            )
            .bind(("staff_id", staff_id.to_string()))
            .bind(("now", now))
            .await?;
        let rows: Vec<Notification> = result.take(0)?;
        Ok(rows.len())
    }

    /// Delete notifications whose expiry is behind `now`
    pub async fn delete_expired(&self, now: i64) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "DELETE notification WHERE expires_at != NONE AND expires_at < $now \
                 RETURN BEFORE",
            )
            .bind(("now", now))
            .await?;
        let rows: Vec<Notification> = result.take(0)?;
        Ok(rows.len())
    }

    /// Delete read notifications older than `cutoff`
    pub async fn delete_old_read(&self, cutoff: i64) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "DELETE notification WHERE read = true AND read_at != NONE \
                 AND read_at < $cutoff RETURN BEFORE",
            )
            .bind(("cutoff", cutoff))
            .await?;
        let rows: Vec<Notification> = result.take(0)?;
        Ok(rows.len())
    }
}
