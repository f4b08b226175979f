//! Notification Cleanup
//!
//! Periodic housekeeping: drop expired notifications and read ones older
//! than the retention window. Best-effort - a failed sweep logs and waits
//! for the next tick.

use std::sync::Arc;

use crate::db::repository::NotificationRepository;
use crate::utils::Clock;

/// Read notifications are kept this long before the sweep removes them
pub const READ_RETENTION_DAYS: i64 = 30;

#[derive(Clone)]
pub struct NotificationCleanup {
    notifications: NotificationRepository,
    clock: Arc<dyn Clock>,
}

impl NotificationCleanup {
    pub fn new(notifications: NotificationRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }

    /// One sweep; returns (expired deleted, old-read deleted)
    pub async fn sweep(&self) -> (usize, usize) {
        let now = self.clock.now_millis();

        let expired = match self.notifications.delete_expired(now).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Expired-notification sweep failed");
                0
            }
        };

        let cutoff = now - READ_RETENTION_DAYS * 24 * 3_600_000;
        let old_read = match self.notifications.delete_old_read(cutoff).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Old-read-notification sweep failed");
                0
            }
        };

        if expired > 0 || old_read > 0 {
            tracing::info!(expired = expired, old_read = old_read, "Notifications cleaned up");
        }
        (expired, old_read)
    }
}
