//! Notification Dispatcher
//!
//! Converts kitchen events into per-recipient notifications:
//!
//! | event | notification | audience |
//! |-------|--------------|----------|
//! | OrderQueued | NEW_ORDER (HIGH/2h) | kitchen dept |
//! | StatusChanged → READY | ORDER_STATUS_CHANGE (NORMAL/4h) | service dept |
//! | OrderCancelled | EMERGENCY (no expiry) | kitchen dept |
//! | PriorityChanged ≥ 8 | HIGH broadcast | kitchen dept |
//! | OrderOverdue | ORDER_OVERTIME (HIGH/1h) | kitchen dept |
//! | CapacityAlert WARNING | CAPACITY_ALERT (HIGH/1h) | kitchen dept |
//! | CapacityAlert CRITICAL | CAPACITY_ALERT (EMERGENCY prio/1h) | all on duty |
//!
//! Fan-out is per-recipient independent: one failed write is logged and
//! the remaining recipients still get theirs.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::db::models::{Notification, StaffMember};
use crate::db::repository::{NotificationRepository, StaffRepository};
use crate::utils::Clock;
use shared::{
    CapacityAlertLevel, Department, KitchenEvent, KitchenEventPayload, KitchenStatus,
};

/// Priorities at or above this broadcast to the kitchen department
const PRIORITY_BROADCAST_THRESHOLD: i32 = 8;

pub struct NotificationDispatcher {
    notifications: NotificationRepository,
    staff: StaffRepository,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: NotificationRepository,
        staff: StaffRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            staff,
            clock,
        }
    }

    /// Listener entry: consume events until the channel closes or
    /// shutdown is requested
    pub async fn run(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<KitchenEvent>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("Notification dispatcher started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification dispatcher stopping");
                    break;
                }
                event = rx.recv() => match event {
                    Ok(event) => self.handle_event(&event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Notifications are advisory; dropped events are
                        // logged, not replayed
                        tracing::warn!(skipped = skipped, "Dispatcher lagged, events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event channel closed, dispatcher stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Map one event to its notifications; every failure ends here
    pub async fn handle_event(&self, event: &KitchenEvent) {
        let now = self.clock.now_millis();
        let order_id = event.order_id.as_deref().unwrap_or("");

        let delivered = match &event.payload {
            KitchenEventPayload::OrderQueued { priority } => {
                let priority = *priority;
                self.broadcast_to_department(Department::Kitchen, |staff| {
                    Notification::new_order(staff.id.clone().unwrap_or_default(), order_id, priority, now)
                })
                .await
            }
            KitchenEventPayload::StatusChanged { from, to } if *to == KitchenStatus::Ready => {
                let (from, to) = (*from, *to);
                self.broadcast_to_department(Department::Service, |staff| {
                    Notification::status_change(
                        staff.id.clone().unwrap_or_default(),
                        order_id,
                        from,
                        to,
                        now,
                    )
                })
                .await
            }
            KitchenEventPayload::OrderCancelled { reason } => {
                let sender = event.staff_id.clone();
                self.broadcast_to_department(Department::Kitchen, |staff| {
                    Notification::emergency(
                        staff.id.clone().unwrap_or_default(),
                        sender.clone(),
                        order_id,
                        reason,
                        now,
                    )
                })
                .await
            }
            KitchenEventPayload::PriorityChanged { priority }
                if *priority >= PRIORITY_BROADCAST_THRESHOLD =>
            {
                let priority = *priority;
                self.broadcast_to_department(Department::Kitchen, |staff| {
                    Notification::priority_raised(
                        staff.id.clone().unwrap_or_default(),
                        order_id,
                        priority,
                        now,
                    )
                })
                .await
            }
            KitchenEventPayload::OrderOverdue { overdue_minutes } => {
                let minutes = *overdue_minutes;
                self.broadcast_to_department(Department::Kitchen, |staff| {
                    Notification::overtime(staff.id.clone().unwrap_or_default(), order_id, minutes, now)
                })
                .await
            }
            KitchenEventPayload::CapacityAlert { level, snapshot } => {
                let (level, snapshot) = (*level, snapshot.clone());
                let build = move |staff: &StaffMember| {
                    Notification::capacity_alert(
                        staff.id.clone().unwrap_or_default(),
                        level,
                        &snapshot,
                        now,
                    )
                };
                match level {
                    CapacityAlertLevel::Warning => {
                        self.broadcast_to_department(Department::Kitchen, build).await
                    }
                    CapacityAlertLevel::Critical => self.broadcast_to_on_duty_staff(build).await,
                }
            }
            // Starts, pauses, resumes and re-estimates stay in the log
            _ => {
                tracing::debug!(event_type = %event.event_type, "Event without notification mapping");
                return;
            }
        };

        tracing::debug!(
            event_type = %event.event_type,
            delivered = delivered,
            "Event dispatched"
        );
    }

    /// Fan out to active on-duty staff of one department; returns how many
    /// notifications landed
    pub async fn broadcast_to_department<F>(&self, department: Department, build: F) -> usize
    where
        F: Fn(&StaffMember) -> Notification,
    {
        match self.staff.find_on_duty_by_department(department).await {
            Ok(recipients) => self.deliver_all(&recipients, build).await,
            Err(e) => {
                tracing::error!(department = ?department, error = %e, "Recipient lookup failed");
                0
            }
        }
    }

    /// Fan out to every active on-duty staff member
    pub async fn broadcast_to_on_duty_staff<F>(&self, build: F) -> usize
    where
        F: Fn(&StaffMember) -> Notification,
    {
        match self.staff.find_on_duty().await {
            Ok(recipients) => self.deliver_all(&recipients, build).await,
            Err(e) => {
                tracing::error!(error = %e, "Recipient lookup failed");
                0
            }
        }
    }

    /// Independent per-recipient writes: continue on error
    async fn deliver_all<F>(&self, recipients: &[StaffMember], build: F) -> usize
    where
        F: Fn(&StaffMember) -> Notification,
    {
        let mut delivered = 0usize;
        for recipient in recipients {
            match self.notifications.create(build(recipient)).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        recipient = ?recipient.id,
                        error = %e,
                        "Notification delivery failed, continuing"
                    );
                }
            }
        }
        delivered
    }
}
