//! Capacity Engine
//!
//! Aggregates live order/timer counts into [`CapacitySnapshot`]s. Always
//! recomputed on demand - nothing here caches a snapshot across calls.
//! The only state is the last alert band, used by the periodic monitor so
//! a sustained load alerts once per escalation instead of once per tick.

use crate::db::repository::{CookingTimerRepository, KitchenOrderRepository, WorkstationRepository};
use parking_lot::Mutex;
use shared::{CapacityAlertLevel, CapacitySnapshot, CookingStatus, KitchenError, KitchenResult};

/// Default kitchen-wide concurrent-order bound (config override)
pub const DEFAULT_MAX_KITCHEN_CAPACITY: usize = 20;

pub struct CapacityEngine {
    kitchen_orders: KitchenOrderRepository,
    timers: CookingTimerRepository,
    workstations: WorkstationRepository,
    max_kitchen_capacity: usize,
    /// Band of the last alert the monitor raised; None after a calm check
    last_alert: Mutex<Option<CapacityAlertLevel>>,
}

impl CapacityEngine {
    pub fn new(
        kitchen_orders: KitchenOrderRepository,
        timers: CookingTimerRepository,
        workstations: WorkstationRepository,
        max_kitchen_capacity: usize,
    ) -> Self {
        Self {
            kitchen_orders,
            timers,
            workstations,
            max_kitchen_capacity,
            last_alert: Mutex::new(None),
        }
    }

    /// Kitchen-wide load, recomputed from live counts
    pub async fn calculate_current_capacity(&self) -> KitchenResult<CapacitySnapshot> {
        let active = self.kitchen_orders.count_active().await?;
        let queued = self.kitchen_orders.count_queued().await?;
        Ok(CapacitySnapshot::from_counts(
            active,
            queued,
            self.max_kitchen_capacity,
        ))
    }

    /// Load of one workstation, bounded by its configured max
    pub async fn calculate_station_capacity(
        &self,
        workstation_id: &str,
    ) -> KitchenResult<CapacitySnapshot> {
        let station = self
            .workstations
            .find_by_id(workstation_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Workstation {} not found", workstation_id))
            })?;

        let timers = self.timers.find_by_workstation(workstation_id).await?;
        let (mut active, mut queued) = (0usize, 0usize);
        for timer in &timers {
            match timer.status {
                CookingStatus::Idle => queued += 1,
                _ => active += 1,
            }
        }
        Ok(CapacitySnapshot::from_counts(
            active,
            queued,
            station.max_capacity,
        ))
    }

    /// Stateless threshold check: the alert the current load warrants
    pub async fn check_capacity_thresholds(
        &self,
    ) -> KitchenResult<Option<(CapacityAlertLevel, CapacitySnapshot)>> {
        let snapshot = self.calculate_current_capacity().await?;
        Ok(snapshot.alert_level().map(|level| (level, snapshot)))
    }

    /// Admission hint for new work; advisory, never a reservation
    pub async fn can_accept_new_order(&self) -> KitchenResult<bool> {
        Ok(self.calculate_current_capacity().await?.can_accept_new_order())
    }

    /// Monitor entry: threshold check with band-change dedup. Returns the
    /// alert only when the band differs from the previous check.
    pub async fn alert_on_band_change(
        &self,
    ) -> KitchenResult<Option<(CapacityAlertLevel, CapacitySnapshot)>> {
        let current = self.check_capacity_thresholds().await?;
        let mut last = self.last_alert.lock();
        let level = current.as_ref().map(|(level, _)| *level);
        if level == *last {
            return Ok(None);
        }
        *last = level;
        Ok(current)
    }
}
