//! Kitchen Operations Domain Module
//!
//! Types for the kitchen operations core:
//! - Lifecycle enums: coarse order status, fine-grained timer status/stage
//! - Events: immutable facts broadcast after a kitchen mutation
//! - Capacity: derived load snapshot, never persisted

pub mod capacity;
pub mod event;
pub mod types;

// Re-exports
pub use capacity::{CapacityAlertLevel, CapacitySnapshot, CapacityStatus};
pub use event::{KitchenEvent, KitchenEventPayload, KitchenEventType};
pub use types::{
    CookingStage, CookingStatus, Department, KitchenStatus, NoteEntry, NoteKind,
    NotificationPriority, NotificationType,
};
