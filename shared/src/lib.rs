//! Shared types for the Brigade kitchen operations framework
//!
//! Domain types used across crates: kitchen lifecycle enums, domain
//! events, the capacity snapshot, and the domain error taxonomy.

pub mod error;
pub mod kitchen;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{KitchenError, KitchenResult};
pub use kitchen::{
    CapacityAlertLevel, CapacitySnapshot, CapacityStatus, CookingStage, CookingStatus, Department,
    KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenStatus, NoteEntry, NoteKind,
    NotificationPriority, NotificationType,
};
