//! Database Models
//!
//! Entity structs persisted in SurrealDB. Record ids are carried as
//! "table:id" strings (see [`serde_helpers`]).

pub mod serde_helpers;

mod cooking_timer;
mod kitchen_order;
mod notification;
mod order;
mod staff;
mod workstation;

pub use cooking_timer::CookingTimer;
pub use kitchen_order::{
    BASE_COOKING_MINUTES, KitchenOrder, MAX_PRIORITY, MIN_PRIORITY, OVERTIME_BUFFER_MINUTES,
    PER_ITEM_MINUTES,
};
pub use notification::Notification;
pub use order::{Order, OrderStatus};
pub use staff::{StaffCreate, StaffMember};
pub use workstation::{Workstation, WorkstationCreate, WorkstationUpdate};
