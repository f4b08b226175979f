//! Notifications Module
//!
//! Strictly downstream of the kitchen core: the dispatcher listens on the
//! event channel and fans prioritized, expiring messages out to eligible
//! staff; the cleanup sweep prunes what expired. Nothing here ever
//! mutates order or timer state, and nothing here can fail a kitchen
//! mutation - delivery errors are logged and swallowed.

pub mod cleanup;
pub mod dispatcher;

pub use cleanup::NotificationCleanup;
pub use dispatcher::NotificationDispatcher;
