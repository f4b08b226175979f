//! Utilities: errors, logging, clock

pub mod clock;
pub mod error;
pub mod logger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, AppResponse, AppResult};
pub use logger::{init_logger, init_logger_with_file};
