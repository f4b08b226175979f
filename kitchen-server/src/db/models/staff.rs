//! Staff Model
//!
//! Minimal staff record for notification broadcast eligibility: only
//! active, on-duty staff receive fan-out. Account management (auth,
//! roles) lives outside this service.

use serde::{Deserialize, Serialize};
use shared::Department;

use super::serde_helpers;

/// Staff member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    pub name: String,
    pub department: Department,
    /// Clocked in right now
    #[serde(default)]
    pub on_duty: bool,
    #[serde(default = "serde_helpers::default_true")]
    pub is_active: bool,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub department: Department,
    #[serde(default)]
    pub on_duty: bool,
}
