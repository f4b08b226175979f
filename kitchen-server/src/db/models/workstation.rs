//! Workstation Model
//!
//! Reference data: a named kitchen station (grill, wok, prep, ...) with a
//! maximum concurrent-order capacity. Bounds per-station load in the
//! capacity engine.

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Workstation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workstation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    pub name: String,
    /// Maximum concurrent orders this station can work
    pub max_capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "serde_helpers::default_true")]
    pub is_active: bool,
}

/// Create workstation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkstationCreate {
    pub name: String,
    pub max_capacity: usize,
    pub description: Option<String>,
}

/// Update workstation payload; unset fields are left untouched by merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkstationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
