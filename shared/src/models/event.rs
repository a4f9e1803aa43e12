//! Event Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Restaurant event shown on the customer page (informational only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_date: NaiveDate,
    pub is_active: Option<bool>,
}

/// Update event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}
