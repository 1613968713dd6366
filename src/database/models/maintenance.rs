use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub bike_id: Uuid,
    pub notes: String,
    pub mechanic_required: bool,
    pub checked_by: Uuid,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceLogInput {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub mechanic_required: bool,
    pub checked_at: Option<DateTime<Utc>>,
}

/// Bike condition recorded by the operator when a shift ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OperatorReport {
    pub id: Uuid,
    pub bike_id: Uuid,
    pub shift_id: Uuid,
    pub checked_by: Uuid,
    pub checked_at: DateTime<Utc>,
    pub condition: String,
    pub notes: String,
    pub fuel_level: i32,
    pub locked_up: bool,
    pub clothes_returned: bool,
    pub key_returned: bool,
    pub mechanic_required: bool,
    pub mechanic_alert_reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorReportInput {
    pub condition: String,
    pub notes: String,
    pub fuel_level: i32,
    pub locked_up: bool,
    pub clothes_returned: bool,
    pub key_returned: bool,
    pub mechanic_required: bool,
    pub mechanic_alert_reason: String,
}
