use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bike {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub registration: String,
    pub bike_number: i32,
    pub vin: String,
    /// Displacement in cc.
    pub engine_size: i32,
    pub available: bool,
    pub archived: bool,
    pub archived_reason: Option<String>,
    pub archived_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl Bike {
    pub fn new(input: BikeInput, created_by: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            garage_id: input.garage_id,
            registration: input.registration,
            bike_number: input.bike_number,
            vin: input.vin,
            engine_size: input.engine_size,
            available: input.available,
            archived: false,
            archived_reason: None,
            archived_by: None,
            created_at: now,
            created_by: Some(created_by),
        }
    }

    pub fn apply(&mut self, input: BikeInput) {
        self.garage_id = input.garage_id;
        self.registration = input.registration;
        self.bike_number = input.bike_number;
        self.vin = input.vin;
        self.engine_size = input.engine_size;
        // archived bikes stay disabled
        self.available = input.available && !self.archived;
    }

    pub fn is_schedulable(&self) -> bool {
        self.available && !self.archived
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikeInput {
    pub garage_id: Uuid,
    #[serde(default)]
    pub registration: String,
    #[serde(default)]
    pub bike_number: i32,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub engine_size: i32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Candidate selection for the availability resolver.
#[derive(Debug, Clone, Default)]
pub struct BikeFilter {
    pub garage_id: Option<Uuid>,
    pub only_available: bool,
    /// 0 disables the engine size limit.
    pub max_engine_cc: i32,
}

impl BikeFilter {
    pub fn schedulable_in(garage_id: Uuid, max_engine_cc: i32) -> Self {
        Self {
            garage_id: Some(garage_id),
            only_available: true,
            max_engine_cc,
        }
    }

    /// Archived bikes never match.
    pub fn matches(&self, bike: &Bike) -> bool {
        !bike.archived
            && self.garage_id.is_none_or(|id| bike.garage_id == id)
            && (!self.only_available || bike.available)
            && (self.max_engine_cc <= 0 || bike.engine_size <= self.max_engine_cc)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveBikeInput {
    #[serde(default)]
    pub reason: String,
}
