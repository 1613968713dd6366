use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Garage {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Informational only; bookings never check it.
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarageInput {
    pub name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub capacity: i32,
}

impl Garage {
    pub fn new(input: GarageInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            lat: input.lat,
            lng: input.lng,
            capacity: input.capacity,
        }
    }
}
