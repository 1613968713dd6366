//! Which bikes of a garage are free on a given local day.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::FleetStore;
use crate::database::models::{Bike, BikeDay, BikeFilter, ShiftStatus};
use crate::error::AppError;
use crate::services::actor::Actor;
use crate::services::clock::{self, Clock};

#[derive(Clone)]
pub struct AvailabilityResolver {
    store: Arc<dyn FleetStore>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityResolver {
    pub fn new(store: Arc<dyn FleetStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Bikes of `garage_id` with no confirmed shift on the local day of
    /// `date`, ordered by bike number. `max_engine_cc` of 0 means no limit.
    ///
    /// Bikes holding only `created` bookings stay available; those are
    /// settled when one of them is confirmed.
    pub async fn available_bikes(
        &self,
        garage_id: Uuid,
        date: DateTime<Utc>,
        max_engine_cc: i32,
    ) -> Result<Vec<Bike>, AppError> {
        let (from, until) = clock::day_bounds(date, self.clock.offset());
        let candidates = self
            .store
            .find_bikes(&BikeFilter::schedulable_in(garage_id, max_engine_cc))
            .await?;

        let mut available = Vec::with_capacity(candidates.len());
        for bike in candidates {
            let slot = BikeDay {
                garage_id,
                bike_id: bike.id,
                from,
                until,
            };
            let confirmed = self
                .store
                .count_shifts(&slot, ShiftStatus::Confirmed)
                .await?;
            if confirmed == 0 {
                available.push(bike);
            }
        }

        log::debug!(
            "Garage {} has {} free bikes on {}",
            garage_id,
            available.len(),
            from
        );
        Ok(available)
    }

    /// Availability as seen by `driver_id`: learner-permit holders only see
    /// small bikes. Non-admins may not search a day that has already ended.
    pub async fn search(
        &self,
        actor: &Actor,
        driver_id: Uuid,
        garage_id: Uuid,
        day: &str,
    ) -> Result<Vec<Bike>, AppError> {
        let date = match clock::parse_day(day, self.clock.offset()) {
            Some(start) => {
                let day_over = start + chrono::Duration::hours(24) < self.clock.now();
                if day_over && !actor.is_admin {
                    return Err(AppError::validation("Date: must be in the future"));
                }
                start.with_timezone(&Utc)
            }
            None if actor.is_admin => self.clock.now_utc(),
            None => return Err(AppError::validation(clock::INVALID_DATE)),
        };

        if self.store.find_garage(garage_id).await?.is_none() {
            return Err(AppError::validation("Garage does not exist"));
        }

        let max_engine_cc = self
            .store
            .find_driver(driver_id)
            .await?
            .map(|driver| driver.license.max_engine_cc())
            .unwrap_or(0);

        self.available_bikes(garage_id, date, max_engine_cc).await
    }
}
