use std::sync::Arc;

use uuid::Uuid;

use crate::database::FleetStore;
use crate::database::models::{
    Bike, BikeFilter, BikeInput, Garage, GarageInput, MaintenanceLog, MaintenanceLogInput,
    OperatorReport, OperatorReportInput,
};
use crate::error::AppError;
use crate::services::actor::Actor;
use crate::services::clock::Clock;

/// Garages, bikes and their upkeep records.
#[derive(Clone)]
pub struct FleetService {
    store: Arc<dyn FleetStore>,
    clock: Arc<dyn Clock>,
}

impl FleetService {
    pub fn new(store: Arc<dyn FleetStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list_garages(&self) -> Result<Vec<Garage>, AppError> {
        Ok(self.store.list_garages().await?)
    }

    pub async fn get_garage(&self, id: Uuid) -> Result<Garage, AppError> {
        self.store
            .find_garage(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Garage not found".to_string()))
    }

    pub async fn create_garage(&self, input: GarageInput) -> Result<Garage, AppError> {
        validate_garage(&input)?;
        let garage = Garage::new(input);
        self.store.insert_garage(&garage).await?;
        log::info!("Garage {} ({}) created", garage.id, garage.name);
        Ok(garage)
    }

    pub async fn update_garage(&self, id: Uuid, input: GarageInput) -> Result<Garage, AppError> {
        validate_garage(&input)?;
        let garage = Garage {
            id,
            ..Garage::new(input)
        };
        if !self.store.update_garage(&garage).await? {
            return Err(AppError::NotFound("Garage not found".to_string()));
        }
        Ok(garage)
    }

    /// Garages keep their history: one that ever held a bike or a shift
    /// stays.
    pub async fn delete_garage(&self, id: Uuid) -> Result<(), AppError> {
        if self.store.garage_in_use(id).await? {
            return Err(AppError::Conflict(
                "Garage still has bikes or shifts assigned".to_string(),
            ));
        }
        if !self.store.delete_garage(id).await? {
            return Err(AppError::NotFound("Garage not found".to_string()));
        }
        log::info!("Garage {} deleted", id);
        Ok(())
    }

    /// Bikes that are not archived, by bike number.
    pub async fn list_bikes(
        &self,
        garage_id: Option<Uuid>,
        only_available: bool,
    ) -> Result<Vec<Bike>, AppError> {
        Ok(self
            .store
            .find_bikes(&BikeFilter {
                garage_id,
                only_available,
                max_engine_cc: 0,
            })
            .await?)
    }

    pub async fn get_bike(&self, id: Uuid) -> Result<Bike, AppError> {
        self.store
            .find_bike(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bike not found".to_string()))
    }

    pub async fn create_bike(&self, input: BikeInput, actor: &Actor) -> Result<Bike, AppError> {
        self.validate_bike(&input).await?;
        let bike = Bike::new(input, actor.id, self.clock.now_utc());
        self.store.insert_bike(&bike).await?;
        log::info!("Bike {} ({}) added by {}", bike.id, bike.registration, actor.id);
        Ok(bike)
    }

    pub async fn update_bike(&self, id: Uuid, input: BikeInput) -> Result<Bike, AppError> {
        let mut bike = self.get_bike(id).await?;
        self.validate_bike(&input).await?;
        bike.apply(input);
        if !self.store.update_bike(&bike).await? {
            return Err(AppError::NotFound("Bike not found".to_string()));
        }
        Ok(bike)
    }

    /// Archived bikes drop out of every listing and can no longer be booked.
    pub async fn archive_bike(
        &self,
        id: Uuid,
        reason: &str,
        actor: &Actor,
    ) -> Result<Bike, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation(
                "Please provide a reason for archiving this bike",
            ));
        }

        let mut bike = self.get_bike(id).await?;
        if bike.archived {
            return Err(AppError::validation("Bike is already archived"));
        }

        bike.archived = true;
        bike.available = false;
        bike.archived_reason = Some(reason.to_string());
        bike.archived_by = Some(actor.id);
        if !self.store.update_bike(&bike).await? {
            return Err(AppError::NotFound("Bike not found".to_string()));
        }
        log::info!("Bike {} archived by {}: {}", id, actor.id, reason);
        Ok(bike)
    }

    /// Bikes flagged for a mechanic by a log or an operator report.
    pub async fn bikes_needing_mechanic(&self) -> Result<Vec<Bike>, AppError> {
        let mut bikes = Vec::new();
        for id in self.store.bikes_needing_mechanic().await? {
            if let Some(bike) = self.store.find_bike(id).await? {
                bikes.push(bike);
            }
        }
        bikes.sort_by(|a, b| b.registration.cmp(&a.registration));
        Ok(bikes)
    }

    pub async fn maintenance_logs(&self, bike_id: Uuid) -> Result<Vec<MaintenanceLog>, AppError> {
        self.get_bike(bike_id).await?;
        Ok(self.store.maintenance_logs(bike_id).await?)
    }

    pub async fn add_maintenance_log(
        &self,
        bike_id: Uuid,
        input: MaintenanceLogInput,
        actor: &Actor,
    ) -> Result<MaintenanceLog, AppError> {
        self.get_bike(bike_id).await?;
        let log = MaintenanceLog {
            id: Uuid::new_v4(),
            bike_id,
            notes: input.notes,
            mechanic_required: input.mechanic_required,
            checked_by: actor.id,
            checked_at: input.checked_at.unwrap_or_else(|| self.clock.now_utc()),
        };
        self.store.insert_maintenance_log(&log).await?;
        Ok(log)
    }

    pub async fn update_maintenance_log(
        &self,
        bike_id: Uuid,
        log_id: Uuid,
        input: MaintenanceLogInput,
        actor: &Actor,
    ) -> Result<MaintenanceLog, AppError> {
        let existing = self
            .store
            .find_maintenance_log(log_id)
            .await?
            .filter(|log| log.bike_id == bike_id)
            .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

        let log = MaintenanceLog {
            notes: input.notes,
            mechanic_required: input.mechanic_required,
            checked_by: actor.id,
            checked_at: input.checked_at.unwrap_or(existing.checked_at),
            ..existing
        };
        if !self.store.update_maintenance_log(&log).await? {
            return Err(AppError::NotFound("Maintenance log not found".to_string()));
        }
        Ok(log)
    }

    pub async fn delete_maintenance_log(&self, bike_id: Uuid, log_id: Uuid) -> Result<(), AppError> {
        let found = self
            .store
            .find_maintenance_log(log_id)
            .await?
            .is_some_and(|log| log.bike_id == bike_id);
        if !found || !self.store.delete_maintenance_log(log_id).await? {
            return Err(AppError::NotFound("Maintenance log not found".to_string()));
        }
        Ok(())
    }

    pub async fn operator_report(&self, shift_id: Uuid) -> Result<Option<OperatorReport>, AppError> {
        Ok(self.store.operator_report_for_shift(shift_id).await?)
    }

    /// Records the bike condition for a shift, replacing an earlier report.
    pub async fn save_operator_report(
        &self,
        shift_id: Uuid,
        input: OperatorReportInput,
        actor: &Actor,
    ) -> Result<OperatorReport, AppError> {
        let shift = self
            .store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

        let report = OperatorReport {
            id: Uuid::new_v4(),
            bike_id: shift.bike_id,
            shift_id,
            checked_by: actor.id,
            checked_at: self.clock.now_utc(),
            condition: input.condition,
            notes: input.notes,
            fuel_level: input.fuel_level.clamp(0, 100),
            locked_up: input.locked_up,
            clothes_returned: input.clothes_returned,
            key_returned: input.key_returned,
            mechanic_required: input.mechanic_required,
            mechanic_alert_reason: input.mechanic_alert_reason,
        };
        let saved = self.store.upsert_operator_report(&report).await?;
        if saved.mechanic_required {
            log::warn!(
                "Bike {} flagged for a mechanic after shift {}",
                saved.bike_id,
                shift_id
            );
        }
        Ok(saved)
    }

    /// Newest shift first.
    pub async fn operator_reports_for_bike(
        &self,
        bike_id: Uuid,
    ) -> Result<Vec<OperatorReport>, AppError> {
        self.get_bike(bike_id).await?;
        Ok(self.store.operator_reports_for_bike(bike_id).await?)
    }

    async fn validate_bike(&self, input: &BikeInput) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if self.store.find_garage(input.garage_id).await?.is_none() {
            errors.push("Garage does not exist".to_string());
        }
        if input.engine_size < 0 {
            errors.push("Engine size: must not be negative".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn validate_garage(input: &GarageInput) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push("Name: must not be empty".to_string());
    }
    if input.capacity < 0 {
        errors.push("Capacity: must not be negative".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
