//! Storage seams used by the services.
//!
//! Every method is a single statement against one table, so each call is
//! atomic on its own. Nothing here spans rows in a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    Bike, BikeDay, BikeFilter, Deletion, Driver, DriverFilter, Garage, MaintenanceLog,
    OperatorReport, Shift, ShiftPatch, ShiftStatus,
};

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait GarageStore: Send + Sync {
    async fn list_garages(&self) -> StoreResult<Vec<Garage>>;
    async fn find_garage(&self, id: Uuid) -> StoreResult<Option<Garage>>;
    async fn insert_garage(&self, garage: &Garage) -> StoreResult<()>;
    async fn update_garage(&self, garage: &Garage) -> StoreResult<bool>;
    async fn delete_garage(&self, id: Uuid) -> StoreResult<bool>;
    /// True while any bike, archived or not, or any shift points at the garage.
    async fn garage_in_use(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait BikeStore: Send + Sync {
    /// Matching bikes ordered by `bike_number`.
    async fn find_bikes(&self, filter: &BikeFilter) -> StoreResult<Vec<Bike>>;
    async fn find_bike(&self, id: Uuid) -> StoreResult<Option<Bike>>;
    async fn insert_bike(&self, bike: &Bike) -> StoreResult<()>;
    async fn update_bike(&self, bike: &Bike) -> StoreResult<bool>;
}

#[async_trait]
pub trait DriverStore: Send + Sync {
    async fn find_driver(&self, id: Uuid) -> StoreResult<Option<Driver>>;
    /// Matching drivers ordered by name.
    async fn list_drivers(&self, filter: &DriverFilter) -> StoreResult<Vec<Driver>>;
    /// Writes name and licence.
    async fn update_driver(&self, driver: &Driver) -> StoreResult<bool>;
    async fn set_driver_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<bool>;
}

#[async_trait]
pub trait ShiftStore: Send + Sync {
    async fn find_shift(&self, id: Uuid) -> StoreResult<Option<Shift>>;

    /// Counts non-deleted shifts in `slot` with the given status.
    async fn count_shifts(&self, slot: &BikeDay, status: ShiftStatus) -> StoreResult<i64>;

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()>;

    /// Returns the updated row, or `None` if the shift does not exist.
    async fn update_shift(&self, id: Uuid, patch: &ShiftPatch) -> StoreResult<Option<Shift>>;

    /// Hard delete.
    async fn remove_shift(&self, id: Uuid) -> StoreResult<bool>;

    /// Marks every shift in `slot` with `status`, except `exclude`, as
    /// cancelled and soft-deleted. Returns the number of rows touched.
    async fn cancel_shifts(
        &self,
        slot: &BikeDay,
        status: ShiftStatus,
        exclude: Uuid,
        deletion: &Deletion,
    ) -> StoreResult<u64>;

    /// Non-deleted shifts of a driver in `[from, until)`, any status, oldest first.
    async fn driver_shifts(
        &self,
        driver_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>>;

    /// Completed, non-deleted shifts of a driver, newest first.
    async fn driver_history(&self, driver_id: Uuid, only_paid: bool) -> StoreResult<Vec<Shift>>;

    /// Non-deleted shifts in `[from, until)` regardless of bike, oldest first.
    async fn shifts_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>>;

    /// Completed shifts awaiting payment, oldest first.
    async fn unpaid_complete_shifts(&self) -> StoreResult<Vec<Shift>>;
}

#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Newest first.
    async fn maintenance_logs(&self, bike_id: Uuid) -> StoreResult<Vec<MaintenanceLog>>;
    async fn find_maintenance_log(&self, id: Uuid) -> StoreResult<Option<MaintenanceLog>>;
    async fn insert_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<()>;
    async fn update_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<bool>;
    async fn delete_maintenance_log(&self, id: Uuid) -> StoreResult<bool>;

    async fn operator_report_for_shift(&self, shift_id: Uuid)
    -> StoreResult<Option<OperatorReport>>;
    /// Insert or replace the report keyed by `shift_id`.
    async fn upsert_operator_report(&self, report: &OperatorReport) -> StoreResult<OperatorReport>;
    async fn operator_reports_for_bike(&self, bike_id: Uuid) -> StoreResult<Vec<OperatorReport>>;

    /// Ids of bikes with a log or report flagged `mechanic_required`.
    async fn bikes_needing_mechanic(&self) -> StoreResult<Vec<Uuid>>;
}

/// Everything the HTTP layer needs from storage.
pub trait FleetStore: GarageStore + BikeStore + DriverStore + ShiftStore + MaintenanceStore {}

impl<T> FleetStore for T where T: GarageStore + BikeStore + DriverStore + ShiftStore + MaintenanceStore
{}
