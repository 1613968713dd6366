//! In-process store used by tests and local demos.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{
    Bike, BikeDay, BikeFilter, Deletion, Driver, DriverFilter, Garage, MaintenanceLog,
    OperatorReport, Shift, ShiftPatch, ShiftStatus,
};
use crate::database::store::{
    BikeStore, DriverStore, GarageStore, MaintenanceStore, ShiftStore, StoreResult,
};

#[derive(Default)]
struct Tables {
    garages: HashMap<Uuid, Garage>,
    bikes: HashMap<Uuid, Bike>,
    drivers: HashMap<Uuid, Driver>,
    shifts: HashMap<Uuid, Shift>,
    maintenance: HashMap<Uuid, MaintenanceLog>,
    reports: HashMap<Uuid, OperatorReport>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_driver(&self, driver: Driver) {
        self.tables.write().await.drivers.insert(driver.id, driver);
    }

    /// Makes every subsequent call fail like a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn all_shifts(&self) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self.tables.read().await.shifts.values().cloned().collect();
        shifts.sort_by_key(|s| (s.date, s.added_at));
        shifts
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl GarageStore for MemoryStore {
    async fn list_garages(&self) -> StoreResult<Vec<Garage>> {
        self.check()?;
        let mut garages: Vec<Garage> = self.tables.read().await.garages.values().cloned().collect();
        garages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(garages)
    }

    async fn find_garage(&self, id: Uuid) -> StoreResult<Option<Garage>> {
        self.check()?;
        Ok(self.tables.read().await.garages.get(&id).cloned())
    }

    async fn insert_garage(&self, garage: &Garage) -> StoreResult<()> {
        self.check()?;
        self.tables
            .write()
            .await
            .garages
            .insert(garage.id, garage.clone());
        Ok(())
    }

    async fn update_garage(&self, garage: &Garage) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        match tables.garages.get_mut(&garage.id) {
            Some(existing) => {
                *existing = garage.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_garage(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        Ok(self.tables.write().await.garages.remove(&id).is_some())
    }

    async fn garage_in_use(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.bikes.values().any(|bike| bike.garage_id == id)
            || tables.shifts.values().any(|shift| shift.garage_id == id))
    }
}

#[async_trait]
impl BikeStore for MemoryStore {
    async fn find_bikes(&self, filter: &BikeFilter) -> StoreResult<Vec<Bike>> {
        self.check()?;
        let mut bikes: Vec<Bike> = self
            .tables
            .read()
            .await
            .bikes
            .values()
            .filter(|bike| filter.matches(bike))
            .cloned()
            .collect();
        bikes.sort_by_key(|bike| bike.bike_number);
        Ok(bikes)
    }

    async fn find_bike(&self, id: Uuid) -> StoreResult<Option<Bike>> {
        self.check()?;
        Ok(self.tables.read().await.bikes.get(&id).cloned())
    }

    async fn insert_bike(&self, bike: &Bike) -> StoreResult<()> {
        self.check()?;
        self.tables.write().await.bikes.insert(bike.id, bike.clone());
        Ok(())
    }

    async fn update_bike(&self, bike: &Bike) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        match tables.bikes.get_mut(&bike.id) {
            Some(existing) => {
                *existing = bike.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DriverStore for MemoryStore {
    async fn find_driver(&self, id: Uuid) -> StoreResult<Option<Driver>> {
        self.check()?;
        Ok(self.tables.read().await.drivers.get(&id).cloned())
    }

    async fn list_drivers(&self, filter: &DriverFilter) -> StoreResult<Vec<Driver>> {
        self.check()?;
        let mut drivers: Vec<Driver> = self
            .tables
            .read()
            .await
            .drivers
            .values()
            .filter(|driver| filter.matches(driver))
            .cloned()
            .collect();
        drivers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drivers)
    }

    async fn update_driver(&self, driver: &Driver) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        match tables.drivers.get_mut(&driver.id) {
            Some(existing) => {
                existing.name = driver.name.clone();
                existing.license = driver.license;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_driver_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        match tables.drivers.get_mut(&id) {
            Some(driver) => {
                driver.blocked = blocked;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ShiftStore for MemoryStore {
    async fn find_shift(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        self.check()?;
        Ok(self.tables.read().await.shifts.get(&id).cloned())
    }

    async fn count_shifts(&self, slot: &BikeDay, status: ShiftStatus) -> StoreResult<i64> {
        self.check()?;
        let count = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| slot.contains(s) && !s.deleted && s.status == status)
            .count();
        Ok(count as i64)
    }

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        self.check()?;
        self.tables
            .write()
            .await
            .shifts
            .insert(shift.id, shift.clone());
        Ok(())
    }

    async fn update_shift(&self, id: Uuid, patch: &ShiftPatch) -> StoreResult<Option<Shift>> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(tables.shifts.get_mut(&id).map(|shift| {
            patch.apply(shift);
            shift.clone()
        }))
    }

    async fn remove_shift(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let removed = tables.shifts.remove(&id).is_some();
        tables.reports.retain(|_, report| report.shift_id != id);
        Ok(removed)
    }

    async fn cancel_shifts(
        &self,
        slot: &BikeDay,
        status: ShiftStatus,
        exclude: Uuid,
        deletion: &Deletion,
    ) -> StoreResult<u64> {
        self.check()?;
        let patch = ShiftPatch {
            status: Some(ShiftStatus::Cancelled),
            deletion: Some(Some(deletion.clone())),
            ..Default::default()
        };

        let mut touched = 0;
        for shift in self.tables.write().await.shifts.values_mut() {
            if shift.id != exclude && shift.status == status && slot.contains(shift) {
                patch.apply(shift);
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn driver_shifts(
        &self,
        driver_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>> {
        self.check()?;
        let mut shifts: Vec<Shift> = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| {
                !s.deleted && s.driver_id == driver_id && s.date >= from && s.date < until
            })
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.date);
        Ok(shifts)
    }

    async fn driver_history(&self, driver_id: Uuid, only_paid: bool) -> StoreResult<Vec<Shift>> {
        self.check()?;
        let mut shifts: Vec<Shift> = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| {
                s.driver_id == driver_id
                    && s.status == ShiftStatus::Complete
                    && !s.deleted
                    && (!only_paid || s.paid)
            })
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(shifts)
    }

    async fn shifts_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<Shift>> {
        self.check()?;
        let mut shifts: Vec<Shift> = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| !s.deleted && s.date >= from && s.date < until)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.date);
        Ok(shifts)
    }

    async fn unpaid_complete_shifts(&self) -> StoreResult<Vec<Shift>> {
        self.check()?;
        let mut shifts: Vec<Shift> = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| !s.paid && s.status == ShiftStatus::Complete)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.date);
        Ok(shifts)
    }
}

#[async_trait]
impl MaintenanceStore for MemoryStore {
    async fn maintenance_logs(&self, bike_id: Uuid) -> StoreResult<Vec<MaintenanceLog>> {
        self.check()?;
        let mut logs: Vec<MaintenanceLog> = self
            .tables
            .read()
            .await
            .maintenance
            .values()
            .filter(|log| log.bike_id == bike_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        Ok(logs)
    }

    async fn find_maintenance_log(&self, id: Uuid) -> StoreResult<Option<MaintenanceLog>> {
        self.check()?;
        Ok(self.tables.read().await.maintenance.get(&id).cloned())
    }

    async fn insert_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<()> {
        self.check()?;
        self.tables
            .write()
            .await
            .maintenance
            .insert(log.id, log.clone());
        Ok(())
    }

    async fn update_maintenance_log(&self, log: &MaintenanceLog) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        match tables.maintenance.get_mut(&log.id) {
            Some(existing) if existing.bike_id == log.bike_id => {
                *existing = log.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_maintenance_log(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        Ok(self.tables.write().await.maintenance.remove(&id).is_some())
    }

    async fn operator_report_for_shift(
        &self,
        shift_id: Uuid,
    ) -> StoreResult<Option<OperatorReport>> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .await
            .reports
            .values()
            .find(|report| report.shift_id == shift_id)
            .cloned())
    }

    async fn upsert_operator_report(&self, report: &OperatorReport) -> StoreResult<OperatorReport> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let existing_id = tables
            .reports
            .values()
            .find(|r| r.shift_id == report.shift_id)
            .map(|r| r.id);

        let mut stored = report.clone();
        if let Some(id) = existing_id {
            stored.id = id;
        }
        tables.reports.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn operator_reports_for_bike(&self, bike_id: Uuid) -> StoreResult<Vec<OperatorReport>> {
        self.check()?;
        let tables = self.tables.read().await;
        let mut reports: Vec<(Option<DateTime<Utc>>, OperatorReport)> = tables
            .reports
            .values()
            .filter(|report| report.bike_id == bike_id)
            .map(|report| {
                let date = tables.shifts.get(&report.shift_id).map(|s| s.date);
                (date, report.clone())
            })
            .collect();
        reports.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(reports.into_iter().map(|(_, report)| report).collect())
    }

    async fn bikes_needing_mechanic(&self) -> StoreResult<Vec<Uuid>> {
        self.check()?;
        let tables = self.tables.read().await;
        let ids: BTreeSet<Uuid> = tables
            .maintenance
            .values()
            .filter(|log| log.mechanic_required)
            .map(|log| log.bike_id)
            .chain(
                tables
                    .reports
                    .values()
                    .filter(|report| report.mechanic_required)
                    .map(|report| report.bike_id),
            )
            .collect();
        Ok(ids.into_iter().collect())
    }
}
