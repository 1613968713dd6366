use std::sync::Arc;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;

use database::FleetStore;
use services::{
    AvailabilityResolver, Clock, DriverService, FleetService, Notifier, PayrollService,
    ShiftLifecycle,
};

/// Services shared by every worker; all of them point at the same store.
pub struct AppState {
    pub fleet: FleetService,
    pub drivers: DriverService,
    pub availability: AvailabilityResolver,
    pub shifts: ShiftLifecycle,
    pub payroll: PayrollService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn FleetStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fleet: FleetService::new(store.clone(), clock.clone()),
            drivers: DriverService::new(store.clone(), notifier.clone()),
            availability: AvailabilityResolver::new(store.clone(), clock.clone()),
            shifts: ShiftLifecycle::new(store.clone(), clock.clone(), notifier.clone()),
            payroll: PayrollService::new(store, clock, notifier),
        }
    }
}
