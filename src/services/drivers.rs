use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::database::FleetStore;
use crate::database::models::{Driver, DriverFilter, DriverInput};
use crate::error::AppError;
use crate::services::actor::Actor;
use crate::services::notifier::{self, Mail, Notifier, templates};

const BLOCKED_SUBJECT: &str = "Fleet Account Suspended";
const UNBLOCKED_SUBJECT: &str = "Fleet Account Re-instated";

/// Administration of driver accounts.
#[derive(Clone)]
pub struct DriverService {
    store: Arc<dyn FleetStore>,
    notifier: Arc<dyn Notifier>,
}

impl DriverService {
    pub fn new(store: Arc<dyn FleetStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn list_drivers(&self, filter: &DriverFilter) -> Result<Vec<Driver>, AppError> {
        Ok(self.store.list_drivers(filter).await?)
    }

    pub async fn get_driver(&self, id: Uuid) -> Result<Driver, AppError> {
        self.store
            .find_driver(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    /// Renames a driver or changes the licence that limits their bikes.
    pub async fn update_driver(&self, id: Uuid, input: DriverInput) -> Result<Driver, AppError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name: cannot be empty"));
        }

        let mut driver = self.get_driver(id).await?;
        driver.name = name.to_string();
        driver.license = input.license;
        if !self.store.update_driver(&driver).await? {
            return Err(AppError::NotFound("Driver not found".to_string()));
        }
        log::info!("Driver {} updated ({})", id, driver.license.as_str());
        Ok(driver)
    }

    /// Suspends or reinstates a driver and tells them by mail.
    pub async fn set_blocked(
        &self,
        id: Uuid,
        blocked: bool,
        actor: &Actor,
    ) -> Result<Driver, AppError> {
        if id == actor.id {
            return Err(AppError::validation("You cannot block yourself"));
        }

        let mut driver = self.get_driver(id).await?;
        if !self.store.set_driver_blocked(id, blocked).await? {
            return Err(AppError::NotFound("Driver not found".to_string()));
        }
        driver.blocked = blocked;
        log::info!(
            "Driver {} {} by {}",
            id,
            if blocked { "blocked" } else { "unblocked" },
            actor.id
        );

        let (subject, template) = if blocked {
            (BLOCKED_SUBJECT, templates::USER_BLOCKED)
        } else {
            (UNBLOCKED_SUBJECT, templates::USER_UNBLOCKED)
        };
        notifier::dispatch(
            self.notifier.clone(),
            Mail {
                to: driver.email.clone(),
                subject: subject.to_string(),
                template: template.to_string(),
                data: json!({ "UserName": driver.name }),
            },
        );
        Ok(driver)
    }
}
