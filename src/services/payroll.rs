use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use serde_json::json;

use crate::database::FleetStore;
use crate::database::models::{
    Deletion, PayoutInput, Payment, Shift, ShiftDetail, ShiftPatch, ShiftStatus, deletion_reason,
};
use crate::error::AppError;
use crate::services::actor::Actor;
use crate::services::clock::Clock;
use crate::services::notifier::{self, Mail, Notifier, templates};

const PAYOUT_SUBJECT: &str = "Fleet Payment Confirmation";

#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn FleetStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl PayrollService {
    pub fn new(
        store: Arc<dyn FleetStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Completed shifts awaiting payment, oldest first, with their drivers.
    pub async fn outstanding(&self) -> Result<Vec<ShiftDetail>, AppError> {
        let shifts = self.store.unpaid_complete_shifts().await?;
        let mut drivers = HashMap::new();

        let mut details = Vec::with_capacity(shifts.len());
        for shift in shifts {
            let driver = match drivers.get(&shift.driver_id) {
                Some(driver) => Option::clone(driver),
                None => {
                    let driver = self.store.find_driver(shift.driver_id).await?;
                    drivers.insert(shift.driver_id, driver.clone());
                    driver
                }
            };
            details.push(ShiftDetail {
                shift,
                bike: None,
                driver,
            });
        }
        Ok(details)
    }

    /// Marks the listed shifts paid. Lines flagged `removed` are paid at zero
    /// and soft-deleted. Nothing is written unless every line is valid.
    pub async fn payout(&self, input: PayoutInput, actor: &Actor) -> Result<Vec<Shift>, AppError> {
        let driver = self
            .store
            .find_driver(input.driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        let zero = BigDecimal::from(0);
        let mut errors = Vec::new();
        for line in &input.shifts {
            match self.store.find_shift(line.shift).await? {
                None => errors.push(format!("Shift {} does not exist", line.shift)),
                Some(shift) if shift.driver_id != driver.id => {
                    errors.push(format!("Shift {} does not belong to this driver", line.shift))
                }
                Some(shift) if shift.status != ShiftStatus::Complete => {
                    errors.push(format!("Shift {} is not complete", line.shift))
                }
                Some(_) if line.total < zero => {
                    errors.push(format!("Shift {}: total must not be negative", line.shift))
                }
                Some(_) => {}
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let now = self.clock.now_utc();
        let mut paid = Vec::with_capacity(input.shifts.len());
        for line in input.shifts {
            let patch = ShiftPatch {
                payment: Some(Payment {
                    amount: if line.removed {
                        zero.clone()
                    } else {
                        line.total
                    },
                    by: actor.id,
                    at: now,
                }),
                deletion: line.removed.then(|| {
                    Some(Deletion {
                        reason: deletion_reason::PAYROLL.to_string(),
                        by: actor.id,
                        at: now,
                    })
                }),
                ..Default::default()
            };
            let shift = self
                .store
                .update_shift(line.shift, &patch)
                .await?
                .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;
            paid.push(shift);
        }
        log::info!(
            "Paid out {} shifts to driver {} by {}",
            paid.len(),
            driver.id,
            actor.id
        );

        notifier::dispatch(
            self.notifier.clone(),
            Mail {
                to: driver.email,
                subject: PAYOUT_SUBJECT.to_string(),
                template: templates::USER_PAYOUT.to_string(),
                data: json!({ "UserName": driver.name }),
            },
        );
        Ok(paid)
    }
}
