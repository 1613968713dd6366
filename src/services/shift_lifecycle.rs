//! Booking, approval and check-in/out of shifts.
//!
//! Conflicts are settled at confirmation time: any number of `created`
//! bookings may share a bike and day, and confirming one of them cancels the
//! rest.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::database::FleetStore;
use crate::database::models::{
    Bike, BikeCalendar, BikeDay, CreateShiftInput, Deletion, Driver, Shift, ShiftDetail,
    ShiftPatch, ShiftStatus, deletion_reason,
};
use crate::error::AppError;
use crate::services::actor::Actor;
use crate::services::availability::AvailabilityResolver;
use crate::services::clock::{self, Clock};
use crate::services::notifier::{self, Mail, Notifier, templates};

const SHIFT_CONFIRMED_SUBJECT: &str = "Fleet Shift Confirmed";

#[derive(Clone)]
pub struct ShiftLifecycle {
    store: Arc<dyn FleetStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    availability: AvailabilityResolver,
}

impl ShiftLifecycle {
    pub fn new(
        store: Arc<dyn FleetStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let availability = AvailabilityResolver::new(store.clone(), clock.clone());
        Self {
            store,
            clock,
            notifier,
            availability,
        }
    }

    /// Books `input` for `driver_id` in `created` status.
    ///
    /// Every validation problem is reported at once. Administrators may book
    /// into the past.
    pub async fn create_shift(
        &self,
        input: CreateShiftInput,
        driver_id: Uuid,
        actor: &Actor,
    ) -> Result<Shift, AppError> {
        let now = self.clock.now();
        let mut errors = Vec::new();

        if self.store.find_garage(input.garage_id).await?.is_none() {
            errors.push("Garage does not exist".to_string());
        }

        if !(0..24).contains(&input.hour) {
            errors.push("Hour: must be between 0 and 23".to_string());
        }

        let mut shift_date = None;
        match clock::parse_day(&input.date, self.clock.offset()) {
            None => errors.push(clock::INVALID_DATE.to_string()),
            Some(day_start) if day_start + Duration::hours(24) < now && !actor.is_admin => {
                errors.push("Date: must be in the future".to_string());
            }
            Some(day_start) => {
                let date = day_start + Duration::hours(i64::from(input.hour));
                if date < now && !actor.is_admin {
                    errors.push("Date: cannot book a past shift".to_string());
                }
                shift_date = Some(date.with_timezone(&Utc));
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let Some(shift_date) = shift_date else {
            return Err(AppError::validation(clock::INVALID_DATE));
        };

        let driver = self
            .store
            .find_driver(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;
        if driver.blocked && !actor.is_admin {
            return Err(AppError::Forbidden("Account suspended".to_string()));
        }

        let free = self
            .availability
            .available_bikes(input.garage_id, shift_date, 0)
            .await?;
        if !free.iter().any(|bike| bike.id == input.bike_id) {
            log::warn!(
                "Bike {} is not available on {} for driver {}",
                input.bike_id,
                shift_date,
                driver_id
            );
            return Err(AppError::Conflict(
                "Bike is no longer available on this day".to_string(),
            ));
        }

        let shift = Shift::booked(
            input.garage_id,
            input.bike_id,
            driver.id,
            shift_date,
            actor.id,
            self.clock.now_utc(),
        );
        self.store.insert_shift(&shift).await?;

        log::info!(
            "Shift {} booked on bike {} for driver {} by {}",
            shift.id,
            shift.bike_id,
            shift.driver_id,
            actor.id
        );
        Ok(shift)
    }

    /// Confirms a shift after cancelling every other `created` booking of the
    /// same bike on the same local day.
    pub async fn confirm_shift(&self, id: Uuid, actor: &Actor) -> Result<Shift, AppError> {
        let shift = self.load_unpaid(id).await?;
        let (from, until) = clock::day_bounds(shift.date, self.clock.offset());
        let slot = BikeDay {
            garage_id: shift.garage_id,
            bike_id: shift.bike_id,
            from,
            until,
        };
        let superseded = self
            .store
            .cancel_shifts(
                &slot,
                ShiftStatus::Created,
                shift.id,
                &self.deletion(deletion_reason::SUPERSEDED, actor),
            )
            .await?;
        if superseded > 0 {
            log::warn!(
                "Confirming shift {} superseded {} other bookings of bike {}",
                shift.id,
                superseded,
                shift.bike_id
            );
        }

        let confirmed = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} confirmed by {}", id, actor.id);

        self.notify_confirmed(&confirmed).await;
        Ok(confirmed)
    }

    /// Cancels one booking; other bookings of the slot are left alone.
    pub async fn reject_shift(&self, id: Uuid, actor: &Actor) -> Result<Shift, AppError> {
        self.load_unpaid(id).await?;
        let rejected = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Cancelled),
                    deletion: Some(Some(self.deletion(deletion_reason::REJECTED, actor))),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} rejected by {}", id, actor.id);
        Ok(rejected)
    }

    /// Moves a shift onto another bike and confirms it.
    ///
    /// The new bike's availability is not checked, so this can produce two
    /// confirmed shifts for one bike and day.
    pub async fn reassign_bike(
        &self,
        id: Uuid,
        bike_id: Uuid,
        actor: &Actor,
    ) -> Result<Shift, AppError> {
        self.load_unpaid(id).await?;
        if self.store.find_bike(bike_id).await?.is_none() {
            return Err(AppError::NotFound("Bike not found".to_string()));
        }

        let shift = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Confirmed),
                    bike_id: Some(bike_id),
                    deletion: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} reassigned to bike {} by {}", id, bike_id, actor.id);
        Ok(shift)
    }

    pub async fn check_in(
        &self,
        id: Uuid,
        at: Option<DateTime<Utc>>,
        operator: &Actor,
    ) -> Result<Shift, AppError> {
        let shift = self.load_unpaid(id).await?;
        if shift.is_checked_in() {
            return Err(AppError::validation("Shift already checked in"));
        }

        let at = at.unwrap_or_else(|| self.clock.now_utc());
        let shift = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Running),
                    check_in: Some(Some(at)),
                    check_in_operator: Some(Some(operator.id)),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} checked in at {} by {}", id, at, operator.id);
        Ok(shift)
    }

    /// Completes a running shift. The end time is rounded up to the next
    /// quarter hour since shifts are paid in 15 minute blocks.
    pub async fn check_out(
        &self,
        id: Uuid,
        at: Option<DateTime<Utc>>,
        operator: &Actor,
    ) -> Result<Shift, AppError> {
        let shift = self.load_unpaid(id).await?;
        if !shift.is_checked_in() {
            return Err(AppError::NotCheckedIn);
        }

        let at = clock::round_up_quarter(
            at.unwrap_or_else(|| self.clock.now_utc()),
            self.clock.offset(),
        );
        let shift = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Complete),
                    check_out: Some(Some(at)),
                    check_out_operator: Some(Some(operator.id)),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} checked out at {} by {}", id, at, operator.id);
        Ok(shift)
    }

    /// Undoes check-in and check-out.
    pub async fn reset_shift(&self, id: Uuid) -> Result<Shift, AppError> {
        self.load_unpaid(id).await?;
        let shift = self
            .patch(
                id,
                ShiftPatch {
                    status: Some(ShiftStatus::Created),
                    check_in: Some(None),
                    check_in_operator: Some(None),
                    check_out: Some(None),
                    check_out_operator: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("Shift {} reset", id);
        Ok(shift)
    }

    /// Removes a booking of `owner` for good. Only bookings that have not
    /// started and are not deleted qualify.
    pub async fn cancel_shift(&self, id: Uuid, owner: Uuid, actor: &Actor) -> Result<(), AppError> {
        let shift = self
            .store
            .find_shift(id)
            .await?
            .filter(|shift| shift.driver_id == owner)
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

        if shift.date < self.clock.now_utc() || shift.is_checked_in() {
            return Err(AppError::AlreadyStarted);
        }
        if shift.deleted {
            return Err(AppError::AlreadyDeleted);
        }

        if !self.store.remove_shift(id).await? {
            return Err(AppError::NotFound("Shift not found".to_string()));
        }
        log::info!("Shift {} of driver {} cancelled by {}", id, owner, actor.id);
        Ok(())
    }

    pub async fn set_notes(&self, id: Uuid, notes: String) -> Result<Shift, AppError> {
        self.load_unpaid(id).await?;
        self.patch(
            id,
            ShiftPatch {
                notes: Some(notes),
                ..Default::default()
            },
        )
        .await
    }

    /// A driver's shifts in a local calendar month, with their bikes.
    pub async fn driver_month(
        &self,
        driver_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<ShiftDetail>, AppError> {
        let (from, until) = clock::month_bounds(year, month, self.clock.offset())
            .ok_or_else(|| AppError::validation("Invalid year or month"))?;
        let shifts = self.store.driver_shifts(driver_id, from, until).await?;
        let mut bikes = HashMap::new();

        let mut details = Vec::with_capacity(shifts.len());
        for shift in shifts {
            let bike = self.bike_cached(&mut bikes, shift.bike_id).await?;
            details.push(ShiftDetail {
                shift,
                bike,
                driver: None,
            });
        }
        Ok(details)
    }

    pub async fn driver_history(
        &self,
        driver_id: Uuid,
        only_paid: bool,
    ) -> Result<Vec<Shift>, AppError> {
        Ok(self.store.driver_history(driver_id, only_paid).await?)
    }

    /// Every shift of a local day grouped per bike. Groups appear in the
    /// order of their earliest shift.
    pub async fn calendar(&self, day: &str) -> Result<Vec<BikeCalendar>, AppError> {
        let start = clock::parse_day(day, self.clock.offset())
            .ok_or_else(|| AppError::validation(clock::INVALID_DATE))?;
        let (from, until) = clock::day_bounds(start.with_timezone(&Utc), self.clock.offset());
        let shifts = self.store.shifts_between(from, until).await?;

        let mut bikes = HashMap::new();
        let mut drivers = HashMap::new();
        let mut calendar: Vec<BikeCalendar> = Vec::new();
        for shift in shifts {
            // shifts whose driver is gone are not shown
            let Some(driver) = self.driver_cached(&mut drivers, shift.driver_id).await? else {
                continue;
            };
            let bike = self.bike_cached(&mut bikes, shift.bike_id).await?;
            let detail = ShiftDetail {
                shift,
                bike,
                driver: Some(driver),
            };

            match calendar
                .iter_mut()
                .find(|row| row.bike_id == detail.shift.bike_id)
            {
                Some(row) => row.shifts.push(detail),
                None => calendar.push(BikeCalendar {
                    bike_id: detail.shift.bike_id,
                    shifts: vec![detail],
                }),
            }
        }
        Ok(calendar)
    }

    pub async fn shift_info(&self, id: Uuid) -> Result<ShiftDetail, AppError> {
        let shift = self.load(id).await?;
        let bike = self.store.find_bike(shift.bike_id).await?;
        let driver = self.store.find_driver(shift.driver_id).await?;
        Ok(ShiftDetail {
            shift,
            bike,
            driver,
        })
    }

    pub async fn load(&self, id: Uuid) -> Result<Shift, AppError> {
        self.store
            .find_shift(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
    }

    /// Paid shifts only accept payroll changes.
    async fn load_unpaid(&self, id: Uuid) -> Result<Shift, AppError> {
        let shift = self.load(id).await?;
        if shift.paid {
            return Err(AppError::validation("Shift has already been paid"));
        }
        Ok(shift)
    }

    async fn patch(&self, id: Uuid, patch: ShiftPatch) -> Result<Shift, AppError> {
        self.store
            .update_shift(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
    }

    fn deletion(&self, reason: &str, actor: &Actor) -> Deletion {
        Deletion {
            reason: reason.to_string(),
            by: actor.id,
            at: self.clock.now_utc(),
        }
    }

    async fn bike_cached(
        &self,
        cache: &mut HashMap<Uuid, Option<Bike>>,
        id: Uuid,
    ) -> Result<Option<Bike>, AppError> {
        if let Some(bike) = cache.get(&id) {
            return Ok(bike.clone());
        }
        let bike = self.store.find_bike(id).await?;
        cache.insert(id, bike.clone());
        Ok(bike)
    }

    async fn driver_cached(
        &self,
        cache: &mut HashMap<Uuid, Option<Driver>>,
        id: Uuid,
    ) -> Result<Option<Driver>, AppError> {
        if let Some(driver) = cache.get(&id) {
            return Ok(driver.clone());
        }
        let driver = self.store.find_driver(id).await?;
        cache.insert(id, driver.clone());
        Ok(driver)
    }

    /// Lookup failures only cost the mail, never the confirmation.
    async fn notify_confirmed(&self, shift: &Shift) {
        let driver = match self.store.find_driver(shift.driver_id).await {
            Ok(Some(driver)) => driver,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Skipping confirmation mail for shift {}: {}", shift.id, e);
                return;
            }
        };

        let local = shift.date.with_timezone(&self.clock.offset());
        notifier::dispatch(
            self.notifier.clone(),
            Mail {
                to: driver.email,
                subject: SHIFT_CONFIRMED_SUBJECT.to_string(),
                template: templates::SHIFT_CONFIRMED.to_string(),
                data: json!({
                    "UserName": driver.name,
                    "Date": local.format(clock::DAY_FORMAT).to_string(),
                    "Time": local.format("%H:%M").to_string(),
                }),
            },
        );
    }
}
