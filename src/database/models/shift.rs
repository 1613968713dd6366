use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::{Bike, Driver};

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ShiftStatus {
        #[default]
        Created => "created",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        Running => "running",
        Complete => "complete",
    }
}

/// Reasons recorded on soft-deleted shifts.
pub mod deletion_reason {
    pub const SUPERSEDED: &str = "superseded";
    pub const REJECTED: &str = "rejected";
    pub const PAYROLL: &str = "payroll";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub bike_id: Uuid,
    pub driver_id: Uuid,
    /// Local day start plus the booked hour offset.
    pub date: DateTime<Utc>,
    pub status: ShiftStatus,
    pub check_in: Option<DateTime<Utc>>,
    pub check_in_operator: Option<Uuid>,
    pub check_out: Option<DateTime<Utc>>,
    pub check_out_operator: Option<Uuid>,
    pub notes: String,
    pub paid: bool,
    pub paid_amount: Option<BigDecimal>,
    pub paid_by: Option<Uuid>,
    pub paid_at: Option<DateTime<Utc>>,
    pub added_at: DateTime<Utc>,
    pub added_by: Uuid,
    pub deleted: bool,
    pub deleted_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl Shift {
    /// A fresh booking in `created` status.
    pub fn booked(
        garage_id: Uuid,
        bike_id: Uuid,
        driver_id: Uuid,
        date: DateTime<Utc>,
        added_by: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            garage_id,
            bike_id,
            driver_id,
            date,
            status: ShiftStatus::Created,
            check_in: None,
            check_in_operator: None,
            check_out: None,
            check_out_operator: None,
            notes: String::new(),
            paid: false,
            paid_amount: None,
            paid_by: None,
            paid_at: None,
            added_at: now,
            added_by,
            deleted: false,
            deleted_reason: None,
            deleted_at: None,
            deleted_by: None,
        }
    }

    pub fn is_checked_in(&self) -> bool {
        self.check_in.is_some()
    }
}

/// Soft-delete stamp applied together with `cancelled` status.
#[derive(Debug, Clone)]
pub struct Deletion {
    pub reason: String,
    pub by: Uuid,
    pub at: DateTime<Utc>,
}

/// Shifts of one bike inside a `[from, until)` window.
#[derive(Debug, Clone)]
pub struct BikeDay {
    pub garage_id: Uuid,
    pub bike_id: Uuid,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl BikeDay {
    pub fn contains(&self, shift: &Shift) -> bool {
        shift.garage_id == self.garage_id
            && shift.bike_id == self.bike_id
            && shift.date >= self.from
            && shift.date < self.until
    }
}

/// Partial update of the mutable shift columns; `None` leaves a column as is.
#[derive(Debug, Clone, Default)]
pub struct ShiftPatch {
    pub status: Option<ShiftStatus>,
    pub bike_id: Option<Uuid>,
    pub check_in: Option<Option<DateTime<Utc>>>,
    pub check_in_operator: Option<Option<Uuid>>,
    pub check_out: Option<Option<DateTime<Utc>>>,
    pub check_out_operator: Option<Option<Uuid>>,
    pub notes: Option<String>,
    pub deletion: Option<Option<Deletion>>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub amount: BigDecimal,
    pub by: Uuid,
    pub at: DateTime<Utc>,
}

impl ShiftPatch {
    pub fn apply(&self, shift: &mut Shift) {
        if let Some(status) = self.status {
            shift.status = status;
        }
        if let Some(bike_id) = self.bike_id {
            shift.bike_id = bike_id;
        }
        if let Some(check_in) = self.check_in {
            shift.check_in = check_in;
        }
        if let Some(operator) = self.check_in_operator {
            shift.check_in_operator = operator;
        }
        if let Some(check_out) = self.check_out {
            shift.check_out = check_out;
        }
        if let Some(operator) = self.check_out_operator {
            shift.check_out_operator = operator;
        }
        if let Some(notes) = &self.notes {
            shift.notes = notes.clone();
        }
        if let Some(deletion) = &self.deletion {
            match deletion {
                Some(d) => {
                    shift.deleted = true;
                    shift.deleted_reason = Some(d.reason.clone());
                    shift.deleted_by = Some(d.by);
                    shift.deleted_at = Some(d.at);
                }
                None => shift.deleted = false,
            }
        }
        if let Some(payment) = &self.payment {
            shift.paid = true;
            shift.paid_amount = Some(payment.amount.clone());
            shift.paid_by = Some(payment.by);
            shift.paid_at = Some(payment.at);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftInput {
    pub garage_id: Uuid,
    pub bike_id: Uuid,
    /// `DD-MM-YYYY`
    pub date: String,
    #[serde(default)]
    pub hour: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckInput {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftNotesInput {
    #[serde(default)]
    pub notes: String,
}

/// Shift joined with its bike and driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDetail {
    #[serde(flatten)]
    pub shift: Shift,
    pub bike: Option<Bike>,
    pub driver: Option<Driver>,
}

/// One row of the admin day calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikeCalendar {
    pub bike_id: Uuid,
    pub shifts: Vec<ShiftDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutLine {
    pub shift: Uuid,
    pub total: BigDecimal,
    #[serde(default)]
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutInput {
    pub driver_id: Uuid,
    pub shifts: Vec<PayoutLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_at(date: &str) -> Shift {
        let now: DateTime<Utc> = "2024-03-01T00:00:00Z".parse().unwrap();
        Shift::booked(
            Uuid::nil(),
            Uuid::nil(),
            Uuid::new_v4(),
            date.parse().unwrap(),
            Uuid::new_v4(),
            now,
        )
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("confirmed".parse::<ShiftStatus>(), Ok(ShiftStatus::Confirmed));
        assert_eq!("COMPLETE".parse::<ShiftStatus>(), Ok(ShiftStatus::Complete));
        assert_eq!(ShiftStatus::Running.to_string(), "running");
        assert!("paused".parse::<ShiftStatus>().is_err());
    }

    #[test]
    fn bike_day_is_half_open() {
        let slot = BikeDay {
            garage_id: Uuid::nil(),
            bike_id: Uuid::nil(),
            from: "2024-03-05T00:00:00Z".parse().unwrap(),
            until: "2024-03-06T00:00:00Z".parse().unwrap(),
        };
        assert!(slot.contains(&shift_at("2024-03-05T00:00:00Z")));
        assert!(slot.contains(&shift_at("2024-03-05T23:59:59Z")));
        assert!(!slot.contains(&shift_at("2024-03-06T00:00:00Z")));
    }

    #[test]
    fn patch_can_undelete() {
        let mut shift = shift_at("2024-03-05T09:00:00Z");
        let by = Uuid::new_v4();
        ShiftPatch {
            deletion: Some(Some(Deletion {
                reason: deletion_reason::REJECTED.to_string(),
                by,
                at: shift.added_at,
            })),
            ..Default::default()
        }
        .apply(&mut shift);
        assert!(shift.deleted);
        assert_eq!(shift.deleted_by, Some(by));

        ShiftPatch {
            deletion: Some(None),
            ..Default::default()
        }
        .apply(&mut shift);
        assert!(!shift.deleted);
        assert_eq!(shift.status, ShiftStatus::Created);
    }
}
