use bigdecimal::BigDecimal;
use fleet::database::models::{
    BikeInput, GarageInput, LicenseClass, MaintenanceLogInput, OperatorReportInput, PayoutInput,
    PayoutLine, ShiftStatus,
};
use fleet::error::AppError;
use pretty_assertions::assert_eq;
use std::str::FromStr;

mod common;

use common::TestContext;

fn amount(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

#[actix_web::test]
async fn garage_crud() {
    let ctx = TestContext::new();
    let fleet = ctx.fleet();

    let garage = fleet
        .create_garage(GarageInput {
            name: "Camden".to_string(),
            lat: 51.54,
            lng: -0.14,
            capacity: 12,
        })
        .await
        .unwrap();
    assert_eq!(fleet.get_garage(garage.id).await.unwrap(), garage);

    let updated = fleet
        .update_garage(
            garage.id,
            GarageInput {
                name: "Camden Town".to_string(),
                lat: 51.54,
                lng: -0.14,
                capacity: 15,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, garage.id);
    assert_eq!(fleet.list_garages().await.unwrap(), vec![updated]);

    fleet.delete_garage(garage.id).await.unwrap();
    assert!(matches!(
        fleet.get_garage(garage.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[actix_web::test]
async fn garage_with_bikes_cannot_be_deleted() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    ctx.bike(&garage, 1, 125).await;

    let err = ctx.fleet().delete_garage(garage.id).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_web::test]
async fn garage_with_only_archived_bikes_is_kept() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    ctx.shift(&bike, &driver, "2024-02-01T08:00:00Z", ShiftStatus::Complete)
        .await;
    ctx.fleet()
        .archive_bike(bike.id, "Stolen", &ctx.admin)
        .await
        .unwrap();
    assert!(ctx.fleet().list_bikes(Some(garage.id), false).await.unwrap().is_empty());

    let err = ctx.fleet().delete_garage(garage.id).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(ctx.fleet().get_garage(garage.id).await.unwrap().id, garage.id);
}

#[actix_web::test]
async fn garage_needs_a_name() {
    let ctx = TestContext::new();

    let err = ctx
        .fleet()
        .create_garage(GarageInput {
            name: "  ".to_string(),
            lat: 0.0,
            lng: 0.0,
            capacity: 0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
async fn bike_requires_an_existing_garage() {
    let ctx = TestContext::new();

    let err = ctx
        .fleet()
        .create_bike(
            BikeInput {
                garage_id: uuid::Uuid::new_v4(),
                registration: "LX24 AAA".to_string(),
                bike_number: 1,
                vin: String::new(),
                engine_size: 125,
                available: true,
            },
            &ctx.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m[0] == "Garage does not exist"));
}

#[actix_web::test]
async fn archiving_needs_a_reason_and_happens_once() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;

    let err = ctx
        .fleet()
        .archive_bike(bike.id, " ", &ctx.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m[0] == "Please provide a reason for archiving this bike"));

    let archived = ctx
        .fleet()
        .archive_bike(bike.id, "Stolen", &ctx.admin)
        .await
        .unwrap();
    assert!(archived.archived);
    assert!(!archived.available);
    assert_eq!(archived.archived_reason.as_deref(), Some("Stolen"));
    assert_eq!(archived.archived_by, Some(ctx.admin.id));

    let err = ctx
        .fleet()
        .archive_bike(bike.id, "Stolen", &ctx.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m[0] == "Bike is already archived"));

    assert!(ctx.fleet().list_bikes(None, false).await.unwrap().is_empty());
}

#[actix_web::test]
async fn archived_bike_stays_unavailable_after_update() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    ctx.fleet()
        .archive_bike(bike.id, "Engine seized", &ctx.admin)
        .await
        .unwrap();

    let updated = ctx
        .fleet()
        .update_bike(
            bike.id,
            BikeInput {
                garage_id: garage.id,
                registration: bike.registration.clone(),
                bike_number: 1,
                vin: bike.vin.clone(),
                engine_size: 125,
                available: true,
            },
        )
        .await
        .unwrap();

    assert!(!updated.available);
}

#[actix_web::test]
async fn bike_listing_filters_availability() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let on = ctx.bike(&garage, 2, 125).await;
    let off = ctx.bike(&garage, 1, 125).await;
    ctx.fleet()
        .update_bike(
            off.id,
            BikeInput {
                garage_id: garage.id,
                registration: off.registration.clone(),
                bike_number: 1,
                vin: off.vin.clone(),
                engine_size: 125,
                available: false,
            },
        )
        .await
        .unwrap();

    let all: Vec<_> = ctx
        .fleet()
        .list_bikes(None, false)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(all, vec![off.id, on.id]);

    let available: Vec<_> = ctx
        .fleet()
        .list_bikes(Some(garage.id), true)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(available, vec![on.id]);
}

#[actix_web::test]
async fn maintenance_log_lifecycle() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;

    let log = ctx
        .fleet()
        .add_maintenance_log(
            bike.id,
            MaintenanceLogInput {
                notes: "Front brake pads worn".to_string(),
                mechanic_required: true,
                checked_at: None,
            },
            &ctx.admin,
        )
        .await
        .unwrap();
    assert_eq!(log.checked_at, ctx.now());
    assert_eq!(log.checked_by, ctx.admin.id);

    let updated = ctx
        .fleet()
        .update_maintenance_log(
            bike.id,
            log.id,
            MaintenanceLogInput {
                notes: "Pads replaced".to_string(),
                mechanic_required: false,
                checked_at: None,
            },
            &ctx.admin,
        )
        .await
        .unwrap();
    assert_eq!(updated.notes, "Pads replaced");
    assert_eq!(ctx.fleet().maintenance_logs(bike.id).await.unwrap(), vec![updated]);

    // wrong bike
    let other = ctx.bike(&garage, 2, 125).await;
    assert!(matches!(
        ctx.fleet().delete_maintenance_log(other.id, log.id).await,
        Err(AppError::NotFound(_))
    ));

    ctx.fleet()
        .delete_maintenance_log(bike.id, log.id)
        .await
        .unwrap();
    assert!(ctx.fleet().maintenance_logs(bike.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn bikes_needing_a_mechanic_are_deduplicated_and_sorted() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let low = ctx.bike(&garage, 1, 125).await;
    let high = ctx.bike(&garage, 9, 125).await;
    let fine = ctx.bike(&garage, 5, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;

    for bike in [&low, &low] {
        ctx.fleet()
            .add_maintenance_log(
                bike.id,
                MaintenanceLogInput {
                    notes: "Rattle".to_string(),
                    mechanic_required: true,
                    checked_at: None,
                },
                &ctx.admin,
            )
            .await
            .unwrap();
    }
    let shift = ctx
        .shift(&high, &driver, "2024-03-04T08:00:00Z", ShiftStatus::Complete)
        .await;
    ctx.fleet()
        .save_operator_report(
            shift.id,
            OperatorReportInput {
                condition: "Scratched".to_string(),
                mechanic_required: true,
                mechanic_alert_reason: "Mirror broken".to_string(),
                ..Default::default()
            },
            &ctx.admin,
        )
        .await
        .unwrap();
    ctx.fleet()
        .add_maintenance_log(
            fine.id,
            MaintenanceLogInput {
                notes: "Washed".to_string(),
                mechanic_required: false,
                checked_at: None,
            },
            &ctx.admin,
        )
        .await
        .unwrap();

    let flagged: Vec<_> = ctx
        .fleet()
        .bikes_needing_mechanic()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.registration)
        .collect();

    // registrations descending
    assert_eq!(flagged, vec![high.registration, low.registration]);
}

#[actix_web::test]
async fn operator_report_is_one_per_shift() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let shift = ctx
        .shift(&bike, &driver, "2024-03-04T08:00:00Z", ShiftStatus::Complete)
        .await;

    let first = ctx
        .fleet()
        .save_operator_report(
            shift.id,
            OperatorReportInput {
                fuel_level: 40,
                key_returned: true,
                ..Default::default()
            },
            &ctx.admin,
        )
        .await
        .unwrap();
    let second = ctx
        .fleet()
        .save_operator_report(
            shift.id,
            OperatorReportInput {
                fuel_level: 250,
                key_returned: true,
                locked_up: true,
                ..Default::default()
            },
            &ctx.admin,
        )
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.bike_id, bike.id);
    assert_eq!(second.fuel_level, 100);
    assert_eq!(
        ctx.fleet().operator_report(shift.id).await.unwrap(),
        Some(second.clone())
    );
    assert_eq!(
        ctx.fleet().operator_reports_for_bike(bike.id).await.unwrap(),
        vec![second]
    );
}

#[actix_web::test]
async fn payroll_lists_unpaid_completed_shifts() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let complete = ctx
        .shift(&bike, &driver, "2024-03-01T08:00:00Z", ShiftStatus::Complete)
        .await;
    ctx.shift(&bike, &driver, "2024-03-02T08:00:00Z", ShiftStatus::Running)
        .await;

    let outstanding = ctx.payroll().outstanding().await.unwrap();

    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].shift.id, complete.id);
    assert_eq!(outstanding[0].driver.as_ref().map(|d| d.id), Some(driver.id));
}

#[actix_web::test]
async fn payout_marks_shifts_paid_and_mails_the_driver() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let worked = ctx
        .shift(&bike, &driver, "2024-03-01T08:00:00Z", ShiftStatus::Complete)
        .await;
    let disputed = ctx
        .shift(&bike, &driver, "2024-03-02T08:00:00Z", ShiftStatus::Complete)
        .await;

    ctx.payroll()
        .payout(
            PayoutInput {
                driver_id: driver.id,
                shifts: vec![
                    PayoutLine {
                        shift: worked.id,
                        total: amount("64.50"),
                        removed: false,
                    },
                    PayoutLine {
                        shift: disputed.id,
                        total: amount("30.00"),
                        removed: true,
                    },
                ],
            },
            &ctx.admin,
        )
        .await
        .unwrap();

    let worked = ctx.reload(&worked).await;
    assert!(worked.paid);
    assert_eq!(worked.paid_amount, Some(amount("64.50")));
    assert_eq!(worked.paid_by, Some(ctx.admin.id));
    assert_eq!(worked.paid_at, Some(ctx.now()));
    assert!(!worked.deleted);

    let disputed = ctx.reload(&disputed).await;
    assert!(disputed.paid);
    assert_eq!(disputed.paid_amount, Some(BigDecimal::from(0)));
    assert!(disputed.deleted);
    assert_eq!(disputed.deleted_reason.as_deref(), Some("payroll"));

    assert!(ctx.payroll().outstanding().await.unwrap().is_empty());
    let sent = ctx.wait_for_mail(1).await;
    assert_eq!(sent[0].to, driver.email);
    assert_eq!(sent[0].template, "user-payout");
}

#[actix_web::test]
async fn payout_rejects_unfinished_shifts_before_writing() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let complete = ctx
        .shift(&bike, &driver, "2024-03-01T08:00:00Z", ShiftStatus::Complete)
        .await;
    let running = ctx
        .shift(&bike, &driver, "2024-03-02T08:00:00Z", ShiftStatus::Running)
        .await;

    let err = ctx
        .payroll()
        .payout(
            PayoutInput {
                driver_id: driver.id,
                shifts: vec![
                    PayoutLine {
                        shift: complete.id,
                        total: amount("10"),
                        removed: false,
                    },
                    PayoutLine {
                        shift: running.id,
                        total: amount("10"),
                        removed: false,
                    },
                ],
            },
            &ctx.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m.len() == 1));
    assert!(!ctx.reload(&complete).await.paid);
}

#[actix_web::test]
async fn paid_shifts_no_longer_change() {
    let ctx = TestContext::with_failing_mail();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let shift = ctx
        .shift(&bike, &driver, "2024-03-01T08:00:00Z", ShiftStatus::Complete)
        .await;

    ctx.payroll()
        .payout(
            PayoutInput {
                driver_id: driver.id,
                shifts: vec![PayoutLine {
                    shift: shift.id,
                    total: amount("12.25"),
                    removed: false,
                }],
            },
            &ctx.admin,
        )
        .await
        .unwrap();

    let err = ctx.lifecycle().reset_shift(shift.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(ctx.reload(&shift).await.status, ShiftStatus::Complete);
}
