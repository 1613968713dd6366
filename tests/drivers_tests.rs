use actix_web::http::StatusCode;
use actix_web::test;
use fleet::database::models::{DriverFilter, DriverInput, LicenseClass};
use fleet::error::AppError;
use fleet::services::Actor;
use fleet::services::notifier::templates;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

mod common;

use common::{AuthHelper, TestContext, booking};

fn rename(name: &str, license: LicenseClass) -> DriverInput {
    DriverInput {
        name: name.to_string(),
        license,
    }
}

#[actix_web::test]
async fn drivers_are_listed_by_name_and_filtered() {
    let ctx = TestContext::new();
    let zed = ctx.driver(LicenseClass::Full).await;
    let amy = ctx.driver(LicenseClass::Full).await;
    let ben = ctx.driver(LicenseClass::Full).await;
    let drivers = ctx.state.drivers.clone();
    drivers
        .update_driver(zed.id, rename("Zed Tanaka", LicenseClass::Full))
        .await
        .unwrap();
    drivers
        .update_driver(amy.id, rename("Amy Tanaka", LicenseClass::Cbt))
        .await
        .unwrap();
    drivers
        .update_driver(ben.id, rename("Ben Okafor", LicenseClass::Full))
        .await
        .unwrap();

    let all = drivers.list_drivers(&DriverFilter::default()).await.unwrap();
    let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Amy Tanaka", "Ben Okafor", "Zed Tanaka"]);

    let tanakas = drivers
        .list_drivers(&DriverFilter {
            name: Some("tanaka".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tanakas.len(), 2);

    let learners = drivers
        .list_drivers(&DriverFilter {
            license: Some(LicenseClass::Cbt),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(learners.iter().map(|d| d.id).collect::<Vec<_>>(), vec![amy.id]);
}

#[actix_web::test]
async fn licence_change_narrows_the_search() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let small = ctx.bike(&garage, 1, 50).await;
    ctx.bike(&garage, 2, 250).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let actor = Actor::driver(driver.id);

    let before = ctx
        .availability()
        .search(&actor, driver.id, garage.id, "05-03-2024")
        .await
        .unwrap();
    assert_eq!(before.len(), 2);

    let updated = ctx
        .state
        .drivers
        .update_driver(driver.id, rename(&driver.name, LicenseClass::Cbt))
        .await
        .unwrap();
    assert_eq!(updated.license, LicenseClass::Cbt);

    let after = ctx
        .availability()
        .search(&actor, driver.id, garage.id, "05-03-2024")
        .await
        .unwrap();
    assert_eq!(after.iter().map(|b| b.id).collect::<Vec<_>>(), vec![small.id]);
}

#[actix_web::test]
async fn update_needs_a_name_and_a_driver() {
    let ctx = TestContext::new();
    let driver = ctx.driver(LicenseClass::Full).await;

    let err = ctx
        .state
        .drivers
        .update_driver(driver.id, rename("   ", LicenseClass::Full))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = ctx
        .state
        .drivers
        .update_driver(uuid::Uuid::new_v4(), rename("Nobody", LicenseClass::Full))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_web::test]
async fn blocked_driver_cannot_book_until_reinstated() {
    let ctx = TestContext::new();
    let garage = ctx.garage().await;
    let bike = ctx.bike(&garage, 1, 125).await;
    let driver = ctx.driver(LicenseClass::Full).await;
    let actor = Actor::driver(driver.id);

    let blocked = ctx
        .state
        .drivers
        .set_blocked(driver.id, true, &ctx.admin)
        .await
        .unwrap();
    assert!(blocked.blocked);

    let err = ctx
        .lifecycle()
        .create_shift(booking(&garage, &bike, "05-03-2024", 9), driver.id, &actor)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let mail = ctx.wait_for_mail(1).await;
    assert_eq!(mail[0].to, driver.email);
    assert_eq!(mail[0].template, templates::USER_BLOCKED);
    assert_eq!(mail[0].data["UserName"], json!(driver.name));

    ctx.state
        .drivers
        .set_blocked(driver.id, false, &ctx.admin)
        .await
        .unwrap();
    let mail = ctx.wait_for_mail(2).await;
    assert_eq!(mail[1].template, templates::USER_UNBLOCKED);

    ctx.lifecycle()
        .create_shift(booking(&garage, &bike, "05-03-2024", 9), driver.id, &actor)
        .await
        .unwrap();
}

#[actix_web::test]
async fn admins_cannot_block_themselves() {
    let ctx = TestContext::new();

    let err = ctx
        .state
        .drivers
        .set_blocked(ctx.admin.id, true, &ctx.admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m[0] == "You cannot block yourself"));
    assert!(ctx.notifier.sent().is_empty());
}

#[actix_web::test]
async fn blocking_survives_a_mail_failure() {
    let ctx = TestContext::with_failing_mail();
    let driver = ctx.driver(LicenseClass::Full).await;

    ctx.state
        .drivers
        .set_blocked(driver.id, true, &ctx.admin)
        .await
        .unwrap();

    assert!(ctx.state.drivers.get_driver(driver.id).await.unwrap().blocked);
}

#[actix_web::test]
async fn admin_driver_routes() {
    let ctx = TestContext::new();
    let driver = ctx.driver(LicenseClass::Full).await;
    let admin_auth = AuthHelper::bearer(&ctx.config, &ctx.admin);
    let app = crate::test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/drivers?license=full")
        .insert_header(admin_auth.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["id"], json!(driver.id));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/drivers/{}", driver.id))
        .insert_header(admin_auth.clone())
        .set_json(json!({ "name": "Sam Rider", "license": "cbt" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["license"], "cbt");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/drivers/{}/block", driver.id))
        .insert_header(admin_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/drivers/{}", driver.id))
        .insert_header(admin_auth.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["blocked"], true);
    assert_eq!(body["data"]["name"], "Sam Rider");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/drivers/{}/block", driver.id))
        .insert_header(admin_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(!ctx.state.drivers.get_driver(driver.id).await.unwrap().blocked);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/drivers/{}/block", ctx.admin.id))
        .insert_header(admin_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/drivers/{}", uuid::Uuid::new_v4()))
        .insert_header(admin_auth)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn drivers_cannot_manage_drivers() {
    let ctx = TestContext::new();
    let driver = ctx.driver(LicenseClass::Full).await;
    let other = ctx.driver(LicenseClass::Full).await;
    let auth = AuthHelper::bearer(&ctx.config, &Actor::driver(driver.id));
    let app = crate::test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/drivers")
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/drivers/{}/block", other.id))
        .insert_header(auth)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!ctx.state.drivers.get_driver(other.id).await.unwrap().blocked);
}
