use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{CheckInput, OperatorReportInput, ShiftNotesInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub day: String,
}

pub async fn calendar(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let calendar = state.shifts.calendar(&query.day).await?;
    Ok(ApiResponse::ok(calendar))
}

pub async fn get_shift(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let shift = state.shifts.shift_info(path.into_inner()).await?;
    Ok(ApiResponse::ok(shift))
}

/// The body is optional; without a date the current time is used.
pub async fn check_in(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: Option<web::Json<CheckInput>>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let at = input.and_then(|input| input.into_inner().date);
    let shift = state.shifts.check_in(path.into_inner(), at, &actor).await?;
    Ok(ApiResponse::ok(shift))
}

pub async fn check_out(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: Option<web::Json<CheckInput>>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let at = input.and_then(|input| input.into_inner().date);
    let shift = state.shifts.check_out(path.into_inner(), at, &actor).await?;
    Ok(ApiResponse::ok(shift))
}

pub async fn reset(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state.shifts.reset_shift(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_notes(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<ShiftNotesInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state
        .shifts
        .set_notes(path.into_inner(), input.into_inner().notes)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn confirm(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state.shifts.confirm_shift(path.into_inner(), &actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reject(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state.shifts.reject_shift(path.into_inner(), &actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reassign(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let (shift_id, bike_id) = path.into_inner();
    state.shifts.reassign_bike(shift_id, bike_id, &actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_operator_notes(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let report = state.fleet.operator_report(path.into_inner()).await?;
    Ok(ApiResponse::ok(report))
}

pub async fn set_operator_notes(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<OperatorReportInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let report = state
        .fleet
        .save_operator_report(path.into_inner(), input.into_inner(), &actor)
        .await?;
    Ok(ApiResponse::ok(report))
}
