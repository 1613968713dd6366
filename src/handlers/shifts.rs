//! Driver-facing shift endpoints. The `*_for_driver` variants serve the admin
//! proxy routes, where the driver comes from the path and the admin stays the
//! actor.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::CreateShiftInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub garage: Uuid,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub paid: Option<String>,
}

impl HistoryQuery {
    /// Any non-empty `paid` value restricts the list to paid shifts.
    fn only_paid(&self) -> bool {
        self.paid.as_deref().is_some_and(|paid| !paid.is_empty())
    }
}

pub async fn get_shifts(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    month(&state, actor.id, &query).await
}

pub async fn create_shift(
    state: web::Data<AppState>,
    actor: Actor,
    input: web::Json<CreateShiftInput>,
) -> Result<HttpResponse, AppError> {
    let shift = state
        .shifts
        .create_shift(input.into_inner(), actor.id, &actor)
        .await?;
    Ok(ApiResponse::created(shift))
}

pub async fn search(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let bikes = state
        .availability
        .search(&actor, actor.id, query.garage, &query.date)
        .await?;
    Ok(ApiResponse::ok(bikes))
}

pub async fn history(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let shifts = state
        .shifts
        .driver_history(actor.id, query.only_paid())
        .await?;
    Ok(ApiResponse::ok(shifts))
}

pub async fn cancel_shift(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .shifts
        .cancel_shift(path.into_inner(), actor.id, &actor)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_shifts_for_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    month(&state, path.into_inner(), &query).await
}

pub async fn create_shift_for_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<CreateShiftInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let shift = state
        .shifts
        .create_shift(input.into_inner(), path.into_inner(), &actor)
        .await?;
    Ok(ApiResponse::created(shift))
}

pub async fn search_for_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bikes = state
        .availability
        .search(&actor, path.into_inner(), query.garage, &query.date)
        .await?;
    Ok(ApiResponse::ok(bikes))
}

pub async fn history_for_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let shifts = state
        .shifts
        .driver_history(path.into_inner(), query.only_paid())
        .await?;
    Ok(ApiResponse::ok(shifts))
}

pub async fn cancel_shift_for_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let (driver_id, shift_id) = path.into_inner();
    state
        .shifts
        .cancel_shift(shift_id, driver_id, &actor)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn month(
    state: &AppState,
    driver_id: Uuid,
    query: &MonthQuery,
) -> Result<HttpResponse, AppError> {
    let shifts = state
        .shifts
        .driver_month(driver_id, query.year, query.month)
        .await?;
    Ok(ApiResponse::ok(shifts))
}
