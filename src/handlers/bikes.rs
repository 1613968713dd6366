use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{ArchiveBikeInput, BikeInput, MaintenanceLogInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

#[derive(Debug, Deserialize)]
pub struct BikeListQuery {
    pub garage: Option<Uuid>,
    #[serde(default)]
    pub available: bool,
}

pub async fn list_bikes(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<BikeListQuery>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bikes = state.fleet.list_bikes(query.garage, query.available).await?;
    Ok(ApiResponse::ok(bikes))
}

pub async fn create_bike(
    state: web::Data<AppState>,
    actor: Actor,
    input: web::Json<BikeInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bike = state.fleet.create_bike(input.into_inner(), &actor).await?;
    Ok(ApiResponse::created(bike))
}

pub async fn get_bike(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bike = state.fleet.get_bike(path.into_inner()).await?;
    Ok(ApiResponse::ok(bike))
}

pub async fn update_bike(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<BikeInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bike = state
        .fleet
        .update_bike(path.into_inner(), input.into_inner())
        .await?;
    Ok(ApiResponse::ok(bike))
}

pub async fn archive_bike(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<ArchiveBikeInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bike = state
        .fleet
        .archive_bike(path.into_inner(), &input.reason, &actor)
        .await?;
    Ok(ApiResponse::ok(bike))
}

pub async fn needing_mechanic(
    state: web::Data<AppState>,
    actor: Actor,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let bikes = state.fleet.bikes_needing_mechanic().await?;
    Ok(ApiResponse::ok(bikes))
}

pub async fn list_maintenance(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let logs = state.fleet.maintenance_logs(path.into_inner()).await?;
    Ok(ApiResponse::ok(logs))
}

pub async fn add_maintenance(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<MaintenanceLogInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let log = state
        .fleet
        .add_maintenance_log(path.into_inner(), input.into_inner(), &actor)
        .await?;
    Ok(ApiResponse::created(log))
}

pub async fn update_maintenance(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<MaintenanceLogInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let (bike_id, log_id) = path.into_inner();
    let log = state
        .fleet
        .update_maintenance_log(bike_id, log_id, input.into_inner(), &actor)
        .await?;
    Ok(ApiResponse::ok(log))
}

pub async fn delete_maintenance(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let (bike_id, log_id) = path.into_inner();
    state.fleet.delete_maintenance_log(bike_id, log_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn operator_notes(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let reports = state
        .fleet
        .operator_reports_for_bike(path.into_inner())
        .await?;
    Ok(ApiResponse::ok(reports))
}
