use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::GarageInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

/// Drivers need the garage list to book, so any signed-in caller may read it.
pub async fn list_garages(
    state: web::Data<AppState>,
    _actor: Actor,
) -> Result<HttpResponse, AppError> {
    let garages = state.fleet.list_garages().await?;
    Ok(ApiResponse::ok(garages))
}

pub async fn get_garage(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let garage = state.fleet.get_garage(path.into_inner()).await?;
    Ok(ApiResponse::ok(garage))
}

pub async fn create_garage(
    state: web::Data<AppState>,
    actor: Actor,
    input: web::Json<GarageInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let garage = state.fleet.create_garage(input.into_inner()).await?;
    Ok(ApiResponse::created(garage))
}

pub async fn update_garage(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<GarageInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let garage = state
        .fleet
        .update_garage(path.into_inner(), input.into_inner())
        .await?;
    Ok(ApiResponse::ok(garage))
}

pub async fn delete_garage(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state.fleet.delete_garage(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
