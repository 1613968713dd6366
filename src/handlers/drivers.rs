use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{DriverFilter, DriverInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

pub async fn list_drivers(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<DriverFilter>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let drivers = state.drivers.list_drivers(&query).await?;
    Ok(ApiResponse::ok(drivers))
}

pub async fn get_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let driver = state.drivers.get_driver(path.into_inner()).await?;
    Ok(ApiResponse::ok(driver))
}

pub async fn update_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    input: web::Json<DriverInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let driver = state
        .drivers
        .update_driver(path.into_inner(), input.into_inner())
        .await?;
    Ok(ApiResponse::ok(driver))
}

pub async fn block_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state
        .drivers
        .set_blocked(path.into_inner(), true, &actor)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn unblock_driver(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    state
        .drivers
        .set_blocked(path.into_inner(), false, &actor)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
