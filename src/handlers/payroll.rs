use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::PayoutInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Actor;

pub async fn outstanding(
    state: web::Data<AppState>,
    actor: Actor,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let shifts = state.payroll.outstanding().await?;
    Ok(ApiResponse::ok(shifts))
}

pub async fn payout(
    state: web::Data<AppState>,
    actor: Actor,
    input: web::Json<PayoutInput>,
) -> Result<HttpResponse, AppError> {
    actor.require_admin()?;
    let paid = state.payroll.payout(input.into_inner(), &actor).await?;
    Ok(ApiResponse::ok(paid))
}
