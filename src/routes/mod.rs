use actix_web::web;

use crate::error::AppError;
use crate::handlers::system;

pub mod admin;
pub mod shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_input(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_input(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_input(err)))
        .route("/", web::get().to(system::index))
        .route("/health", web::get().to(system::health))
        .service(
            web::scope("/api/v1")
                .configure(shifts::configure)
                .configure(admin::configure),
        );
}

/// Malformed bodies, queries and path ids get the usual error envelope.
fn bad_input(err: impl std::fmt::Display) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

