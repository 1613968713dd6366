use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use fleet::database::{PgStore, init_database};
use fleet::middleware::RequestId;
use fleet::services::{SystemClock, notifier};
use fleet::{AppState, Config, routes};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration (also reads .env)
    let config = Config::from_env()?;

    env_logger::init();

    log::info!(
        "Starting fleet API (environment: {}, utc offset: {} min)",
        config.environment,
        config.utc_offset_minutes
    );

    if config.is_production() && !config.mail.is_enabled() {
        log::warn!("Running in production without mail delivery");
    }

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let store = Arc::new(PgStore::new(pool));
    let clock = Arc::new(SystemClock::new(config.local_offset()));
    let notifier = notifier::from_config(&config.mail);

    let app_state = web::Data::new(AppState::new(store, clock, notifier));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config_data.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
