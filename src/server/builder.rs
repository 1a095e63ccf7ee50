//! Server assembly and the run_server entry point

use crate::auth::UserDirectory;
use crate::config::Config;
use crate::server::middleware::AuthzMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// Build the actix `App` closure body for one worker
///
/// Split out so integration tests can assemble the identical app around an
/// in-memory state without binding a socket.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    routes::configure(cfg);
}

/// Run the HTTP server until shutdown
pub async fn run_server(config: Config, directory: Arc<dyn UserDirectory>) -> Result<()> {
    config.validate()?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, directory);

    info!("Starting back-office gateway on {}", bind_addr);
    info!(
        prefix = %state.config.authorization.api_prefix,
        "authorization gate active for the protected namespace"
    );

    HttpServer::new(move || {
        // CORS sits outside the gate; the gate independently never blocks
        // OPTIONS, so preflights succeed either way.
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(AuthzMiddleware)
            .wrap(TracingLogger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .configure(configure_app)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
