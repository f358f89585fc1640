//! Server bootstrap: open the store once, then serve.

use crate::config::ServerConfig;
use crate::state::AppState;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use userbook_core::db::{open_db, DbResult};
use userbook_core::ACCESS_LOG_TARGET;

/// One access line per request, in the same key=value shape as app events.
const ACCESS_LOG_FORMAT: &str =
    r#"event=http_request module=http http_status=%s request="%r" bytes=%b duration_ms=%D"#;

/// Opens the configured database and runs the ensure-schema step.
pub fn open_state(config: &ServerConfig) -> DbResult<web::Data<AppState>> {
    let conn = open_db(&config.db_path)?;
    Ok(web::Data::new(AppState::new(conn)))
}

/// Binds and runs the HTTP server until shutdown.
pub async fn serve(config: &ServerConfig, state: web::Data<AppState>) -> std::io::Result<()> {
    info!(
        "event=server_start module=http status=start bind_addr={}",
        config.bind_addr
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::new(ACCESS_LOG_FORMAT).log_target(ACCESS_LOG_TARGET))
            .configure(crate::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}
