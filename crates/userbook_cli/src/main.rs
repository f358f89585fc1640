//! `userbook` server entry point.
//!
//! Resolves configuration from the environment, initializes logging, opens
//! the store once and serves the users API until shutdown.

use log::error;
use std::io;
use userbook_core::{init_logging, LogSettings};
use userbook_http::{open_state, serve, ServerConfig};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServerConfig::from_env().map_err(io::Error::other)?;

    let log_settings =
        LogSettings::new(&config.log_level, config.log_dir.clone()).map_err(io::Error::other)?;
    init_logging(log_settings).map_err(io::Error::other)?;

    let state = open_state(&config).map_err(|err| {
        error!("event=startup module=cli status=error error_code=db_open_failed error={err}");
        io::Error::other(err)
    })?;

    serve(&config, state).await
}
