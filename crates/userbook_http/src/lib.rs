//! HTTP surface for the user book.
//!
//! ```text
//! GET    /users          -> 200 {"data":[...]}
//! GET    /users/{id}     -> 200 {"data":{...,"fullName"}} | 404 {"message"}
//! POST   /users          -> 200 {"data":{...}}            | 400 {"errors":[{"msg"}]}
//! PATCH  /users/{id}     -> 200 {"data":[count]}          | 400 {"errors":[{"msg"}]}
//! DELETE /users/{id}     -> 200 {"data":count}            | 404 {"message"}
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod server;
pub mod state;
pub mod users;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use server::{open_state, serve};
pub use state::AppState;

use actix_web::web;

/// Registers every route plus the JSON body error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(users::json_config())
        .service(health::health)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user);
}
