//! Users API handlers.
//!
//! ```text
//! POST  /users      {"firstName":"arun","lastName":"kumar"}
//! PATCH /users/1    {"lastName":"smith"}
//! ```

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{delete, get, patch, post, web};
use log::error;
use serde::Serialize;
use userbook_core::{
    SqliteUserRepository, User, UserFields, UserId, UserService, UserServiceResult,
};

/// Success envelope shared by every users endpoint.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Maps body parse failures onto the 400 `errors` contract.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::invalid_body(err.to_string()).into())
}

/// List every user.
#[get("/users")]
pub async fn list_users(state: web::Data<AppState>) -> ApiResult<web::Json<Data<Vec<User>>>> {
    let users = run(state, |service| service.list_users()).await?;
    Ok(web::Json(Data { data: users }))
}

/// Fetch one user, including the derived `fullName`.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Data<User>>> {
    let id = parse_user_id(&path)?;
    let user = run(state, move |service| service.get_user(id)).await?;
    Ok(web::Json(Data { data: user }))
}

/// Validate, transform and store a new user.
#[post("/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<UserFields>,
) -> ApiResult<web::Json<Data<User>>> {
    let fields = payload.into_inner();
    let user = run(state, move |service| service.create_user(&fields)).await?;
    Ok(web::Json(Data { data: user }))
}

/// Apply the supplied fields; responds with `[affectedRowCount]`.
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UserFields>,
) -> ApiResult<web::Json<Data<[usize; 1]>>> {
    let id = parse_user_id(&path)?;
    let fields = payload.into_inner();
    let changed = run(state, move |service| service.update_user(id, &fields)).await?;
    Ok(web::Json(Data { data: [changed] }))
}

/// Remove a user; responds with the affected-row count.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Data<usize>>> {
    let id = parse_user_id(&path)?;
    let changed = run(state, move |service| service.delete_user(id)).await?;
    Ok(web::Json(Data { data: changed }))
}

fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    raw.parse().map_err(|_| ApiError::user_not_found())
}

async fn run<T, F>(state: web::Data<AppState>, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&UserService<SqliteUserRepository<'_>>) -> UserServiceResult<T> + Send + 'static,
{
    web::block(move || state.with_user_service(f))
        .await
        .map_err(|err| {
            error!("event=blocking_task module=http status=error error={err}");
            ApiError::Internal
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::{json, Value};
    use userbook_core::db::open_db_in_memory;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(open_db_in_memory().unwrap()))
    }

    macro_rules! test_service {
        ($state:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data($state.clone())
                    .configure(crate::configure),
            )
            .await
        };
    }

    fn create_request(first_name: &str, last_name: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "firstName": first_name, "lastName": last_name }))
    }

    #[actix_web::test]
    async fn create_returns_transformed_user() {
        let state = test_state();
        let app = test_service!(state);

        let body: Value =
            actix_test::call_and_read_body_json(&app, create_request("arun", "kumar").to_request())
                .await;
        assert_eq!(body["data"]["firstName"], "Mr. ARUN");
        assert_eq!(body["data"]["lastName"], "kumar ,Indian");
        assert_eq!(body["data"]["fullName"], "Mr. ARUN kumar ,Indian");
    }

    #[actix_web::test]
    async fn create_with_digits_is_bad_request() {
        let state = test_state();
        let app = test_service!(state);

        let request = create_request("narayan123", "kumar").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["errors"][0]["msg"], "Only alphabets are allowed");
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request_with_errors() {
        let state = test_state();
        let app = test_service!(state);

        let request = actix_test::TestRequest::post()
            .uri("/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body["errors"][0]["msg"].is_string());
    }

    #[actix_web::test]
    async fn get_and_list_include_full_name() {
        let state = test_state();
        let app = test_service!(state);
        let created: Value =
            actix_test::call_and_read_body_json(&app, create_request("arun", "kumar").to_request())
                .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let request = actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"]["fullName"], "Mr. ARUN kumar ,Indian");

        let request = actix_test::TestRequest::get().uri("/users").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], id);
    }

    #[actix_web::test]
    async fn get_missing_or_malformed_id_is_not_found() {
        let state = test_state();
        let app = test_service!(state);

        for uri in ["/users/9999", "/users/abc"] {
            let request = actix_test::TestRequest::get().uri(uri).to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body: Value = actix_test::read_body_json(response).await;
            assert_eq!(body["message"], "User not found");
        }
    }

    #[actix_web::test]
    async fn patch_returns_affected_row_count() {
        let state = test_state();
        let app = test_service!(state);
        let created: Value =
            actix_test::call_and_read_body_json(&app, create_request("arun", "kumar").to_request())
                .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "firstName": "janee", "lastName": "smith" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"], json!([1]));

        let request = actix_test::TestRequest::patch()
            .uri("/users/9999")
            .set_json(json!({ "lastName": "smith" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"], json!([0]));
    }

    #[actix_web::test]
    async fn patch_with_short_first_name_is_bad_request() {
        let state = test_state();
        let app = test_service!(state);
        let created: Value =
            actix_test::call_and_read_body_json(&app, create_request("arun", "kumar").to_request())
                .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "firstName": "j", "lastName": "smith" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let msg = body["errors"][0]["msg"].as_str().unwrap();
        assert!(msg.contains("min 2 max 10 characters allowed"));
    }

    #[actix_web::test]
    async fn patch_with_malformed_id_is_not_found_before_body_checks() {
        let state = test_state();
        let app = test_service!(state);

        let request = actix_test::TestRequest::patch()
            .uri("/users/abc")
            .set_json(json!({ "firstName": "j1" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "User not found");
    }

    #[actix_web::test]
    async fn delete_then_delete_again_is_not_found() {
        let state = test_state();
        let app = test_service!(state);
        let created: Value =
            actix_test::call_and_read_body_json(&app, create_request("arun", "kumar").to_request())
                .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"], 1);

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "User not found");
    }
}
