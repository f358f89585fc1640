//! HTTP mapping for service failures.
//!
//! Validation failures render as `{"errors":[...]}`, everything else as
//! `{"message":...}`. Internal details are logged, never returned.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::fmt::{Display, Formatter};
use userbook_core::{ErrorKind, FieldViolation, UserServiceError, USER_NOT_FOUND_MESSAGE};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Convenient result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// One entry of a 400 `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<FieldViolation> for ErrorItem {
    fn from(value: FieldViolation) -> Self {
        Self {
            msg: value.message,
            path: Some(value.field.as_str().to_string()),
            value: value.value,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<ErrorItem>),
    NotFound(&'static str),
    Internal,
}

impl ApiError {
    /// Malformed or mistyped request body.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::Validation(vec![ErrorItem {
            msg: message.into(),
            path: None,
            value: None,
        }])
    }

    pub fn user_not_found() -> Self {
        Self::NotFound(USER_NOT_FOUND_MESSAGE)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal => ErrorKind::InternalError,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(items) => match items.first() {
                Some(item) => write!(f, "{}", item.msg),
                None => write!(f, "validation failed"),
            },
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Internal => write!(f, "{INTERNAL_ERROR_MESSAGE}"),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Validation(items) => json!({ "errors": items }),
            Self::NotFound(message) => json!({ "message": message }),
            Self::Internal => json!({ "message": INTERNAL_ERROR_MESSAGE }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<UserServiceError> for ApiError {
    fn from(value: UserServiceError) -> Self {
        match value {
            UserServiceError::Validation(err) => Self::Validation(
                err.into_violations()
                    .into_iter()
                    .map(ErrorItem::from)
                    .collect(),
            ),
            UserServiceError::NotFound(_) => Self::user_not_found(),
            UserServiceError::Repo(err) => {
                error!("event=request_failed module=http status=error error={err}");
                Self::Internal
            }
        }
    }
}
