//! Server-specific error types
//!
//! Every handler returns [`ApiError`] on failure. Field validation errors
//! render as `{"<field>": ["message", ...]}`; everything else renders as
//! `{"detail": "message"}`.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::features::shared::validation::FieldErrors;

/// `WWW-Authenticate` challenge sent with every 401
pub const BASIC_CHALLENGE: &str = "Basic realm=\"api\"";

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Body could not be read as JSON
    #[error("{0}")]
    Parse(String),

    #[error("Not found.")]
    NotFound,

    /// Write attempted without credentials
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    /// Credentials were supplied but rejected
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Method \"{method}\" not allowed.")]
    MethodNotAllowed { method: Method, allow: String },

    /// Body could not be read, e.g. over the size limit
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("Unsupported media type \"{0}\" in request.")]
    UnsupportedMediaType(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Parse(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::NotAuthenticated | ApiError::AuthenticationFailed(_) => {
                StatusCode::UNAUTHORIZED
            },
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BodyRejected { status, .. } => *status,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::Database(ref e) => {
                tracing::error!(error = ?e, "Database error");
                server_error()
            },
            ApiError::Internal(ref message) => {
                tracing::error!(%message, "Internal error");
                server_error()
            },
            ApiError::NotAuthenticated | ApiError::AuthenticationFailed(_) => {
                let mut response = detail(status, self.to_string());
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_CHALLENGE),
                );
                response
            },
            ApiError::MethodNotAllowed { ref allow, .. } => {
                let allow = HeaderValue::from_str(allow).ok();
                let mut response = detail(status, self.to_string());
                if let Some(allow) = allow {
                    response.headers_mut().insert(header::ALLOW, allow);
                }
                response
            },
            _ => detail(status, self.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => ApiError::Database(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn server_error() -> Response {
    detail(
        StatusCode::INTERNAL_SERVER_ERROR,
        "A server error occurred.".to_string(),
    )
}
