use crate::db::errors::DbError;
use axum::{
    Json,
    body::Body,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or the token was rejected
    #[error("Not authenticated: {}", message.as_deref().unwrap_or("no token"))]
    Unauthenticated { message: Option<String> },

    /// Login with an unknown email or a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller is authenticated but lacks the role for the operation
    #[error("Insufficient permissions to {action} {resource}")]
    InsufficientPermissions { action: String, resource: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found (or not owned by the caller)
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Conflict with existing state, e.g. a duplicate registration
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Request body exceeds the configured upload limit
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Storage operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Full error chain of a server-side failure, attached to the response for
/// [`expose_error_details`]
#[derive(Debug, Clone)]
pub struct ErrorChain(pub String);

impl Error {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Error::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::ProtectedEntity { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authorization token required".to_string()),
            Error::InvalidCredentials => "Invalid credentials".to_string(),
            Error::InsufficientPermissions { action, resource } => {
                format!("Insufficient permissions to {action} {resource}")
            }
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Conflict { message } => message.clone(),
            Error::PayloadTooLarge => "File too large".to_string(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } if db_err.is_duplicate_email() => "Email already registered".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::ProtectedEntity { reason, .. } => reason.clone(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Error::InvalidCredentials => Some("Email or password is incorrect".to_string()),
            _ => None,
        }
    }

    fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InvalidCredentials | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::PayloadTooLarge => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.user_message(),
            details: self.details(),
        };

        let mut response = (status, Json(body)).into_response();
        if self.is_server_error() {
            response.extensions_mut().insert(ErrorChain(format!("{self:#}")));
        }
        response
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge;
        }
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Adds the internal error chain as `details` to 5xx responses.
///
/// Only installed when running with `environment: development`.
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(ErrorChain(chain)) = response.extensions().get::<ErrorChain>().cloned() else {
        return response;
    };

    let status = response.status();
    let body = ErrorBody {
        error: "Internal server error".to_string(),
        details: Some(chain),
    };
    (status, Json(body)).into_response()
}

/// Converts a handler panic into the standard 500 body. Used with `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    Error::Internal {
        operation: format!("handle request (panic: {detail})"),
    }
    .into_response()
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;

    async fn body_of(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_credentials_body_is_generic() {
        let (status, body) = body_of(Error::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            serde_json::json!({"error": "Invalid credentials", "details": "Email or password is incorrect"})
        );
    }

    #[tokio::test]
    async fn missing_token_message_is_default() {
        let (status, body) = body_of(Error::Unauthenticated { message: None }).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authorization token required");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn not_found_names_only_the_resource() {
        let (status, body) = body_of(Error::not_found("Lab", 42)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Lab not found");
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let err = Error::Other(anyhow::anyhow!("connection refused to 10.0.0.5"));
        let response = err.into_response();
        assert!(response.extensions().get::<ErrorChain>().is_some());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.5"));
        assert!(text.contains("Internal server error"));
    }

    #[tokio::test]
    async fn protected_entity_is_a_client_error() {
        let err = Error::Database(DbError::ProtectedEntity {
            operation: Operation::Delete,
            reason: "Cannot delete the last admin account".to_string(),
            entity_type: "developer".to_string(),
            entity_id: Some("1".to_string()),
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot delete the last admin account");
    }

    async fn refused_connection() -> Result<()> {
        Err(Error::Other(anyhow::anyhow!("db at 10.0.0.5 refused")))
    }

    async fn panicking_handler() -> &'static str {
        panic!("kaboom")
    }

    /// Same layer order as the application router.
    fn error_test_server(development: bool) -> axum_test::TestServer {
        let router = axum::Router::new()
            .route("/fail", axum::routing::get(refused_connection))
            .route("/panic", axum::routing::get(panicking_handler))
            .layer(tower_http::catch_panic::CatchPanicLayer::custom(panic_response));

        let router = if development {
            router.layer(axum::middleware::from_fn(expose_error_details))
        } else {
            router
        };

        axum_test::TestServer::new(router.into_make_service()).expect("Failed to create test server")
    }

    #[test_log::test(tokio::test)]
    async fn development_exposes_internal_error_chain() {
        let server = error_test_server(true);

        let response = server.get("/fail").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
        assert!(body["details"].as_str().unwrap().contains("db at 10.0.0.5 refused"));

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
        assert!(body["details"].as_str().unwrap().contains("kaboom"));
    }

    #[test_log::test(tokio::test)]
    async fn production_hides_internal_error_chain() {
        let server = error_test_server(false);

        for path in ["/fail", "/panic"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let body: serde_json::Value = response.json();
            assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
        }
    }

    #[test]
    fn duplicate_email_index_maps_to_conflict() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("developers_email_lower_key".to_string()),
            table: Some("developers".to_string()),
            message: "duplicate".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "Email already registered");
    }
}
