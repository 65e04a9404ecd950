use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uwork_core::CoreError;

// ---------------------------------------------------------------------------
// Internal sentinels
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 503 through
/// the `anyhow::Error` chain without touching the core error enum.
#[derive(Debug)]
struct UnavailableError(String);

impl std::fmt::Display for UnavailableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UnavailableError {}

/// Sentinel for a 404 that arises at the routing layer rather than from the
/// store, e.g. a non-numeric id in the path.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Every handler failure is converted
/// to a `{"error": <message>}` JSON body with the appropriate status.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(CoreError::Validation(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    /// Construct a 503 Service Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self(UnavailableError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(u) = self.0.downcast_ref::<UnavailableError>() {
            let body = serde_json::json!({ "error": u.0.clone() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response();
        }
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<CoreError>() {
            match e {
                CoreError::Validation(_)
                | CoreError::InvalidStatus(_)
                | CoreError::InvalidAxis(_) => StatusCode::BAD_REQUEST,
                CoreError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                CoreError::Db(_) | CoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            // Chat bridge failures (upstream errors, loop cap, transport)
            // and anything unexpected.
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
