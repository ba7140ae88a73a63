use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-level failure taxonomy. Every handler and the auth extractor
/// resolve into one of these, which fixes the HTTP status and the JSON
/// `{"message": ...}` body the client sees.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or mismatched form fields.
    #[error("{0}")]
    Validation(String),
    /// Duplicate email at registration.
    #[error("{0}")]
    Conflict(String),
    /// Missing or malformed Authorization header.
    #[error("{0}")]
    Unauthorized(String),
    /// Bad credentials or a token that fails verification.
    #[error("{0}")]
    BadAuth(String),
    /// Record gone since the token was issued.
    #[error("{0}")]
    NotFound(String),
    /// Store/upload/hashing failure. Logged server-side, generic to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) | ApiError::Conflict(msg) | ApiError::BadAuth(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again later.".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::BadAuth("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
