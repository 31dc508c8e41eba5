//! Error-to-response mapping for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::foundation::{AppError, ErrorKind};

/// JSON error envelope: `{ "error": message, "code": kind }`.
#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredentials | ErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateSource => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::Database => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        if status.is_server_error() {
            tracing::error!(code = %self.kind, "request failed: {}", self.message);
        }
        let body = ErrorBody {
            // Internal detail stays in the logs.
            error: if status == StatusCode::INTERNAL_SERVER_ERROR {
                "Internal server error".to_string()
            } else {
                self.message
            },
            code: self.kind.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(status_for(ErrorKind::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::DuplicateSource), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::UpstreamFailure), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorKind::Database),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_detail_is_not_leaked_to_the_client() {
        let response = AppError::database("connection string had a password").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
