//! Error types for the domain and application layers.

use std::error::Error;
use std::fmt;

/// Error categories surfaced by the orchestration core.
///
/// Every failure a caller can observe maps to exactly one of these
/// kinds; the HTTP adapter translates them to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Email known but the supplied password does not match.
    InvalidCredentials,
    /// Session token is malformed, expired, or references a missing user.
    InvalidToken,
    /// Caller lacks organization ownership or a valid API key.
    Unauthorized,
    /// Organization, source, or conversation does not exist.
    NotFound,
    /// The source location is already registered in this organization.
    DuplicateSource,
    /// The reasoning engine call failed or returned non-success.
    UpstreamFailure,
    /// Required fields missing or malformed input.
    Validation,
    /// Persistence layer failure.
    Database,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::InvalidToken => "INVALID_TOKEN",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::DuplicateSource => "DUPLICATE_SOURCE",
            ErrorKind::UpstreamFailure => "UPSTREAM_FAILURE",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Database => "DATABASE_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard application error with a kind and a descriptive message.
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    pub fn invalid_token() -> Self {
        Self::new(ErrorKind::InvalidToken, "Invalid or expired token")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found: {}", entity, id))
    }

    pub fn duplicate_source(location: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateSource,
            format!("Source already registered in this organization: {}", location),
        )
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamFailure, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database(err.to_string())
    }
}
