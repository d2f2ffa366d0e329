//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. Every failure path resolves to exactly one variant and every
//! variant maps to exactly one HTTP response, so no caller has to decide how
//! a failure should look on the wire.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into JSON responses. Storage and hashing internals are
//! logged server-side at full detail but never reach the client body.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A required request field was absent or empty (HTTP 400).
    /// Carries the field name for the client-facing message.
    MissingField(&'static str),
    /// The supplied email address does not match the email grammar (HTTP 400).
    InvalidEmail,
    /// The supplied password is shorter than the minimum length (HTTP 400).
    WeakPassword,
    /// A cross-field or referential validation failed (HTTP 400), e.g. a task
    /// whose start instant is after its end instant.
    BadRequest(String),
    /// A uniqueness constraint was violated at the store (HTTP 409).
    /// The message is a sanitized description, never the raw store diagnostic.
    Conflict(String),
    /// Login failed. Deliberately generic so an unknown email and a wrong
    /// password are indistinguishable to the client (HTTP 400).
    InvalidCredentials,
    /// No bearer token was presented on a protected route (HTTP 401).
    TokenMissing,
    /// A bearer token was presented but its signature, payload or expiry did
    /// not verify (HTTP 401).
    TokenInvalid,
    /// The requested record does not exist or is not owned by the requester
    /// (HTTP 404).
    NotFound(String),
    /// An unexpected error from the store (HTTP 500).
    Database(String),
    /// Any other unexpected server-side error (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::MissingField(field) => write!(f, "{} is required", field),
            AppError::InvalidEmail => write!(f, "invalid email address"),
            AppError::WeakPassword => write!(f, "password is too short"),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::InvalidCredentials => write!(f, "invalid email address or password"),
            AppError::TokenMissing => write!(f, "token is not present"),
            AppError::TokenInvalid => write!(f, "token verification failed"),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Database(msg) => write!(f, "database error: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::MissingField(_)
            | AppError::InvalidEmail
            | AppError::WeakPassword
            | AppError::BadRequest(_)
            | AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "message": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(json!({
                "message": self.to_string()
            })),
            // Missing and invalid tokens are distinguished in the server log
            // only; the client sees one generic body for both.
            AppError::TokenMissing | AppError::TokenInvalid => {
                log::warn!("rejected request: {}", self);
                HttpResponse::Unauthorized().json(json!({
                    "message": "invalid or missing token"
                }))
            }
            AppError::NotFound(_) => HttpResponse::NotFound().json(json!({
                "message": self.to_string()
            })),
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "message": "server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; a unique-index violation becomes a
/// generic `Conflict` (call sites that know which constraint applies use
/// [`AppError::from_unique`] for a field-specific message); everything else
/// is a `Database` fault.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("record already exists".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl AppError {
    /// Maps a unique-index violation to a `Conflict` carrying the given
    /// sanitized message; any other storage error goes through the usual
    /// `From<sqlx::Error>` mapping.
    pub fn from_unique(error: sqlx::Error, conflict_message: &str) -> AppError {
        match &error {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict(conflict_message.into())
            }
            _ => error.into(),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
