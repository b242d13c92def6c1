//! Unified error types for the Libris API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Storage and validation errors raised through the ports
//! - `LendingError`: Why a borrow or return was refused
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::{BookId, MemberId};

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcome of a refused borrow or return.
///
/// None of these change catalog or ledger state.
#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Book {0} not found")]
    UnknownBook(BookId),

    #[error("Member {0} not found")]
    UnknownMember(MemberId),

    #[error("Book {0} is already on loan")]
    AlreadyOnLoan(BookId),

    #[error("Book {0} has no active loan")]
    NoActiveLoan(BookId),

    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Lending(#[from] LendingError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn domain_status(err: &DomainError) -> (StatusCode, &'static str, Option<String>) {
    match err {
        DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        DomainError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            "Validation error",
            Some(msg.clone()),
        ),
        DomainError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", Some(msg.clone())),
        DomainError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
            )
        }
        DomainError::Internal(msg) => {
            tracing::error!("Internal error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(e) => domain_status(e),
            AppError::Lending(e) => match e {
                LendingError::UnknownBook(_) | LendingError::UnknownMember(_) => {
                    (StatusCode::NOT_FOUND, "Not found", Some(e.to_string()))
                }
                LendingError::AlreadyOnLoan(_) | LendingError::NoActiveLoan(_) => {
                    (StatusCode::CONFLICT, "Conflict", Some(e.to_string()))
                }
                LendingError::Storage(inner) => domain_status(inner),
            },
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        };

        let mut response = (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                details,
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Basic realm=\"libris\""),
            );
        }

        response
    }
}
