//! Loan handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::negotiate;
use crate::error::AppError;
use crate::render::render_loans;
use crate::AppState;

/// GET /loans
///
/// Active loans, ordered by book id.
pub async fn list_loans(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let loans = state.library.list_loans().await?;

    Ok(negotiate(&headers, StatusCode::OK, &loans, || {
        render_loans(&loans)
    }))
}
