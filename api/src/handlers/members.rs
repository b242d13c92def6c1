//! Member handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Extension, Json,
};

use super::negotiate;
use crate::auth::Caller;
use crate::domain::entities::{MemberId, NewMember};
use crate::error::AppError;
use crate::render::render_member;
use crate::AppState;

/// POST /members
///
/// The manager's login name is reserved; a member under it could never log in.
pub async fn register_member(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    headers: HeaderMap,
    Json(body): Json<NewMember>,
) -> Result<Response, AppError> {
    caller.require_manager()?;

    if body.id.as_str().trim() == state.config.manager_username {
        return Err(AppError::BadRequest(format!(
            "Member id '{}' is reserved for the manager",
            state.config.manager_username
        )));
    }

    let member = state.library.register_member(body).await?;

    Ok(negotiate(&headers, StatusCode::CREATED, &member, || {
        render_member(&member)
    }))
}

/// GET /members/:id
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let member = state
        .library
        .find_member(&MemberId::from(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    Ok(negotiate(&headers, StatusCode::OK, &member, || {
        render_member(&member)
    }))
}
