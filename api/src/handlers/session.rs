//! Login handler

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;

use super::negotiate;
use crate::auth::authenticate;
use crate::error::AppError;
use crate::render::render_caller;
use crate::AppState;

/// Request body for POST /login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login
///
/// Classifies the credentials as manager or member without opening a
/// session; later requests send the same credentials as Basic auth.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let caller = authenticate(&state.config, &*state.library, &body.user_id, &body.password).await?;
    tracing::info!(user_id = %caller.user_id, role = ?caller.role, "Login");

    Ok(negotiate(&headers, StatusCode::OK, &caller, || {
        render_caller(&caller)
    }))
}
