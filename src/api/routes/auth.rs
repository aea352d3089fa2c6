//! Registration and login endpoints

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::instrument;

use crate::api::auth::issue_token;
use crate::api::dto::{CreatedResponse, CredentialsRequest, TokenResponse};
use crate::api::state::AppState;
use crate::core::user::{authenticate, register_user};
use crate::errors::Result;

/// Register a new user
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = payload?;

    let user = register_user(&state.db, &req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("User registered successfully", user.id)),
    ))
}

/// Exchange credentials for an access token
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = payload?;

    let user = authenticate(&state.db, &req.username, &req.password).await?;
    let issued = issue_token(user.id, &state.jwt)?;

    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}
