use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{DashboardResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(p)| p)
        .map_err(|e| AppError::Validation(e.body_text()))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    services::signup(state.users.as_ref(), body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let auth_token = services::login(state.users.as_ref(), &keys, body(payload)?).await?;
    Ok(Json(LoginResponse { auth_token }))
}

#[instrument(skip_all)]
pub async fn dashboard(AuthUser(claims): AuthUser) -> Json<DashboardResponse> {
    info!(user_id = %claims.id, "dashboard access");
    Json(DashboardResponse { verified: true })
}
