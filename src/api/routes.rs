//! API route handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::server::SharedState;
use crate::auth::models::{
    LoginRequest, LoginResponse, MessageResponse, RecoveryRequest, SessionResponse, StatusQuery,
    StatusResponse,
};
use crate::auth::SessionToken;
use crate::error::Error;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Response {
    tracing::info!("Login attempt for {}", req.email);

    match state.auth.login(&req.email, &req.password).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "Login realizado com sucesso!".to_string(),
                session_id: outcome.session_id,
                user: outcome.account,
            }),
        )
            .into_response(),
        // Every authentication failure is a 401, whatever its default code
        Err(e) if e.is_user_facing() => (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse {
                success: false,
                message: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn status(
    State(state): State<SharedState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, Error> {
    let status = state.auth.status(query.email.as_deref()).await?;
    tracing::debug!("Status for {}: {:?}", status.email, status);

    Ok(Json(StatusResponse {
        success: true,
        status,
    }))
}

pub async fn remember_password(
    State(state): State<SharedState>,
    Json(req): Json<RecoveryRequest>,
) -> Result<Json<MessageResponse>, Error> {
    let message = state.auth.remember_password(req.email.as_deref()).await?;
    Ok(Json(MessageResponse::ok(message)))
}

pub async fn check_session(
    State(state): State<SharedState>,
    token: SessionToken,
) -> Result<Json<SessionResponse>, Error> {
    let user = state.auth.check_session(token.as_deref()).await?;
    Ok(Json(SessionResponse {
        success: true,
        message: "Sessão válida".to_string(),
        user,
    }))
}

pub async fn logout(State(state): State<SharedState>, token: SessionToken) -> impl IntoResponse {
    state.auth.logout(token.as_deref()).await;
    Json(MessageResponse::ok("Logout realizado com sucesso!"))
}
