//! Signup and login.

use api_types::user::{Credentials, LoginResponse, UserView};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use engine::EngineError;

use crate::{
    ServerError,
    auth::{hash_password, verify_password},
    server::ServerState,
};

const BAD_LOGIN: &str = "incorrect username or password";

pub async fn signup(
    State(state): State<ServerState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let Json(credentials) = payload?;
    if credentials.username.trim().is_empty() {
        return Err(ServerError::BadRequest("username is required".to_string()));
    }
    if credentials.password.is_empty() {
        return Err(ServerError::BadRequest("password is required".to_string()));
    }

    let hashed = hash_password(&credentials.password)?;
    let user = state
        .engine
        .create_user(&credentials.username, &hashed)
        .await?;
    tracing::info!(user_id = %user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServerError> {
    let Json(credentials) = payload?;

    let user = match state.engine.user_by_username(&credentials.username).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => {
            tracing::warn!("login for unknown user");
            return Err(ServerError::Unauthenticated(BAD_LOGIN.to_string()));
        }
        Err(err) => return Err(err.into()),
    };
    if !verify_password(&credentials.password, &user.hashed_password)? {
        tracing::warn!(user_id = %user.id, "login with wrong password");
        return Err(ServerError::Unauthenticated(BAD_LOGIN.to_string()));
    }

    let token = state.keys.sign(user.id)?;
    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}
