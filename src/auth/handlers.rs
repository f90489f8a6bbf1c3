use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    activity::actions,
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest},
        extractors::Actor,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{Role, User},
        services::is_valid_email,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    // Email uniqueness is case-sensitive, so only whitespace is trimmed.
    payload.email = payload.email.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(AppError::Internal)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(AppError::Internal)?;

    let role = if state.config.is_admin_email(&payload.email) {
        Role::Admin
    } else {
        Role::User
    };

    // A racing duplicate registration surfaces here as a unique violation,
    // which From<sqlx::Error> turns into a 409.
    let user = User::create(
        &state.db,
        &payload.email,
        &hash,
        payload.username.as_deref(),
        role,
    )
    .await?;

    info!(user_id = user.id, email = %user.email, role = ?user.role, "user registered");
    state
        .activity
        .record(
            Some(user.id),
            actions::REGISTRATION,
            format!("registered {}", user.email),
        )
        .await;

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.email = payload.email.trim().to_string();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Missing email or password".into()));
    }

    // Unknown email and wrong password produce the same response.
    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            AppError::InvalidCredential
        })?;

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(AppError::Internal)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredential);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(AppError::Internal)?;

    User::touch_last_login(&state.db, user.id)
        .await
        .map_err(AppError::Internal)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    state
        .activity
        .record(
            Some(user.id),
            actions::LOGIN,
            format!("login from {}", user.email),
        )
        .await;

    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(actor), fields(user_id = actor.0.id))]
pub async fn get_me(actor: Actor) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(PublicUser::from(actor.0)))
}
