use axum::{
    extract::{Path, State},
    routing::{patch, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    activity::actions,
    auth::{dto::PublicUser, extractors::Actor, repo_types::User},
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/metadata", patch(update_metadata))
        .route("/users/:id/teacher-application", post(apply_for_teacher))
}

fn require_object(patch: &serde_json::Value) -> Result<(), AppError> {
    if patch.is_object() {
        return Ok(());
    }
    Err(AppError::Validation("Body must be a JSON object".into()))
}

/// Shallow-merges the request body into the target user's metadata bag.
/// Self-scoped: only the user themselves or an admin may patch it.
#[instrument(skip(state, actor, patch), fields(actor_id = actor.0.id))]
pub async fn update_metadata(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<i64>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<PublicUser>, AppError> {
    actor.0.require_self_or_admin(user_id)?;
    require_object(&patch)?;

    let user = User::merge_metadata(&state.db, user_id, &patch)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    state
        .activity
        .record(
            Some(actor.0.id),
            actions::METADATA_UPDATE,
            format!("metadata updated for user {}", user_id),
        )
        .await;

    Ok(Json(PublicUser::from(user)))
}

/// Self-service promotion from `user` to `teacher`. The role flip and the
/// application payload land in one UPDATE, so concurrent applications can
/// never leave the row half-updated.
#[instrument(skip(state, actor, application), fields(actor_id = actor.0.id))]
pub async fn apply_for_teacher(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<i64>,
    Json(application): Json<serde_json::Value>,
) -> Result<Json<PublicUser>, AppError> {
    actor.0.require_self_or_admin(user_id)?;
    require_object(&application)?;

    let payload = serde_json::json!({ "teacher_application": application });
    let user = User::apply_for_teacher(&state.db, user_id, &payload)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(user_id, role = ?user.role, "teacher application recorded");

    state
        .activity
        .record(
            Some(actor.0.id),
            actions::TEACHER_APPLICATION,
            format!("teacher application for user {}", user_id),
        )
        .await;

    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_patch_must_be_an_object() {
        assert!(require_object(&serde_json::json!({"bio": "hi"})).is_ok());
        assert!(matches!(
            require_object(&serde_json::json!([1, 2])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_object(&serde_json::json!("string")),
            Err(AppError::Validation(_))
        ));
    }
}
