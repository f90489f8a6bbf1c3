use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    activity::{self, ActivityLogEntry},
    auth::extractors::Actor,
    auth::repo_types::Role,
    courses::dto::CourseResponse,
    courses::repo_types::Course,
    error::AppError,
    state::AppState,
};

use super::dto::{DashboardResponse, Pagination};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/activity", get(list_activity))
}

#[instrument(skip(state, actor), fields(actor_id = actor.0.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<DashboardResponse>, AppError> {
    actor.0.require_role(&[Role::Admin])?;

    let (user_count,): (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(&state.db)
        .await?;
    let (teacher_count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM users WHERE role = 'teacher'")
            .fetch_one(&state.db)
            .await?;
    let (course_count, total_views): (i64, i64) = sqlx::query_as(
        "SELECT count(*), COALESCE(sum(view_count), 0)::bigint FROM courses",
    )
    .fetch_one(&state.db)
    .await?;

    let top_courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, author, image, rating, duration, price,
               category, created_at, view_count, enrollment_count, popularity_score
        FROM courses
        ORDER BY view_count DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let recent_activity = activity::repo::list_recent(&state.db, 20, 0)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(DashboardResponse {
        user_count,
        teacher_count,
        course_count,
        total_views,
        top_courses: top_courses.into_iter().map(CourseResponse::from).collect(),
        recent_activity,
    }))
}

#[instrument(skip(state, actor), fields(actor_id = actor.0.id))]
pub async fn list_activity(
    State(state): State<AppState>,
    actor: Actor,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ActivityLogEntry>>, AppError> {
    actor.0.require_role(&[Role::Admin])?;

    let limit = p.limit.clamp(1, 500);
    let offset = p.offset.max(0);
    let entries = activity::repo::list_recent(&state.db, limit, offset)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(entries))
}
