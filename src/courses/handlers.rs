use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    activity::actions,
    auth::extractors::{Actor, OptionalActor},
    auth::repo_types::Role,
    error::AppError,
    resources,
    state::AppState,
};

use super::dto::{CourseResponse, CreateCourseRequest, SearchQuery, UpdateCourseRequest};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/search", get(search_courses))
        .route("/courses/category/:category", get(courses_by_category))
        .route("/courses/:id", get(get_course))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/courses", post(create_course))
        .route("/admin/courses/:id", put(update_course).delete(delete_course))
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = repo::list_all(&state.db).await.map_err(AppError::Internal)?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn courses_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = repo::list_by_category(&state.db, &category)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    if params.q.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let courses = repo::search(&state.db, &params.q)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// Public view: bumps the view counter and writes a best-effort `course_view`
/// entry, attributed when the request carried a usable token.
#[instrument(skip(state, actor))]
pub async fn get_course(
    State(state): State<AppState>,
    OptionalActor(actor): OptionalActor,
    Path(id): Path<i64>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = repo::increment_views(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

    state
        .activity
        .record(
            actor.map(|u| u.id),
            actions::COURSE_VIEW,
            format!("viewed course {}: {}", course.id, course.title),
        )
        .await;

    Ok(Json(CourseResponse::from(course)))
}

#[instrument(skip(state, actor, payload), fields(actor_id = actor.0.id))]
pub async fn create_course(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    actor.0.require_role(&[Role::Admin, Role::Teacher])?;

    if payload.title.trim().is_empty() || payload.author.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let course = repo::create(&state.db, &payload)
        .await
        .map_err(AppError::Internal)?;

    info!(course_id = course.id, title = %course.title, "course created");
    state
        .activity
        .record(
            Some(actor.0.id),
            actions::COURSE_CREATE,
            format!("created course {}: {}", course.id, course.title),
        )
        .await;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

#[instrument(skip(state, actor, payload), fields(actor_id = actor.0.id))]
pub async fn update_course(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    actor.0.require_role(&[Role::Admin, Role::Teacher])?;

    let course = repo::update(&state.db, id, &payload)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

    info!(course_id = course.id, "course updated");
    state
        .activity
        .record(
            Some(actor.0.id),
            actions::COURSE_UPDATE,
            format!("updated course {}: {}", course.id, course.title),
        )
        .await;

    Ok(Json(CourseResponse::from(course)))
}

#[instrument(skip(state, actor), fields(actor_id = actor.0.id))]
pub async fn delete_course(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    actor.0.require_role(&[Role::Admin])?;

    // Collect storage keys first; the rows vanish with the course via cascade.
    let storage_keys: Vec<String> = resources::repo::list_by_course(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|r| r.storage_key)
        .collect();

    let deleted = repo::delete(&state.db, id)
        .await
        .map_err(AppError::Internal)?;
    if !deleted {
        return Err(AppError::NotFound("Course not found".into()));
    }

    resources::services::remove_stored_files(state.storage.as_ref(), &storage_keys).await;

    info!(course_id = id, "course deleted");
    state
        .activity
        .record(
            Some(actor.0.id),
            actions::COURSE_DELETE,
            format!("deleted course {}", id),
        )
        .await;

    Ok(Json(json!({ "message": "Course deleted successfully" })))
}
