use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    activity::actions,
    auth::extractors::Actor,
    auth::repo_types::Role,
    courses,
    error::AppError,
    state::AppState,
};

use super::dto::ResourceResponse;
use super::{repo, services};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:id/resources",
            get(list_resources).post(upload_resource),
        )
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<Vec<ResourceResponse>>, AppError> {
    if courses::repo::find(&state.db, course_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Course not found".into()));
    }

    let resources = repo::list_by_course(&state.db, course_id)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(
        resources.into_iter().map(ResourceResponse::from).collect(),
    ))
}

/// Multipart upload of a single `file` field, attached to a course.
#[instrument(skip(state, actor, mp), fields(actor_id = actor.0.id))]
pub async fn upload_resource(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<i64>,
    mp: Multipart,
) -> Result<(StatusCode, Json<ResourceResponse>), AppError> {
    actor.0.require_role(&[Role::Admin, Role::Teacher])?;

    if courses::repo::find(&state.db, course_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Course not found".into()));
    }

    let Some((file_name, content_type, data)) = read_upload(mp).await? else {
        return Err(AppError::Validation("file field is required".into()));
    };
    if data.is_empty() {
        return Err(AppError::Validation("file is empty".into()));
    }

    let resource =
        services::store_resource(&state, course_id, &file_name, &content_type, data)
            .await
            .map_err(AppError::Internal)?;

    info!(
        resource_id = resource.id,
        course_id,
        file = %resource.file_name,
        "resource uploaded"
    );
    state
        .activity
        .record(
            Some(actor.0.id),
            actions::FILE_UPLOAD,
            format!(
                "uploaded {} to course {}",
                resource.file_name, course_id
            ),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ResourceResponse::from(resource))))
}

/// Pulls the first `file` field out of the multipart stream. A broken stream
/// (truncated body, tripped size limit) is reported as its own 400 rather
/// than being mistaken for a missing field.
async fn read_upload(
    mut mp: Multipart,
) -> Result<Option<(String, String, bytes::Bytes)>, AppError> {
    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                return Err(AppError::Validation(format!(
                    "malformed multipart body: {}",
                    e
                )))
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload".into());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("unreadable upload: {}", e)))?;
        return Ok(Some((file_name, content_type, data)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};

    async fn multipart_for(body: &'static str) -> Multipart {
        let req = Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=BOUNDARY",
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn read_upload_extracts_the_file_field() {
        let mp = multipart_for(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"syllabus.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             course outline\r\n\
             --BOUNDARY--\r\n",
        )
        .await;
        let (file_name, content_type, data) =
            read_upload(mp).await.expect("read").expect("file present");
        assert_eq!(file_name, "syllabus.pdf");
        assert_eq!(content_type, "application/pdf");
        assert_eq!(&data[..], b"course outline");
    }

    #[tokio::test]
    async fn read_upload_reports_missing_file_field_as_absent() {
        let mp = multipart_for(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"notes\"\r\n\r\n\
             just text\r\n\
             --BOUNDARY--\r\n",
        )
        .await;
        assert!(read_upload(mp).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn read_upload_flags_a_broken_stream_as_malformed() {
        // Truncated mid-headers; no terminating boundary.
        let mp = multipart_for("--BOUNDARY\r\nContent-Disposition: form-data").await;
        let err = read_upload(mp).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("malformed multipart body")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

