use serde::Serialize;
use time::OffsetDateTime;

use super::repo::CourseResource;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: i64,
    pub course_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<CourseResource> for ResourceResponse {
    fn from(r: CourseResource) -> Self {
        Self {
            id: r.id,
            course_id: r.course_id,
            file_name: r.file_name,
            content_type: r.content_type,
            size_bytes: r.size_bytes,
            created_at: r.created_at,
        }
    }
}
