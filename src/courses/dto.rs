use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::Course;

/// Wire shape for a course. Keys are camelCase and the id is stringified,
/// matching what the frontend already consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub image: Option<String>,
    pub rating: f64,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub view_count: i64,
    pub enrollment_count: i64,
    pub popularity_score: i64,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id.to_string(),
            title: c.title,
            description: c.description,
            author: c.author,
            image: c.image,
            rating: c.rating,
            duration: c.duration,
            price: c.price,
            category: c.category,
            created_at: c.created_at,
            view_count: c.view_count,
            enrollment_count: c.enrollment_count,
            popularity_score: c.popularity_score,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub enrollment_count: Option<i64>,
    #[serde(default)]
    pub popularity_score: Option<i64>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_response_matches_frontend_shape() {
        let course = Course {
            id: 7,
            title: "Intro to Rust".into(),
            description: None,
            author: "Jane".into(),
            image: None,
            rating: 4.5,
            duration: Some("6 weeks".into()),
            price: Some("₦15,000".into()),
            category: Some("Programming".into()),
            created_at: OffsetDateTime::now_utc(),
            view_count: 12,
            enrollment_count: 3,
            popularity_score: 80,
        };
        let json = serde_json::to_string(&CourseResponse::from(course)).unwrap();
        assert!(json.contains("\"id\":\"7\""));
        assert!(json.contains("\"viewCount\":12"));
        assert!(json.contains("\"enrollmentCount\":3"));
        assert!(json.contains("\"popularityScore\":80"));
        assert!(json.contains("\"createdAt\""));
    }
}
