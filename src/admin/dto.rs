use serde::{Deserialize, Serialize};

use crate::activity::ActivityLogEntry;
use crate::courses::dto::CourseResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_count: i64,
    pub teacher_count: i64,
    pub course_count: i64,
    pub total_views: i64,
    pub top_courses: Vec<CourseResponse>,
    pub recent_activity: Vec<ActivityLogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
    }
}
