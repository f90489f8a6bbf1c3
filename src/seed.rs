use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;
use tracing::{info, instrument};

use crate::courses::dto::CreateCourseRequest;
use crate::courses::repo;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/seed", post(seed))
}

fn sample_courses() -> Vec<CreateCourseRequest> {
    vec![
        CreateCourseRequest {
            title: "Introduction to Machine Learning with Python".into(),
            author: "Dr. Sarah Johnson".into(),
            description: None,
            image: Some("https://images.unsplash.com/photo-1516321318423-f06f85e504b3?ixlib=rb-4.0.3&auto=format&fit=crop&w=1170&q=80".into()),
            rating: Some(4.8),
            duration: Some("8 weeks".into()),
            price: Some("₦15,000".into()),
            category: Some("Data Science".into()),
            view_count: Some(1250),
            enrollment_count: Some(320),
            popularity_score: Some(95),
        },
        CreateCourseRequest {
            title: "Modern Web Development: React & Node.js".into(),
            author: "Michael Chen".into(),
            description: None,
            image: Some("https://images.unsplash.com/photo-1605379399642-870262d3d051?ixlib=rb-4.0.3&auto=format&fit=crop&w=1206&q=80".into()),
            rating: Some(4.7),
            duration: Some("10 weeks".into()),
            price: Some("₦18,000".into()),
            category: Some("Programming".into()),
            view_count: Some(980),
            enrollment_count: Some(210),
            popularity_score: Some(88),
        },
        CreateCourseRequest {
            title: "Fundamentals of UI/UX Design".into(),
            author: "Emma Thompson".into(),
            description: None,
            image: Some("https://images.unsplash.com/photo-1488590528505-98d2b5aba04b?ixlib=rb-4.0.3&auto=format&fit=crop&w=1170&q=80".into()),
            rating: Some(4.9),
            duration: Some("6 weeks".into()),
            price: Some("₦14,500".into()),
            category: Some("Design".into()),
            view_count: Some(1100),
            enrollment_count: Some(280),
            popularity_score: Some(92),
        },
        CreateCourseRequest {
            title: "Digital Marketing Fundamentals".into(),
            author: "Jessica Adams".into(),
            description: None,
            image: Some("https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?ixlib=rb-4.0.3&auto=format&fit=crop&w=1170&q=80".into()),
            rating: Some(4.6),
            duration: Some("6 weeks".into()),
            price: Some("₦12,500".into()),
            category: Some("Marketing".into()),
            view_count: Some(860),
            enrollment_count: Some(175),
            popularity_score: Some(83),
        },
        CreateCourseRequest {
            title: "Financial Planning & Investment Strategies".into(),
            author: "Robert Williams".into(),
            description: None,
            image: Some("https://images.unsplash.com/photo-1551288049-bebda4e38f71?ixlib=rb-4.0.3&auto=format&fit=crop&w=1170&q=80".into()),
            rating: Some(4.9),
            duration: Some("4 weeks".into()),
            price: Some("₦20,000".into()),
            category: Some("Finance".into()),
            view_count: Some(750),
            enrollment_count: Some(150),
            popularity_score: Some(87),
        },
    ]
}

/// Loads sample catalog data. Gated behind `ALLOW_SEED`; idempotent over
/// course titles. No accounts are created here; admin access comes from the
/// `ADMIN_EMAILS` allow-list at registration time.
#[instrument(skip(state))]
pub async fn seed(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    if !state.config.allow_seed {
        return Err(AppError::Forbidden(
            "Not allowed in this environment".into(),
        ));
    }

    let mut inserted = 0u32;
    for mut course in sample_courses() {
        if repo::find_by_title(&state.db, &course.title)
            .await
            .map_err(AppError::Internal)?
            .is_some()
        {
            continue;
        }
        if course.description.is_none() {
            course.description = Some(format!("Description for {}", course.title));
        }
        repo::create(&state.db, &course)
            .await
            .map_err(AppError::Internal)?;
        inserted += 1;
    }

    info!(inserted, "database seeded");
    Ok(Json(json!({ "message": "Database seeded successfully" })))
}
