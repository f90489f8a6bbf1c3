use anyhow::Context;
use sqlx::PgPool;

use super::dto::{CreateCourseRequest, UpdateCourseRequest};
use super::repo_types::Course;

const COURSE_COLUMNS: &str = "id, title, description, author, image, rating, duration, price, \
                              category, created_at, view_count, enrollment_count, popularity_score";

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Course>> {
    let rows = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
    .context("list courses")?;
    Ok(rows)
}

pub async fn list_by_category(db: &PgPool, category: &str) -> anyhow::Result<Vec<Course>> {
    let rows = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE category = $1 ORDER BY created_at DESC"
    ))
    .bind(category)
    .fetch_all(db)
    .await
    .context("list courses by category")?;
    Ok(rows)
}

/// Case-insensitive substring match over title, category and author.
pub async fn search(db: &PgPool, query: &str) -> anyhow::Result<Vec<Course>> {
    let pattern = format!("%{}%", query);
    let rows = sqlx::query_as::<_, Course>(&format!(
        r#"
        SELECT {COURSE_COLUMNS}
        FROM courses
        WHERE title ILIKE $1 OR category ILIKE $1 OR author ILIKE $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(pattern)
    .fetch_all(db)
    .await
    .context("search courses")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: i64) -> anyhow::Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find course")?;
    Ok(course)
}

pub async fn find_by_title(db: &PgPool, title: &str) -> anyhow::Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE title = $1"
    ))
    .bind(title)
    .fetch_optional(db)
    .await
    .context("find course by title")?;
    Ok(course)
}

/// Bump the view counter and return the updated row in one statement.
pub async fn increment_views(db: &PgPool, id: i64) -> anyhow::Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        UPDATE courses
           SET view_count = view_count + 1
         WHERE id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("increment course views")?;
    Ok(course)
}

pub async fn create(db: &PgPool, req: &CreateCourseRequest) -> anyhow::Result<Course> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (title, description, author, image, rating, duration, price,
                             category, view_count, enrollment_count, popularity_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.author)
    .bind(&req.image)
    .bind(req.rating.unwrap_or(0.0))
    .bind(&req.duration)
    .bind(&req.price)
    .bind(&req.category)
    .bind(req.view_count.unwrap_or(0))
    .bind(req.enrollment_count.unwrap_or(0))
    .bind(req.popularity_score.unwrap_or(0))
    .fetch_one(db)
    .await
    .context("create course")?;
    Ok(course)
}

/// COALESCE keeps stored values for fields absent from the patch.
pub async fn update(
    db: &PgPool,
    id: i64,
    req: &UpdateCourseRequest,
) -> anyhow::Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        UPDATE courses
           SET title       = COALESCE($2, title),
               description = COALESCE($3, description),
               author      = COALESCE($4, author),
               image       = COALESCE($5, image),
               rating      = COALESCE($6, rating),
               duration    = COALESCE($7, duration),
               price       = COALESCE($8, price),
               category    = COALESCE($9, category)
         WHERE id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.author)
    .bind(&req.image)
    .bind(req.rating)
    .bind(&req.duration)
    .bind(&req.price)
    .bind(&req.category)
    .fetch_optional(db)
    .await
    .context("update course")?;
    Ok(course)
}

/// Returns false when the course does not exist.
pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete course")?;
    Ok(result.rows_affected() > 0)
}
