use sqlx::PgPool;

use super::repo_types::{Role, User};

const USER_COLUMNS: &str =
    "id, email, password_hash, username, role, metadata, created_at, last_login_at";

impl User {
    /// Find a user by email. The email column is a case-sensitive unique key.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user. Returns the raw sqlx error so callers can map a
    /// unique violation on email to a 409.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        username: Option<&str>,
        role: Role,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, username, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(role)
        .fetch_one(db)
        .await
    }

    pub async fn touch_last_login(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Shallow-merge a JSON object into the metadata bag. The merge happens in
    /// SQL (`||`) so concurrent patches stay atomic per row.
    pub async fn merge_metadata(
        db: &PgPool,
        id: i64,
        patch: &serde_json::Value,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET metadata = metadata || $2
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Teacher application: promote `user` to `teacher` and merge the
    /// application payload into metadata in one statement, so a concurrent
    /// second application can never observe a half-updated row. Roles other
    /// than `user` are left unchanged (transitions are one-directional).
    pub async fn apply_for_teacher(
        db: &PgPool,
        id: i64,
        application: &serde_json::Value,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET role = CASE WHEN role = 'user' THEN 'teacher'::user_role ELSE role END,
                   metadata = metadata || $2
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(application)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
