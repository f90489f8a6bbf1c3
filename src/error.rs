use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

/// Application error taxonomy. The three credential variants are distinguishable
/// internally but share one wire message, so a caller cannot probe which step of
/// token verification failed.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("missing authorization token")]
    MissingCredential,

    #[error("invalid or expired token")]
    InvalidCredential,

    #[error("token subject no longer exists")]
    UnknownSubject,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MissingCredential
            | AppError::InvalidCredential
            | AppError::UnknownSubject => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn wire_message(&self) -> String {
        match self {
            // Uniform 401 body regardless of which credential check failed.
            AppError::MissingCredential => "Missing authorization token".into(),
            AppError::InvalidCredential | AppError::UnknownSubject => {
                "Invalid credentials".into()
            }
            // Detail stays in the server log.
            AppError::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if let AppError::Internal(ref e) = self {
            error!(error = %e, "internal fault");
        }
        let body = Json(json!({ "message": self.wire_message() }));
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("Not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("Duplicate record".into())
            }
            _ => AppError::Internal(e.into()),
        }
    }
}
