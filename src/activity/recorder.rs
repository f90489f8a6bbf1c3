use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use super::repo;

#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn append(&self, user_id: Option<i64>, action: &str, details: &str)
        -> anyhow::Result<()>;
}

pub struct PgActivitySink {
    db: PgPool,
}

impl PgActivitySink {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivitySink for PgActivitySink {
    async fn append(
        &self,
        user_id: Option<i64>,
        action: &str,
        details: &str,
    ) -> anyhow::Result<()> {
        repo::append(&self.db, user_id, action, details).await
    }
}

/// Best-effort audit dispatch. Call sites invoke `record` only after the
/// primary mutation has committed; a failed append is warned about and
/// otherwise dropped, so the primary outcome is never rolled back for the
/// sake of the log.
#[derive(Clone)]
pub struct ActivityRecorder {
    sink: Arc<dyn ActivitySink>,
}

impl ActivityRecorder {
    pub fn new(sink: Arc<dyn ActivitySink>) -> Self {
        Self { sink }
    }

    pub async fn record(&self, user_id: Option<i64>, action: &str, details: impl AsRef<str>) {
        let details = details.as_ref();
        if let Err(e) = self.sink.append(user_id, action, details).await {
            warn!(error = %e, action, "activity log write failed; primary outcome unaffected");
        }
    }
}
