use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;
use crate::storage::StorageClient;

use super::repo::{self, CourseResource};

/// Only keep characters that are safe in a storage key; everything else
/// becomes an underscore.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".into()
    } else {
        cleaned
    }
}

/// Writes the file through the storage client, then records the row. The
/// storage write happens first so a failed write never leaves a dangling
/// database record.
pub async fn store_resource(
    state: &AppState,
    course_id: i64,
    file_name: &str,
    content_type: &str,
    body: Bytes,
) -> anyhow::Result<CourseResource> {
    let safe_name = sanitize_file_name(file_name);
    let storage_key = format!("courses/{}/{}-{}", course_id, Uuid::new_v4(), safe_name);
    let size_bytes = body.len() as i64;

    state.storage.put_object(&storage_key, body).await?;

    repo::insert(
        &state.db,
        course_id,
        &safe_name,
        content_type,
        size_bytes,
        &storage_key,
    )
    .await
}

/// Removes the stored files behind a set of resources. Best-effort: the rows
/// are already gone by the time this runs, so a failed unlink is warned about
/// and skipped rather than failing the deletion that triggered it.
pub async fn remove_stored_files(storage: &dyn StorageClient, keys: &[String]) {
    for key in keys {
        if let Err(e) = storage.delete_object(key).await {
            warn!(error = %e, key = %key, "failed to remove stored file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("notes-v2.pdf"), "notes-v2.pdf");
        assert_eq!(sanitize_file_name("week_1.tar.gz"), "week_1.tar.gz");
    }

    #[test]
    fn sanitize_replaces_path_separators_and_spaces() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitize_file_name("my notes.pdf"), "my_notes.pdf");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_file_name(""), "file");
    }

    struct CapturingStorage {
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StorageClient for CapturingStorage {
        async fn put_object(&self, _key: &str, _body: Bytes) -> anyhow::Result<()> {
            Ok(())
        }

        async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
            self.deleted.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl StorageClient for FailingStorage {
        async fn put_object(&self, _key: &str, _body: Bytes) -> anyhow::Result<()> {
            Ok(())
        }

        async fn delete_object(&self, _key: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk on fire")
        }
    }

    #[tokio::test]
    async fn remove_stored_files_deletes_every_key() {
        let storage = CapturingStorage {
            deleted: Mutex::new(Vec::new()),
        };
        let keys = vec![
            "courses/1/a-notes.pdf".to_string(),
            "courses/1/b-slides.pdf".to_string(),
        ];
        remove_stored_files(&storage, &keys).await;
        assert_eq!(*storage.deleted.lock().unwrap(), keys);
    }

    #[tokio::test]
    async fn remove_stored_files_survives_delete_failures() {
        let keys = vec!["courses/1/a-notes.pdf".to_string()];
        // Must not panic or propagate; the caller already committed its delete.
        remove_stored_files(&FailingStorage, &keys).await;
    }
}
