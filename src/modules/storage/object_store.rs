use std::future::Future;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::core::error::AppError;

/// Public object storage used by uploads and generated reports.
///
/// Keys are full object keys (already carrying the public prefix).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Key for `path` under the publicly readable prefix
    fn public_key(&self, path: &str) -> String;

    fn public_url(&self, key: &str) -> String;

    /// Reverse of [`public_url`](Self::public_url)
    fn key_from_url(&self, url: &str) -> Option<String>;

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Upload an object, then run `record` to persist its metadata.
///
/// When `record` fails the object is deleted again so no orphan is left in the
/// bucket. The original error is returned either way.
pub async fn put_then_record<T, F, Fut>(
    store: &dyn ObjectStore,
    key: &str,
    data: Vec<u8>,
    content_type: &str,
    record: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    store.put(key, data, content_type).await?;

    match record().await {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Recording '{}' failed, removing uploaded object: {}", key, e);
            if let Err(cleanup) = store.remove(key).await {
                error!("Failed to remove orphaned object '{}': {}", key, cleanup);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-process store for service tests
    #[derive(Default)]
    pub struct MemoryStore {
        pub(crate) objects: Mutex<HashMap<String, Vec<u8>>>,
        pub fail_uploads: bool,
    }

    impl MemoryStore {
        pub fn keys(&self) -> Vec<String> {
            let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        fn public_key(&self, path: &str) -> String {
            format!("public/{}", path)
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://storage.test/firesafe/{}", key)
        }

        fn key_from_url(&self, url: &str) -> Option<String> {
            url.strip_prefix("http://storage.test/firesafe/")
                .map(str::to_string)
        }

        async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
            if self.fail_uploads {
                return Err(AppError::ExternalServiceError("upload refused".to_string()));
            }
            self.objects.lock().unwrap().insert(key.to_string(), data);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), AppError> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[tokio::test]
    async fn test_object_is_kept_when_recording_succeeds() {
        let store = MemoryStore::default();
        let id = put_then_record(&store, "public/a.pdf", vec![1, 2, 3], "application/pdf", || async {
            Ok::<_, AppError>(42)
        })
        .await
        .unwrap();

        assert_eq!(id, 42);
        assert_eq!(store.keys(), vec!["public/a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_object_is_removed_when_recording_fails() {
        let store = MemoryStore::default();
        let result = put_then_record(&store, "public/a.pdf", vec![1], "application/pdf", || async {
            Err::<(), _>(AppError::Internal("insert failed".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_skips_recording() {
        let store = MemoryStore {
            fail_uploads: true,
            ..Default::default()
        };
        let mut recorded = false;
        let result = put_then_record(&store, "public/a.pdf", vec![1], "application/pdf", || {
            recorded = true;
            async { Ok::<_, AppError>(()) }
        })
        .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert!(!recorded);
    }
}
