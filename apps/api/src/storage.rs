//! Resume blob storage. Pluggable so handlers never touch the S3 SDK directly.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`; production uses `S3ResumeStore`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError>;
    /// Missing objects surface as `AppError::NotFound`.
    async fn get(&self, key: &str) -> Result<Bytes, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Object key for a newly uploaded resume.
pub fn resume_key(jd_id: &str, upload_id: Uuid) -> String {
    format!("resumes/{jd_id}/{upload_id}.pdf")
}

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(pdf))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::NotFound(format!("Resume '{key}' not found"))
                } else {
                    AppError::Storage(format!("S3 download failed: {e}"))
                }
            })?;

        let pdf = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download stream failed: {e}")))?
            .into_bytes();
        Ok(pdf)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Deleted resume s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-process store for handler tests.
    #[derive(Default)]
    pub struct MemoryResumeStore {
        pub objects: Mutex<HashMap<String, Bytes>>,
    }

    #[async_trait]
    impl ResumeStore for MemoryResumeStore {
        async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError> {
            self.objects
                .lock()
                .map_err(|e| AppError::Storage(e.to_string()))?
                .insert(key.to_string(), pdf);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Bytes, AppError> {
            self.objects
                .lock()
                .map_err(|e| AppError::Storage(e.to_string()))?
                .get(key)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Resume '{key}' not found")))
        }

        async fn delete(&self, key: &str) -> Result<(), AppError> {
            self.objects
                .lock()
                .map_err(|e| AppError::Storage(e.to_string()))?
                .remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryResumeStore;
    use super::*;

    #[test]
    fn test_resume_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            resume_key("JD-42", id),
            "resumes/JD-42/00000000-0000-0000-0000-000000000000.pdf"
        );
    }

    #[tokio::test]
    async fn test_memory_store_put_get_and_delete() {
        let store = MemoryResumeStore::default();
        store.put("a.pdf", Bytes::from_static(b"%PDF-1.4")).await.unwrap();
        assert_eq!(store.get("a.pdf").await.unwrap(), Bytes::from_static(b"%PDF-1.4"));
        store.delete("a.pdf").await.unwrap();
        assert!(store.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_missing_key_is_not_found() {
        let store = MemoryResumeStore::default();
        let result = store.get("resumes/JD-1/missing.pdf").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
