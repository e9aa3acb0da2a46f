//! Optional upload of exported PDFs to S3 / MinIO.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Destination for exported PDFs. Default: `ExportStorage` (S3 / MinIO).
#[async_trait]
pub trait ExportUploader: Send + Sync {
    /// Stores `bytes` and returns a URL for the stored object.
    async fn upload(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        date: NaiveDate,
        bytes: Bytes,
    ) -> Result<String, AppError>;
}


pub struct ExportStorage {
    s3: S3Client,
    bucket: String,
    endpoint: String,
}

impl ExportStorage {
    pub fn new(s3: S3Client, bucket: String, endpoint: String) -> Self {
        Self {
            s3,
            bucket,
            endpoint,
        }
    }
}

#[async_trait]
impl ExportUploader for ExportStorage {
    async fn upload(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        date: NaiveDate,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let key = export_key(user_id, resume_id, date);
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Export upload failed: {e}")))?;

        info!("Uploaded export to s3://{}/{}", self.bucket, key);
        Ok(object_url(&self.endpoint, &self.bucket, &key))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryUploader;

#[cfg(test)]
mod memory {
    use std::sync::Mutex;

    use super::*;

    /// Keeps uploads in memory, or rejects every upload when built with `failing`.
    #[derive(Default)]
    pub struct MemoryUploader {
        fail: bool,
        keys: Mutex<Vec<String>>,
    }

    impl MemoryUploader {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn keys(&self) -> Vec<String> {
            self.keys.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExportUploader for MemoryUploader {
        async fn upload(
            &self,
            user_id: Uuid,
            resume_id: Uuid,
            date: NaiveDate,
            _bytes: Bytes,
        ) -> Result<String, AppError> {
            if self.fail {
                return Err(AppError::S3("bucket unavailable".to_string()));
            }
            let key = export_key(user_id, resume_id, date);
            self.keys.lock().unwrap().push(key.clone());
            Ok(object_url("http://storage.test", "vitae", &key))
        }
    }
}

pub fn export_key(user_id: Uuid, resume_id: Uuid, date: NaiveDate) -> String {
    format!("exports/{user_id}/{resume_id}/{}.pdf", date.format("%Y-%m-%d"))
}

fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/'))
}
