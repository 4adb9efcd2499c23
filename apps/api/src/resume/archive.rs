//! Archives original resume files so a candidate's source document can be retrieved later.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::{error, info};
use uuid::Uuid;

use crate::resume::format::ResumeDocument;

#[async_trait]
pub trait ResumeArchive: Send + Sync {
    /// Stores the document and returns its object key.
    async fn store(&self, document: &ResumeDocument) -> anyhow::Result<String>;
}

pub struct S3ResumeArchive {
    s3: S3Client,
    bucket: String,
}

impl S3ResumeArchive {
    pub fn new(s3: S3Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl ResumeArchive for S3ResumeArchive {
    async fn store(&self, document: &ResumeDocument) -> anyhow::Result<String> {
        let key = resume_object_key(Uuid::new_v4(), &document.filename);

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(document.bytes.clone()))
            .content_type(document.format.mime_type())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to upload resume to S3");
                anyhow::anyhow!("S3 upload failed: {e}")
            })?;

        info!("Archived resume to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}

/// `resumes/<id>/<filename>`, with any client-side directory part dropped.
pub fn resume_object_key(id: Uuid, filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("resume");
    format!("resumes/{id}/{base}")
}
