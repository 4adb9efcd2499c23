//! Text extraction: binary resume documents to plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::resume::format::DocumentFormat;
use crate::resume::ExtractError;

/// Converts a document of a declared format into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// PDF text via `pdf-extract`, run on the blocking pool.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await
            .map_err(|e| ExtractError::Decode {
                format,
                message: format!("extraction task failed: {e}"),
            })?
            .map_err(|e| ExtractError::Decode {
                format,
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct ConverterResponse {
    #[serde(default)]
    text: String,
    error: Option<String>,
}

/// Word (.doc/.docx) text via an external conversion service.
///
/// The document is posted as multipart field `file`; the service answers `{ "text": "..." }`.
pub struct ConverterTextExtractor {
    client: reqwest::Client,
    url: String,
}

impl ConverterTextExtractor {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
            url: format!("{}/api/v1/extract-text", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TextExtractor for ConverterTextExtractor {
    async fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        let decode = |message: String| ExtractError::Decode { format, message };

        let part = Part::bytes(bytes.to_vec())
            .file_name(format!("resume.{}", format.extension()))
            .mime_str(format.mime_type())
            .map_err(|e| decode(e.to_string()))?;

        debug!("Calling document conversion service: {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| decode(format!("conversion request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| decode(format!("could not read conversion response: {e}")))?;

        if !status.is_success() {
            return Err(decode(format!("conversion service returned {status}: {body}")));
        }

        let parsed: ConverterResponse = serde_json::from_str(&body)
            .map_err(|e| decode(format!("unexpected conversion response: {e}")))?;
        match parsed.error {
            Some(message) if parsed.text.trim().is_empty() => Err(decode(message)),
            _ => Ok(parsed.text),
        }
    }
}

/// Routes each format to its extractor and rejects documents with no usable text.
pub struct DocumentTextExtractor {
    pdf: Box<dyn TextExtractor>,
    word: Option<Box<dyn TextExtractor>>,
}

impl DocumentTextExtractor {
    pub fn new(pdf: Box<dyn TextExtractor>, word: Option<Box<dyn TextExtractor>>) -> Self {
        Self { pdf, word }
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = if format.is_word() {
            let word = self.word.as_ref().ok_or(ExtractError::NoConverter(format))?;
            word.extract(format, bytes).await?
        } else {
            self.pdf.extract(format, bytes).await?
        };

        if text.trim().is_empty() {
            return Err(ExtractError::EmptyText);
        }
        Ok(text)
    }
}
