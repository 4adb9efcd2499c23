// Resume import: binary resume → plain text → structured draft, one document at a time.
// All LLM calls go through llm_client.

pub mod archive;
pub mod format;
pub mod handlers;
pub mod info_extract;
pub mod pipeline;
pub mod prompts;
pub mod text_extract;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::format::DocumentFormat;

/// Failure to turn one document into a draft. Never fatal to a batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read {format:?} document: {message}")]
    Decode {
        format: DocumentFormat,
        message: String,
    },

    #[error("{0:?} documents cannot be decoded: no conversion service is configured")]
    NoConverter(DocumentFormat),

    #[error("document contains no extractable text")]
    EmptyText,

    #[error("resume information extraction failed: {0}")]
    Llm(#[from] LlmError),

    #[error("extracted resume is incomplete: {0}")]
    Incomplete(String),
}
