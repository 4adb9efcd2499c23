//! Resume pipeline: drives documents through text extraction and structured-info
//! extraction one at a time, yielding one outcome per document.
//!
//! `run` returns a lazy stream: nothing happens until it is polled, and dropping it
//! stops after the document in flight. Outcomes already yielded are unaffected.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::candidates::draft::CandidateDraft;
use crate::resume::format::ResumeDocument;
use crate::resume::info_extract::{ExtractedResume, ResumeInfoExtractor};
use crate::resume::text_extract::TextExtractor;
use crate::resume::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u8
    }
}

/// Result of one document. `index` is its position in the submitted list.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub index: usize,
    pub filename: String,
    pub result: Result<CandidateDraft, ExtractError>,
    pub progress: Progress,
}

/// A document that produced a draft.
#[derive(Debug, Clone)]
pub struct ParsedResume {
    pub index: usize,
    pub filename: String,
    pub draft: CandidateDraft,
}

/// Successful drafts in input order plus one warning per skipped document.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub drafts: Vec<ParsedResume>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no resumes could be parsed")]
    NothingParsed { warnings: Vec<String> },
}

#[derive(Clone)]
pub struct ResumePipeline {
    text_extractor: Arc<dyn TextExtractor>,
    info_extractor: Arc<dyn ResumeInfoExtractor>,
}

impl ResumePipeline {
    pub fn new(
        text_extractor: Arc<dyn TextExtractor>,
        info_extractor: Arc<dyn ResumeInfoExtractor>,
    ) -> Self {
        Self {
            text_extractor,
            info_extractor,
        }
    }

    /// Text extraction followed by structured-info extraction for a single document.
    pub async fn extract(&self, document: &ResumeDocument) -> Result<ExtractedResume, ExtractError> {
        let text = self
            .text_extractor
            .extract(document.format, &document.bytes)
            .await?;
        self.info_extractor.extract(&text).await
    }

    /// Processes `documents` strictly sequentially. The stream is finite and cannot be restarted.
    /// Documents are shared, not copied, so callers can keep their bytes for archiving.
    pub fn run(
        &self,
        documents: Arc<[ResumeDocument]>,
    ) -> impl Stream<Item = DocumentOutcome> + Send + 'static {
        let total = documents.len();
        let pipeline = self.clone();

        stream::unfold(
            (pipeline, documents, 0),
            move |(pipeline, documents, index)| async move {
                let document = documents.get(index)?;
                let result = pipeline.extract(document).await.map(CandidateDraft::from);
                let outcome = DocumentOutcome {
                    index,
                    filename: document.filename.clone(),
                    result,
                    progress: Progress {
                        completed: index + 1,
                        total,
                    },
                };
                Some((outcome, (pipeline, documents, index + 1)))
            },
        )
    }
}

/// Drains a pipeline stream. Fails only when not a single document produced a draft.
pub async fn collect_report(
    outcomes: impl Stream<Item = DocumentOutcome>,
) -> Result<PipelineReport, PipelineError> {
    let mut outcomes = std::pin::pin!(outcomes);
    let mut report = PipelineReport::default();

    while let Some(outcome) = outcomes.next().await {
        match outcome.result {
            Ok(draft) => report.drafts.push(ParsedResume {
                index: outcome.index,
                filename: outcome.filename,
                draft,
            }),
            Err(e) => {
                warn!("Skipping resume '{}': {e}", outcome.filename);
                report.warnings.push(format!("{}: {e}", outcome.filename));
            }
        }
        info!(
            "Resume pipeline progress: {}/{} ({}%)",
            outcome.progress.completed,
            outcome.progress.total,
            outcome.progress.percent()
        );
    }

    if report.drafts.is_empty() {
        return Err(PipelineError::NothingParsed {
            warnings: report.warnings,
        });
    }
    Ok(report)
}
