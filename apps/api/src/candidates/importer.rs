//! Batch importer: persists drafts one at a time and reports a per-record outcome
//! for every input, in input order.
//!
//! A draft that fails validation never reaches the store. A draft that the store
//! rejects fails alone; siblings before and after it are unaffected. When child rows
//! fail after the parent row was written, the parent is removed again so a failed
//! record leaves nothing behind.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::candidates::draft::CandidateDraft;
use crate::candidates::normalize::{normalize_draft, DraftError, NewCandidate};
use crate::candidates::store::{CandidateStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecordResult {
    pub success: bool,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportResult {
    /// The call itself completed; per-record outcomes live in `results`.
    pub success: bool,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<ImportRecordResult>,
}

/// Why a single record could not be imported.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("{0}")]
    Invalid(#[from] DraftError),

    #[error("failed to save candidate: {0}")]
    Store(#[source] StoreError),

    #[error("failed to save related records: {source}")]
    Children {
        #[source]
        source: StoreError,
    },

    #[error("failed to save related records: {source}; candidate {candidate_id} could not be removed")]
    Orphaned {
        candidate_id: i64,
        #[source]
        source: StoreError,
    },
}

impl ImportError {
    /// True when the record itself is at fault: it failed validation, or the store
    /// rejected its values. Anything else is an infrastructure failure.
    pub fn is_record_fault(&self) -> bool {
        matches!(
            self,
            ImportError::Invalid(_)
                | ImportError::Store(StoreError::Rejected(_))
                | ImportError::Children {
                    source: StoreError::Rejected(_)
                }
        )
    }
}

/// Imports every draft independently and aggregates the outcomes.
///
/// Drafts are processed sequentially; `results[i]` always describes `drafts[i]`.
/// An empty input is a valid, empty batch.
pub async fn batch_import(store: &dyn CandidateStore, drafts: &[CandidateDraft]) -> BatchImportResult {
    let mut results = Vec::with_capacity(drafts.len());

    for (index, draft) in drafts.iter().enumerate() {
        let name = draft.display_name();
        let result = match import_draft(store, draft).await {
            Ok(candidate_id) => ImportRecordResult {
                success: true,
                name,
                candidate_id: Some(candidate_id),
                error: None,
            },
            Err(e) => {
                warn!("Import of record #{} ('{}') failed: {e}", index + 1, name);
                ImportRecordResult {
                    success: false,
                    name,
                    candidate_id: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    let success_count = results.iter().filter(|r| r.success).count();
    let failure_count = results.len() - success_count;

    info!(
        "Batch import finished: total={}, succeeded={}, failed={}",
        results.len(),
        success_count,
        failure_count
    );

    BatchImportResult {
        success: true,
        total: results.len(),
        success_count,
        failure_count,
        results,
    }
}

/// Validates and persists one draft, returning the new candidate id.
pub async fn import_draft(
    store: &dyn CandidateStore,
    draft: &CandidateDraft,
) -> Result<i64, ImportError> {
    let candidate = normalize_draft(draft)?;
    insert_candidate(store, &candidate).await
}

/// Writes the parent row and its children as one logical step.
pub async fn insert_candidate(
    store: &dyn CandidateStore,
    candidate: &NewCandidate,
) -> Result<i64, ImportError> {
    let candidate_id = store
        .insert_candidate(candidate)
        .await
        .map_err(ImportError::Store)?;

    if let Err(source) = store.insert_children(candidate_id, candidate).await {
        return match store.remove_candidate(candidate_id).await {
            Ok(()) => Err(ImportError::Children { source }),
            Err(remove_err) => {
                warn!("Could not remove partially imported candidate {candidate_id}: {remove_err}");
                Err(ImportError::Orphaned {
                    candidate_id,
                    source,
                })
            }
        };
    }

    Ok(candidate_id)
}
