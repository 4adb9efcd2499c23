use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::candidates::draft::CandidateDraft;
use crate::candidates::evaluation::{generate_evaluation, get_evaluation, CandidateEvaluation};
use crate::candidates::import_file::parse_import_file;
use crate::candidates::importer::{batch_import, insert_candidate, BatchImportResult};
use crate::candidates::normalize::normalize_draft;
use crate::candidates::queries::{
    batch_update_status, get_candidate_detail, list_candidates, update_status, CandidateDetail,
    CandidateFilter, CandidateListItem,
};
use crate::errors::{ApiJson, AppError};
use crate::models::candidate::{AiEvaluationRow, CandidateStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub candidates: Vec<CandidateDraft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub candidate_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFileResponse {
    #[serde(flatten)]
    pub result: BatchImportResult,
    /// 1-based data-row numbers of CSV rows skipped for missing name or position.
    pub dropped_rows: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: CandidateStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusRequest {
    pub candidate_ids: Vec<i64>,
    pub status: CandidateStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusResponse {
    pub success: bool,
    pub updated_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request-level checks for a batch: size cap and non-empty name/position on every element.
/// Any violation rejects the whole call before anything is written.
pub fn validate_batch_request(drafts: &[CandidateDraft], max_batch_size: usize) -> Result<(), AppError> {
    if drafts.len() > max_batch_size {
        return Err(AppError::Validation(format!(
            "Batch contains {} candidates; at most {max_batch_size} are allowed per request",
            drafts.len()
        )));
    }

    for (i, draft) in drafts.iter().enumerate() {
        for (field, value) in [("name", &draft.name), ("position", &draft.position)] {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Err(AppError::Validation(format!(
                    "candidates[{i}].{field} must not be empty"
                )));
            }
        }
    }
    Ok(())
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Result<Json<Vec<CandidateListItem>>, AppError> {
    Ok(Json(list_candidates(&state.db, &filter).await?))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CandidateDetail>, AppError> {
    get_candidate_detail(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// PATCH /api/v1/candidates/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !update_status(&state.db, id, req.status).await? {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/v1/candidates/status
pub async fn handle_batch_update_status(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchStatusRequest>,
) -> Result<Json<BatchStatusResponse>, AppError> {
    let updated_count = batch_update_status(&state.db, &req.candidate_ids, req.status).await?;
    Ok(Json(BatchStatusResponse {
        success: true,
        updated_count,
    }))
}

/// GET /api/v1/candidates/:id/evaluation
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AiEvaluationRow>, AppError> {
    get_evaluation(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No evaluation for candidate {id}")))
}

/// POST /api/v1/candidates/:id/evaluation
pub async fn handle_generate_evaluation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CandidateEvaluation>, AppError> {
    Ok(Json(generate_evaluation(&state.db, &state.llm, id).await?))
}

/// POST /api/v1/candidates/import
///
/// Single imports validate the full draft up front, so a malformed email is a 400 here.
/// Values the store rejects (over-long columns and the like) are a 400 as well.
pub async fn handle_import_candidate(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<CandidateDraft>,
) -> Result<Json<ImportResponse>, AppError> {
    let candidate = normalize_draft(&draft).map_err(|e| AppError::Validation(e.to_string()))?;

    let candidate_id = insert_candidate(state.store.as_ref(), &candidate).await?;

    info!("Imported candidate {candidate_id} ({})", candidate.name);
    Ok(Json(ImportResponse {
        success: true,
        candidate_id,
    }))
}

/// POST /api/v1/candidates/batch-import
pub async fn handle_batch_import(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchImportRequest>,
) -> Result<Json<BatchImportResult>, AppError> {
    validate_batch_request(&req.candidates, state.config.max_batch_size)?;
    Ok(Json(batch_import(state.store.as_ref(), &req.candidates).await))
}

/// POST /api/v1/candidates/import-file
///
/// Multipart upload with a single `file` field holding a `.json` or `.csv` document.
pub async fn handle_import_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportFileResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| AppError::Validation(format!("{filename} is not UTF-8 text")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let parsed = parse_import_file(&filename, text)?;
    validate_batch_size(parsed.drafts.len(), state.config.max_batch_size)?;
    info!(
        "Parsed {} candidates from {filename} ({} rows dropped)",
        parsed.drafts.len(),
        parsed.dropped_rows.len()
    );

    let result = batch_import(state.store.as_ref(), &parsed.drafts).await;
    Ok(Json(ImportFileResponse {
        result,
        dropped_rows: parsed.dropped_rows,
    }))
}

fn validate_batch_size(len: usize, max_batch_size: usize) -> Result<(), AppError> {
    if len > max_batch_size {
        return Err(AppError::Validation(format!(
            "File contains {len} candidates; at most {max_batch_size} are allowed per import"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, position: &str) -> CandidateDraft {
        CandidateDraft {
            name: Some(name.to_string()),
            position: Some(position.to_string()),
            ..CandidateDraft::default()
        }
    }

    #[test]
    fn test_batch_over_cap_rejected() {
        let drafts = vec![draft("A", "Dev"), draft("B", "Dev"), draft("C", "Dev")];
        assert!(validate_batch_request(&drafts, 2).is_err());
        assert!(validate_batch_request(&drafts, 3).is_ok());
    }

    #[test]
    fn test_empty_position_fails_whole_batch() {
        let drafts = vec![draft("A", "Dev"), draft("B", "  ")];
        match validate_batch_request(&drafts, 10) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "candidates[1].position must not be empty"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_bad_email_is_not_a_request_level_error() {
        let mut d = draft("A", "Dev");
        d.email = Some("not-an-email".to_string());
        assert!(validate_batch_request(&[d], 10).is_ok());
    }

    #[test]
    fn test_empty_batch_is_valid_request() {
        assert!(validate_batch_request(&[], 10).is_ok());
    }
}
