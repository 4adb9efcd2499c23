use std::sync::Arc;

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::candidates::importer::{batch_import, BatchImportResult};
use crate::errors::{ApiJson, AppError};
use crate::resume::format::{partition_resume_uploads, DocumentFormat, ResumeDocument};
use crate::resume::info_extract::ExtractedResume;
use crate::resume::pipeline::{collect_report, PipelineError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFile {
    /// Base64 file content. A `data:<mime>;base64,` prefix is tolerated.
    pub file_data: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeImportRequest {
    pub files: Vec<ResumeFile>,
}

#[derive(Debug, Serialize)]
pub struct ResumeImportResponse {
    pub warnings: Vec<String>,
    pub result: BatchImportResult,
}

fn decode_file_data(file_data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match file_data.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => file_data,
    };
    STANDARD.decode(payload.trim())
}

/// POST /api/v1/resumes/parse
///
/// Extracts structured fields from one resume without importing it.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResumeFile>,
) -> Result<Json<ExtractedResume>, AppError> {
    let format = DocumentFormat::from_filename(&req.filename).ok_or_else(|| {
        AppError::Validation(format!(
            "{}: unsupported file type, only .pdf, .doc and .docx resumes are accepted",
            req.filename
        ))
    })?;
    let bytes = decode_file_data(&req.file_data)
        .map_err(|e| AppError::Validation(format!("fileData is not valid base64: {e}")))?;

    let document = ResumeDocument {
        filename: req.filename,
        format,
        bytes,
    };
    let resume = state
        .resume_pipeline
        .extract(&document)
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("{}: {e}", document.filename)))?;

    Ok(Json(resume))
}

/// POST /api/v1/resumes/import
///
/// Unsupported or undecodable files become warnings, extraction failures become warnings,
/// and everything that parsed is archived and batch-imported. Fails with 422 only when
/// nothing parsed at all.
pub async fn handle_import_resumes(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResumeImportRequest>,
) -> Result<Json<ResumeImportResponse>, AppError> {
    let max = state.config.max_batch_size;
    if req.files.len() > max {
        return Err(AppError::Validation(format!(
            "Request contains {} resumes; at most {max} are allowed per request",
            req.files.len()
        )));
    }

    let mut warnings = Vec::new();
    let mut uploads = Vec::with_capacity(req.files.len());
    for file in req.files {
        match decode_file_data(&file.file_data) {
            Ok(bytes) => uploads.push((file.filename, bytes)),
            Err(e) => warnings.push(format!("{}: file data is not valid base64 ({e})", file.filename)),
        }
    }

    let (documents, rejected) = partition_resume_uploads(uploads);
    warnings.extend(rejected);
    let documents: Arc<[ResumeDocument]> = documents.into();

    let report = collect_report(state.resume_pipeline.run(Arc::clone(&documents)))
        .await
        .map_err(|e| {
            let PipelineError::NothingParsed { warnings: failed } = e;
            AppError::NothingParsed {
                warnings: warnings.iter().cloned().chain(failed).collect(),
            }
        })?;
    warnings.extend(report.warnings);

    let mut drafts = Vec::with_capacity(report.drafts.len());
    for parsed in report.drafts {
        let mut draft = parsed.draft;
        match state.resume_archive.store(&documents[parsed.index]).await {
            Ok(key) => draft.resume_file_key = Some(key),
            Err(e) => {
                warn!("Could not archive resume '{}': {e:#}", parsed.filename);
                warnings.push(format!(
                    "{}: imported without the original file, archiving failed",
                    parsed.filename
                ));
            }
        }
        drafts.push(draft);
    }

    let result = batch_import(state.store.as_ref(), &drafts).await;
    info!(
        "Resume import: {} imported, {} failed, {} warnings",
        result.success_count,
        result.failure_count,
        warnings.len()
    );

    Ok(Json(ResumeImportResponse { warnings, result }))
}
