use std::sync::Arc;

use sqlx::PgPool;

use crate::candidates::store::CandidateStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::archive::ResumeArchive;
use crate::resume::pipeline::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once in `main`; handlers only ever see it through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Read queries, status updates and evaluations.
    pub db: PgPool,
    /// Candidate writes used by every import path.
    pub store: Arc<dyn CandidateStore>,
    pub llm: LlmClient,
    pub resume_pipeline: ResumePipeline,
    pub resume_archive: Arc<dyn ResumeArchive>,
    pub config: Config,
}
