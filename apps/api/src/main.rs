mod candidates;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::candidates::store::PgCandidateStore;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::resume::archive::S3ResumeArchive;
use crate::resume::info_extract::LlmResumeExtractor;
use crate::resume::pipeline::ResumePipeline;
use crate::resume::text_extract::{
    ConverterTextExtractor, DocumentTextExtractor, PdfTextExtractor, TextExtractor,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruit API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
        config.llm_api_url.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Resume text extraction: PDF in-process, Word through the conversion service
    let word: Option<Box<dyn TextExtractor>> = match &config.doc_converter_url {
        Some(url) => {
            info!("Word resumes will be converted via {url}");
            Some(Box::new(ConverterTextExtractor::new(
                url,
                config.doc_converter_timeout_secs,
            )?))
        }
        None => {
            warn!("DOC_CONVERTER_URL is not set; .doc/.docx resumes will fail to parse");
            None
        }
    };
    let text_extractor = DocumentTextExtractor::new(Box::new(PdfTextExtractor), word);
    let resume_pipeline = ResumePipeline::new(
        Arc::new(text_extractor),
        Arc::new(LlmResumeExtractor::new(llm.clone())),
    );

    let state = AppState {
        store: Arc::new(PgCandidateStore::new(db.clone())),
        db,
        llm,
        resume_pipeline,
        resume_archive: Arc::new(S3ResumeArchive::new(s3, config.s3_bucket.clone())),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "recruit-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
