//! AI evaluation: asks the LLM for an HR assessment of one candidate and stores it.
//!
//! The overall score also becomes the candidate's `match_score`, which orders the list view.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use crate::candidates::prompts::{build_evaluation_prompt, evaluation_system};
use crate::candidates::queries::get_candidate_detail;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::candidate::AiEvaluationRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvaluation {
    #[serde(deserialize_with = "score_from_number_or_string")]
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
    pub detailed_analysis: String,
}

/// Accepts `87`, `87.5` or `"87"`; the result is clamped to 0..=100.
fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let score = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(|| serde::de::Error::custom(format!("overallScore is not a number: {raw}")))?;
    Ok(score.clamp(0.0, 100.0))
}

/// Generates, stores and returns a fresh evaluation. Replaces any earlier one.
pub async fn generate_evaluation(
    pool: &PgPool,
    llm: &LlmClient,
    candidate_id: i64,
) -> Result<CandidateEvaluation, AppError> {
    let detail = get_candidate_detail(pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let prompt = build_evaluation_prompt(&detail);
    let evaluation: CandidateEvaluation = llm
        .call_json(&prompt, &evaluation_system())
        .await
        .map_err(|e| AppError::Llm(format!("Candidate evaluation failed: {e}")))?;

    save_evaluation(pool, candidate_id, &evaluation).await?;
    info!(
        "Stored evaluation for candidate {candidate_id}: score {:.1}",
        evaluation.overall_score
    );
    Ok(evaluation)
}

async fn save_evaluation(
    pool: &PgPool,
    candidate_id: i64,
    evaluation: &CandidateEvaluation,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO ai_evaluations
            (candidate_id, overall_score, strengths, risks, suggestions, detailed_analysis)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (candidate_id) DO UPDATE SET
            overall_score = EXCLUDED.overall_score,
            strengths = EXCLUDED.strengths,
            risks = EXCLUDED.risks,
            suggestions = EXCLUDED.suggestions,
            detailed_analysis = EXCLUDED.detailed_analysis,
            updated_at = NOW()
        "#,
    )
    .bind(candidate_id)
    .bind(evaluation.overall_score)
    .bind(sqlx::types::Json(&evaluation.strengths))
    .bind(sqlx::types::Json(&evaluation.risks))
    .bind(sqlx::types::Json(&evaluation.suggestions))
    .bind(&evaluation.detailed_analysis)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE candidates SET match_score = $1, updated_at = NOW() WHERE id = $2")
        .bind(evaluation.overall_score)
        .bind(candidate_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// The stored evaluation, if one was ever generated.
pub async fn get_evaluation(
    pool: &PgPool,
    candidate_id: i64,
) -> Result<Option<AiEvaluationRow>, sqlx::Error> {
    sqlx::query_as::<_, AiEvaluationRow>("SELECT * FROM ai_evaluations WHERE candidate_id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await
}
