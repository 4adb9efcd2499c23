//! Read and status-update queries over the candidate tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::models::candidate::{
    CandidateRow, CandidateStatus, EducationRow, ProjectRow, SkillRow, WorkExperienceRow,
};

/// List filters. Every field is optional; text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    pub search: Option<String>,
    pub position: Option<String>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub status: Option<CandidateStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListItem {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub skills: Vec<SkillRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetail {
    pub candidate: CandidateRow,
    pub work_experiences: Vec<WorkExperienceRow>,
    pub educations: Vec<EducationRow>,
    pub projects: Vec<ProjectRow>,
    pub skills: Vec<SkillRow>,
}

/// Candidates matching `filter`, best match score first, each with its skills.
pub async fn list_candidates(
    pool: &PgPool,
    filter: &CandidateFilter,
) -> Result<Vec<CandidateListItem>, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM candidates WHERE TRUE");
    push_filters(&mut query, filter);
    query.push(" ORDER BY match_score DESC, id ASC");

    let candidates = query
        .build_query_as::<CandidateRow>()
        .fetch_all(pool)
        .await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
    let skills = sqlx::query_as::<_, SkillRow>(
        "SELECT * FROM skills WHERE candidate_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_candidate: HashMap<i64, Vec<SkillRow>> = HashMap::new();
    for skill in skills {
        by_candidate.entry(skill.candidate_id).or_default().push(skill);
    }

    Ok(candidates
        .into_iter()
        .map(|candidate| CandidateListItem {
            skills: by_candidate.remove(&candidate.id).unwrap_or_default(),
            candidate,
        })
        .collect())
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &CandidateFilter) {
    if let Some(search) = non_blank(&filter.search) {
        let pattern = format!("%{search}%");
        query
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR position ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(position) = non_blank(&filter.position) {
        query
            .push(" AND position ILIKE ")
            .push_bind(format!("%{position}%"));
    }
    if let Some(min) = filter.min_experience {
        query.push(" AND years_of_experience >= ").push_bind(min);
    }
    if let Some(max) = filter.max_experience {
        query.push(" AND years_of_experience <= ").push_bind(max);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Candidate with all related records, or `None` if the id is unknown.
pub async fn get_candidate_detail(
    pool: &PgPool,
    candidate_id: i64,
) -> Result<Option<CandidateDetail>, sqlx::Error> {
    let Some(candidate) =
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(candidate_id)
            .fetch_optional(pool)
            .await?
    else {
        return Ok(None);
    };

    let work_experiences = sqlx::query_as::<_, WorkExperienceRow>(
        "SELECT * FROM work_experiences WHERE candidate_id = $1 ORDER BY id",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    let educations = sqlx::query_as::<_, EducationRow>(
        "SELECT * FROM educations WHERE candidate_id = $1 ORDER BY id",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    let projects = sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM projects WHERE candidate_id = $1 ORDER BY id",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    let skills =
        sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE candidate_id = $1 ORDER BY id")
            .bind(candidate_id)
            .fetch_all(pool)
            .await?;

    Ok(Some(CandidateDetail {
        candidate,
        work_experiences,
        educations,
        projects,
        skills,
    }))
}

/// Returns false when no candidate has that id.
pub async fn update_status(
    pool: &PgPool,
    candidate_id: i64,
    status: CandidateStatus,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE candidates SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(candidate_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Sets `status` on every listed candidate; unknown ids are skipped. Returns the number updated.
pub async fn batch_update_status(
    pool: &PgPool,
    candidate_ids: &[i64],
    status: CandidateStatus,
) -> Result<u64, sqlx::Error> {
    if candidate_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "UPDATE candidates SET status = $1, updated_at = NOW() WHERE id = ANY($2)",
    )
    .bind(status.as_str())
    .bind(candidate_ids)
    .execute(pool)
    .await?;

    info!(
        "Set status '{}' on {} of {} candidates",
        status.as_str(),
        result.rows_affected(),
        candidate_ids.len()
    );
    Ok(result.rows_affected())
}
