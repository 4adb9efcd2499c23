//! Record store seam for candidate imports.
//!
//! `AppState` holds an `Arc<dyn CandidateStore>`; production uses `PgCandidateStore`.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::candidates::normalize::NewCandidate;
use crate::models::candidate::CandidateStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store rejected record: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Constraint violations (SQLSTATE 23xxx) and bad values (22xxx) are the record's
    /// fault, not the database's; everything else stays a `Database` error.
    fn classify(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let data_fault = db
                .code()
                .is_some_and(|code| code.starts_with("22") || code.starts_with("23"));
            if data_fault {
                return StoreError::Rejected(db.message().to_string());
            }
        }
        StoreError::Database(e)
    }
}

/// Write operations the importer needs. Each call is independent; no call spans
/// more than one candidate.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Inserts the parent candidate row and returns its id.
    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<i64, StoreError>;

    /// Inserts work experiences, educations, projects and skills. All or nothing.
    async fn insert_children(
        &self,
        candidate_id: i64,
        candidate: &NewCandidate,
    ) -> Result<(), StoreError>;

    /// Deletes a candidate row (children cascade). Used to undo a half-written import.
    async fn remove_candidate(&self, candidate_id: i64) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO candidates
                (name, email, phone, position, years_of_experience, location,
                 expected_salary, summary, status, match_score, resume_file_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10)
            RETURNING id
            "#,
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.position)
        .bind(candidate.years_of_experience)
        .bind(&candidate.location)
        .bind(&candidate.expected_salary)
        .bind(&candidate.summary)
        .bind(CandidateStatus::Pending.as_str())
        .bind(&candidate.resume_file_key)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::classify)?;

        debug!("Inserted candidate row {id} ({})", candidate.name);
        Ok(id)
    }

    async fn insert_children(
        &self,
        candidate_id: i64,
        candidate: &NewCandidate,
    ) -> Result<(), StoreError> {
        if !candidate.has_children() {
            return Ok(());
        }

        self.write_children(candidate_id, candidate)
            .await
            .map_err(StoreError::classify)
    }

    async fn remove_candidate(&self, candidate_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(candidate_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl PgCandidateStore {
    /// All child rows of one candidate in a single transaction.
    async fn write_children(
        &self,
        candidate_id: i64,
        candidate: &NewCandidate,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for exp in &candidate.work_experiences {
            sqlx::query(
                r#"
                INSERT INTO work_experiences
                    (candidate_id, company, position, start_date, end_date, description, achievements)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(candidate_id)
            .bind(&exp.company)
            .bind(&exp.position)
            .bind(&exp.start_date)
            .bind(&exp.end_date)
            .bind(&exp.description)
            .bind(&exp.achievements)
            .execute(&mut *tx)
            .await?;
        }

        for edu in &candidate.educations {
            sqlx::query(
                r#"
                INSERT INTO educations (candidate_id, school, degree, major, start_date, end_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(candidate_id)
            .bind(&edu.school)
            .bind(&edu.degree)
            .bind(&edu.major)
            .bind(&edu.start_date)
            .bind(&edu.end_date)
            .execute(&mut *tx)
            .await?;
        }

        for project in &candidate.projects {
            sqlx::query(
                r#"
                INSERT INTO projects
                    (candidate_id, name, role, start_date, end_date, description, technologies, achievements)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(candidate_id)
            .bind(&project.name)
            .bind(&project.role)
            .bind(&project.start_date)
            .bind(&project.end_date)
            .bind(&project.description)
            .bind(&project.technologies)
            .bind(&project.achievements)
            .execute(&mut *tx)
            .await?;
        }

        for skill in &candidate.skills {
            sqlx::query("INSERT INTO skills (candidate_id, name, level) VALUES ($1, $2, $3)")
                .bind(candidate_id)
                .bind(&skill.name)
                .bind(skill.level.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }
}
