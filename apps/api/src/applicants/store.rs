//! Applicant store — the persistence collaborator around the ranker.
//!
//! All relational loading happens here, before ranking starts: the ranker only ever
//! receives plain strings. `AppState` holds an `Arc<dyn ApplicantStore>`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRecord, AppliedJobRow, ExperienceRow};
use crate::models::job::JobRow;
use crate::ranking::ApplicantStatus;

#[async_trait]
pub trait ApplicantStore: Send + Sync {
    /// The active job with `job_id`, if any.
    async fn active_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError>;

    /// Non-removed applications to `job_id`, in application order, with each
    /// applicant's experience text already concatenated.
    async fn applicants(&self, job_id: i64) -> Result<Vec<ApplicantRecord>, AppError>;

    /// Persists a status label on one application.
    async fn set_status(&self, apply_id: i64, status: &ApplicantStatus) -> Result<(), AppError>;

    /// Soft-removes an application from a job. Returns `false` when no live
    /// application matched.
    async fn remove_applicant(&self, job_id: i64, apply_id: i64) -> Result<bool, AppError>;
}

/// Joins the experience descriptions of each user's first resume (lowest resume id),
/// keeping entry order. Rows of later resumes are ignored; a first resume without
/// experience yields an empty text.
pub fn concat_experience(rows: Vec<ExperienceRow>) -> HashMap<i64, String> {
    let mut first_resume: HashMap<i64, i64> = HashMap::new();
    for row in &rows {
        first_resume
            .entry(row.user_id)
            .and_modify(|id| *id = (*id).min(row.resume_id))
            .or_insert(row.resume_id);
    }

    let mut texts: HashMap<i64, String> = HashMap::new();
    for row in rows {
        if first_resume.get(&row.user_id) != Some(&row.resume_id) {
            continue;
        }
        let text = texts.entry(row.user_id).or_default();
        let Some(description) = row.official_description else {
            continue;
        };
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&description);
    }
    texts
}

/// Pairs every application with its applicant's experience text.
///
/// A user who applied more than once gets the same text on each application; a user
/// without any resume gets an empty text. Application order is kept.
pub fn records_from_rows(
    rows: Vec<AppliedJobRow>,
    experience: Vec<ExperienceRow>,
) -> Vec<ApplicantRecord> {
    let texts = concat_experience(experience);
    rows.into_iter()
        .map(|row| {
            let text = texts.get(&row.user_id).cloned().unwrap_or_default();
            ApplicantRecord::from_row(row, text)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

/// Reads and writes the job board's existing tables.
pub struct PgApplicantStore {
    pool: PgPool,
}

impl PgApplicantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicantStore for PgApplicantStore {
    async fn active_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError> {
        let job = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id::BIGINT AS id, job_title, job_description, is_active
            FROM classify_resume_jobs
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn applicants(&self, job_id: i64) -> Result<Vec<ApplicantRecord>, AppError> {
        let rows = sqlx::query_as::<_, AppliedJobRow>(
            r#"
            SELECT id::BIGINT AS apply_id,
                   user_id::BIGINT AS user_id,
                   apply_date,
                   expected_salary::BIGINT AS expected_salary,
                   apply_status
            FROM classify_resume_appliedjob
            WHERE apply_job_id = $1 AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let mut user_ids: Vec<i64> = rows.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        // Every resume of every applicant; `concat_experience` keeps the first one.
        let experience = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT r.user_id::BIGINT AS user_id,
                   r.id::BIGINT AS resume_id,
                   p.official_description
            FROM classify_resume_resumepersonalinfo r
            LEFT JOIN classify_resume_professionalexperienceinfo p ON p.user_info_id = r.id
            WHERE r.user_id = ANY($1)
            ORDER BY r.user_id, r.id, p.id
            "#,
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Fetched {} applications and {} resume rows for job {job_id}",
            rows.len(),
            experience.len()
        );

        Ok(records_from_rows(rows, experience))
    }

    async fn set_status(&self, apply_id: i64, status: &ApplicantStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE classify_resume_appliedjob SET apply_status = $1 WHERE id = $2")
            .bind(status.as_label())
            .bind(apply_id)
            .execute(&self.pool)
            .await?;

        info!("Application {apply_id} status set to '{status}'");
        Ok(())
    }

    async fn remove_applicant(&self, job_id: i64, apply_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE classify_resume_appliedjob
            SET is_deleted = TRUE
            WHERE id = $1 AND apply_job_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(apply_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation for handler tests
// ────────────────────────────────────────────────────────────────────────────
