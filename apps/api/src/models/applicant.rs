use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One application to a job, joined with nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppliedJobRow {
    pub apply_id: i64,
    pub user_id: i64,
    pub apply_date: Option<NaiveDate>,
    pub expected_salary: i64,
    pub apply_status: String,
}

/// One resume of an applicant, joined with one of its experience entries.
///
/// `official_description` is `None` for a resume without any experience entry.
#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub user_id: i64,
    pub resume_id: i64,
    pub official_description: Option<String>,
}

/// Everything a ranking pass needs about one application, fetched up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub apply_id: i64,
    pub user_id: i64,
    pub apply_date: Option<NaiveDate>,
    pub expected_salary: i64,
    pub status: String,
    /// All experience descriptions of the applicant, in entry order, newline-joined.
    pub experience_text: String,
}

impl ApplicantRecord {
    pub fn from_row(row: AppliedJobRow, experience_text: String) -> Self {
        Self {
            apply_id: row.apply_id,
            user_id: row.user_id,
            apply_date: row.apply_date,
            expected_salary: row.expected_salary,
            status: row.apply_status,
            experience_text,
        }
    }
}
