use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting as stored by the job board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub job_title: String,
    pub job_description: String,
    pub is_active: bool,
}
