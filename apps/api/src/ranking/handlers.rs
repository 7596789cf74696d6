//! Axum route handlers for the Ranking API.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::applicants::salary::{salary_distribution, SalaryBucket};
use crate::errors::AppError;
use crate::ranking::{
    normalize_markup, rank_applicants, ApplicantStatus, Candidate, RankingResult, ScoredApplicant,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CandidateInput {
    /// Opaque caller-side identifier, echoed back unchanged.
    pub id: Value,
    pub experience_text: String,
    #[serde(default)]
    pub status: ApplicantStatus,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    pub candidates: Vec<CandidateInput>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub ranking: Vec<ScoredApplicant<Value>>,
    pub shortlisted: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RankedApplicant {
    pub apply_id: i64,
    pub user_id: i64,
    pub apply_date: Option<NaiveDate>,
    pub expected_salary: i64,
    pub score: f64,
    pub status: ApplicantStatus,
}

#[derive(Debug, Serialize)]
pub struct JobRankingResponse {
    pub job_id: i64,
    pub job_title: String,
    pub applicants: Vec<RankedApplicant>,
    pub shortlisted: Option<i64>,
    pub salary_distribution: Vec<SalaryBucket>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/normalize
///
/// Plain-text rendering of a rich-text field.
pub async fn handle_normalize(Json(request): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    Json(NormalizeResponse {
        text: normalize_markup(&request.html),
    })
}

/// POST /api/v1/rank
///
/// Ranks caller-supplied candidates against a job description. Nothing is persisted;
/// the caller commits `shortlisted` itself.
pub async fn handle_rank(
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let candidates: Vec<Candidate<Value>> = request
        .candidates
        .into_iter()
        .map(|c| Candidate::new(c.id, c.experience_text).with_status(c.status))
        .collect();

    let result = run_ranking(request.job_description, candidates).await?;

    Ok(Json(RankResponse {
        ranking: result.ranked,
        shortlisted: result.shortlisted,
    }))
}

/// GET /api/v1/jobs/:job_id/ranking
///
/// Ranks every live application to an active job, persists the shortlist directive,
/// and returns the ranking with the applicants' salary distribution.
pub async fn handle_job_ranking(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobRankingResponse>, AppError> {
    let job = state
        .store
        .active_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let records = state.store.applicants(job_id).await?;
    if job.job_description.trim().is_empty() && !records.is_empty() {
        warn!("Job {job_id} has an empty description; every applicant scores 0");
    }

    let candidates: Vec<Candidate<i64>> = records
        .iter()
        .map(|r| {
            Candidate::new(r.apply_id, r.experience_text.clone())
                .with_status(ApplicantStatus::from_label(&r.status))
        })
        .collect();

    let result = run_ranking(job.job_description, candidates).await?;

    if let Some(apply_id) = result.shortlisted {
        state
            .store
            .set_status(apply_id, &ApplicantStatus::Shortlisted)
            .await?;
    }

    info!(
        "Ranked {} applicants for job {job_id}; shortlisted {:?} (score {:.3})",
        result.ranked.len(),
        result.shortlisted,
        result.top().map_or(0.0, |top| top.score)
    );

    let salaries: Vec<i64> = records.iter().map(|r| r.expected_salary).collect();
    let by_id: HashMap<i64, _> = records.iter().map(|r| (r.apply_id, r)).collect();

    let applicants = result
        .ranked
        .into_iter()
        .filter_map(|scored| {
            by_id.get(&scored.id).map(|r| RankedApplicant {
                apply_id: r.apply_id,
                user_id: r.user_id,
                apply_date: r.apply_date,
                expected_salary: r.expected_salary,
                score: scored.score,
                status: scored.status,
            })
        })
        .collect();

    Ok(Json(JobRankingResponse {
        job_id,
        job_title: job.job_title,
        applicants,
        shortlisted: result.shortlisted,
        salary_distribution: salary_distribution(&salaries),
    }))
}

/// DELETE /api/v1/jobs/:job_id/applicants/:apply_id
///
/// Soft-removes an application; it no longer takes part in rankings.
pub async fn handle_remove_applicant(
    State(state): State<AppState>,
    Path((job_id, apply_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    if !state.store.remove_applicant(job_id, apply_id).await? {
        return Err(AppError::NotFound(format!(
            "Application {apply_id} not found for job {job_id}"
        )));
    }

    info!("Removed application {apply_id} from job {job_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a ranking pass on the blocking pool.
async fn run_ranking<Id>(
    job_text: String,
    candidates: Vec<Candidate<Id>>,
) -> Result<RankingResult<Id>, AppError>
where
    Id: Clone + Send + 'static,
{
    tokio::task::spawn_blocking(move || rank_applicants(&job_text, &candidates))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("ranking task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::applicants::store::memory::MemoryApplicantStore;
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::*;

    fn app(store: Arc<MemoryApplicantStore>) -> axum::Router {
        build_router(AppState { store })
    }

    async fn send(
        router: axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(b) => Body::from(b.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn seeded_store() -> Arc<MemoryApplicantStore> {
        let store = Arc::new(MemoryApplicantStore::default());
        store.add_job(1, "<p>Java <b>backend</b> developer</p>", true);
        store.add_application(1, 11, 45_000, "<p>Java backend</p>");
        store.add_application(1, 12, 90_000, "java backend");
        store.add_application(1, 13, 250_000, "cooking");
        store
    }

    #[tokio::test]
    async fn test_normalize_endpoint() {
        let store = Arc::new(MemoryApplicantStore::default());
        let (status, body) = send(
            app(store),
            Method::POST,
            "/api/v1/normalize",
            Some(json!({ "html": "<p>Hello <b>World</b></p>" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("Hello") && text.contains("World"));
        assert!(!text.contains('<') && !text.contains('>'));
    }

    #[tokio::test]
    async fn test_rank_endpoint_orders_and_shortlists() {
        let store = Arc::new(MemoryApplicantStore::default());
        let (status, body) = send(
            app(store),
            Method::POST,
            "/api/v1/rank",
            Some(json!({
                "job_description": "java backend developer",
                "candidates": [
                    { "id": 1, "experience_text": "java backend" },
                    { "id": 2, "experience_text": "java backend" },
                    { "id": 3, "experience_text": "cooking", "status": "Rejected" }
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shortlisted"], json!(1));
        let ranking = body["ranking"].as_array().unwrap();
        let ids: Vec<&Value> = ranking.iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, vec![&json!(1), &json!(2), &json!(3)]);
        assert_eq!(ranking[0]["status"], json!("Short Listed"));
        assert_eq!(ranking[1]["status"], json!(""));
        assert_eq!(ranking[2]["status"], json!("Rejected"));
        assert_eq!(ranking[2]["score"], json!(0.0));
    }

    #[tokio::test]
    async fn test_rank_endpoint_empty_candidates() {
        let store = Arc::new(MemoryApplicantStore::default());
        let (status, body) = send(
            app(store),
            Method::POST,
            "/api/v1/rank",
            Some(json!({ "job_description": "rust", "candidates": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ranking"], json!([]));
        assert_eq!(body["shortlisted"], Value::Null);
    }

    #[tokio::test]
    async fn test_rank_endpoint_rejects_blank_description() {
        let store = Arc::new(MemoryApplicantStore::default());
        let (status, body) = send(
            app(store),
            Method::POST,
            "/api/v1/rank",
            Some(json!({ "job_description": "  ", "candidates": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_job_ranking_persists_shortlist() {
        let store = seeded_store();
        let (status, body) = send(
            app(store.clone()),
            Method::GET,
            "/api/v1/jobs/1/ranking",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shortlisted"], json!(11));
        let order: Vec<i64> = body["applicants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["apply_id"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![11, 12, 13]);

        assert_eq!(store.status_of(11).as_deref(), Some("Short Listed"));
        assert_eq!(store.status_of(12).as_deref(), Some(""));
        assert_eq!(
            store.status_writes.lock().unwrap().clone(),
            vec![(11, "Short Listed".to_string())]
        );

        let counts: Vec<u64> = body["salary_distribution"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["count"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 1]);
    }

    #[tokio::test]
    async fn test_job_ranking_preserves_other_statuses() {
        let store = seeded_store();
        store.set_label(13, "Rejected");
        let (status, body) = send(
            app(store.clone()),
            Method::GET,
            "/api/v1/jobs/1/ranking",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applicants"][2]["status"], json!("Rejected"));
        assert_eq!(store.status_of(13).as_deref(), Some("Rejected"));
    }

    #[tokio::test]
    async fn test_job_ranking_without_applicants() {
        let store = Arc::new(MemoryApplicantStore::default());
        store.add_job(2, "rust", true);
        let (status, body) =
            send(app(store.clone()), Method::GET, "/api/v1/jobs/2/ranking", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applicants"], json!([]));
        assert_eq!(body["shortlisted"], Value::Null);
        assert!(store.status_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_ranking_unknown_or_inactive_job() {
        let store = Arc::new(MemoryApplicantStore::default());
        store.add_job(3, "closed role", false);

        let (status, _) =
            send(app(store.clone()), Method::GET, "/api/v1/jobs/3/ranking", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(app(store), Method::GET, "/api/v1/jobs/99/ranking", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_removed_applicant_excluded_from_ranking() {
        let store = seeded_store();

        let (status, _) = send(
            app(store.clone()),
            Method::DELETE,
            "/api/v1/jobs/1/applicants/11",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(app(store.clone()), Method::GET, "/api/v1/jobs/1/ranking", None).await;
        assert_eq!(body["shortlisted"], json!(12));
        assert_eq!(body["applicants"].as_array().unwrap().len(), 2);

        let (status, _) = send(
            app(store),
            Method::DELETE,
            "/api/v1/jobs/1/applicants/11",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
