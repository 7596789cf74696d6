pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless core surfaces
        .route("/api/v1/normalize", post(handlers::handle_normalize))
        .route("/api/v1/rank", post(handlers::handle_rank))
        // Job-scoped ranking pass against the job board's records
        .route(
            "/api/v1/jobs/:job_id/ranking",
            get(handlers::handle_job_ranking),
        )
        .route(
            "/api/v1/jobs/:job_id/applicants/:apply_id",
            delete(handlers::handle_remove_applicant),
        )
        .with_state(state)
}
