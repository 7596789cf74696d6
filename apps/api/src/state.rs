use std::sync::Arc;

use crate::applicants::store::ApplicantStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator. Default: `PgApplicantStore`.
    pub store: Arc<dyn ApplicantStore>,
}
