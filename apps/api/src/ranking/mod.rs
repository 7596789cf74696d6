// Applicant-to-job ranking: markup normalization, term vectors, cosine similarity,
// stable ordering and the single shortlist directive.
// The core is pure and synchronous; handlers run it on the blocking pool.

pub mod handlers;
pub mod normalizer;
pub mod ranker;
pub mod similarity;

pub use normalizer::normalize_markup;
pub use ranker::{rank_applicants, ApplicantStatus, Candidate, RankingResult, ScoredApplicant};
