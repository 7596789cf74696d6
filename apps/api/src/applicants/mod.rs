// Applicant-side collaborators of the ranker: the store that pre-fetches and persists
// applications, and the salary histogram shown beside a job's ranking.

pub mod salary;
pub mod store;
