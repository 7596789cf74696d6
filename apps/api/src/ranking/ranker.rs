//! Similarity Ranker — scores every candidate against one job description and picks
//! the single applicant to shortlist.
//!
//! The ranker never touches storage. Callers hand it plain strings and commit the
//! returned `RankingResult::shortlisted` directive themselves.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::ranking::normalizer::{canonicalize, normalize_markup};
use crate::ranking::similarity::{cosine_similarity, term_frequency_vector, TermVector};

/// Persisted label of a shortlisted application.
pub const SHORTLISTED_LABEL: &str = "Short Listed";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Status label of one application.
///
/// The ranker only ever produces `Shortlisted`; every other label is owned by other
/// collaborators and passes through a ranking pass untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicantStatus {
    #[default]
    Unset,
    Shortlisted,
    Other(String),
}

impl ApplicantStatus {
    /// Any label other than the empty string and `SHORTLISTED_LABEL` is kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label {
            "" => ApplicantStatus::Unset,
            SHORTLISTED_LABEL => ApplicantStatus::Shortlisted,
            other => ApplicantStatus::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            ApplicantStatus::Unset => "",
            ApplicantStatus::Shortlisted => SHORTLISTED_LABEL,
            ApplicantStatus::Other(label) => label,
        }
    }
}

impl From<String> for ApplicantStatus {
    fn from(label: String) -> Self {
        ApplicantStatus::from_label(&label)
    }
}

impl From<ApplicantStatus> for String {
    fn from(status: ApplicantStatus) -> Self {
        status.as_label().to_string()
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A piece of rich text tied to an opaque identifier.
///
/// The plain-text rendering is computed on first use and cached for the life of the
/// document.
#[derive(Debug, Clone)]
pub struct Document<Id> {
    id: Id,
    raw: String,
    plain: OnceLock<String>,
}

impl<Id> Document<Id> {
    pub fn new(id: Id, raw: impl Into<String>) -> Self {
        Self {
            id,
            raw: raw.into(),
            plain: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn plain_text(&self) -> &str {
        self.plain.get_or_init(|| normalize_markup(&self.raw))
    }

    pub fn term_vector(&self) -> TermVector {
        term_frequency_vector(&canonicalize(self.plain_text()))
    }
}

/// One ranking input: an applicant's experience text and current status.
#[derive(Debug, Clone)]
pub struct Candidate<Id> {
    pub document: Document<Id>,
    pub status: ApplicantStatus,
}

impl<Id> Candidate<Id> {
    pub fn new(id: Id, experience_text: impl Into<String>) -> Self {
        Self {
            document: Document::new(id, experience_text),
            status: ApplicantStatus::Unset,
        }
    }

    pub fn with_status(mut self, status: ApplicantStatus) -> Self {
        self.status = status;
        self
    }
}

/// A candidate's score for one ranking pass. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredApplicant<Id> {
    pub id: Id,
    pub score: f64,
    pub status: ApplicantStatus,
}

/// Candidates in descending score order (ties keep input order) plus the shortlist
/// directive for the caller to commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingResult<Id> {
    pub ranked: Vec<ScoredApplicant<Id>>,
    /// Id of the applicant promoted to `Shortlisted`; `None` only for an empty pass.
    pub shortlisted: Option<Id>,
}

impl<Id> RankingResult<Id> {
    pub fn top(&self) -> Option<&ScoredApplicant<Id>> {
        self.ranked.first()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Ranks `candidates` against `job_text`.
///
/// Algorithm:
/// 1. job text → plain text → tokens → term vector, built once
/// 2. each candidate scored independently: cosine(job vector, candidate vector)
/// 3. stable sort by score descending (equal scores keep input order)
/// 4. first entry, if any, becomes `Shortlisted`; all other statuses are kept as given
pub fn rank_applicants<Id: Clone>(
    job_text: &str,
    candidates: &[Candidate<Id>],
) -> RankingResult<Id> {
    let job_vector = Document::new((), job_text).term_vector();

    let mut ranked: Vec<ScoredApplicant<Id>> = candidates
        .iter()
        .map(|candidate| ScoredApplicant {
            id: candidate.document.id().clone(),
            score: cosine_similarity(&job_vector, &candidate.document.term_vector()),
            status: candidate.status.clone(),
        })
        .collect();

    // `sort_by` is stable; scores are never NaN.
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let shortlisted = ranked.first_mut().map(|top| {
        top.status = ApplicantStatus::Shortlisted;
        top.id.clone()
    });

    RankingResult {
        ranked,
        shortlisted,
    }
}
