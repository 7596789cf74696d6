use serde::Serialize;

/// Inclusive expected-salary ranges shown next to a job's ranking.
pub const SALARY_RANGES: &[(i64, i64)] = &[
    (0, 50_000),
    (50_001, 100_000),
    (100_001, 150_000),
    (150_001, 200_000),
    (200_001, 999_999_999),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBucket {
    /// `"lower-upper"`, e.g. `"0-50000"`.
    pub range: String,
    pub lower: i64,
    pub upper: i64,
    pub count: usize,
}

/// Counts applicants per expected-salary range. Salaries outside every range are
/// not counted.
pub fn salary_distribution(expected_salaries: &[i64]) -> Vec<SalaryBucket> {
    SALARY_RANGES
        .iter()
        .map(|&(lower, upper)| SalaryBucket {
            range: format!("{lower}-{upper}"),
            lower,
            upper,
            count: expected_salaries
                .iter()
                .filter(|&&s| (lower..=upper).contains(&s))
                .count(),
        })
        .collect()
}
