use std::collections::HashMap;

/// Token → occurrence count for one document.
///
/// The sum of all counts equals the number of tokens it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector {
    counts: HashMap<String, u32>,
}

impl TermVector {
    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Σ count² over this vector's own keys.
    fn magnitude_squared(&self) -> u64 {
        self.counts.values().map(|&c| c as u64 * c as u64).sum()
    }
}

impl<S: Into<String>> FromIterator<S> for TermVector {
    fn from_iter<I: IntoIterator<Item = S>>(tokens: I) -> Self {
        let mut vector = TermVector::default();
        for token in tokens {
            *vector.counts.entry(token.into()).or_insert(0) += 1;
        }
        vector
    }
}

/// Counts the occurrences of each distinct token.
pub fn term_frequency_vector<S: AsRef<str>>(tokens: &[S]) -> TermVector {
    tokens.iter().map(|t| t.as_ref()).collect()
}

/// Cosine of the angle between two term-frequency vectors.
///
/// The dot product runs over the tokens present in both vectors; each magnitude runs
/// over that vector's own tokens. Returns exactly `0.0` when either vector is empty.
/// Counts are non-negative, so the result lies in `[0.0, 1.0]`.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let magnitude_a_sq = a.magnitude_squared();
    let magnitude_b_sq = b.magnitude_squared();

    // Walk the smaller map; the shared-key set is the same either way.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot_product: u64 = small
        .counts
        .iter()
        .filter_map(|(token, &count)| {
            large
                .counts
                .get(token)
                .map(|&other| count as u64 * other as u64)
        })
        .sum();

    // sqrt(|a|² · |b|²) keeps self-similarity exactly 1.0 for realistic counts.
    let denominator = (magnitude_a_sq as f64 * magnitude_b_sq as f64).sqrt();

    (dot_product as f64 / denominator).min(1.0)
}
