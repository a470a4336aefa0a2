//! Fuzzy ranking of names against a candidate string.
//!
//! A target *matches* a candidate when every character of the case-folded
//! candidate appears, in order, inside the case-folded target. Spaces count
//! as characters, so `"darwin arm64"` only matches names that contain a space
//! somewhere after `darwin`; that is what pushes most lookups to the synonym
//! tiers in [`super::platform`].
//!
//! Each match is scored with the Levenshtein distance between the candidate
//! and the target. [`best`] picks the match with the **largest** score, the
//! first one in pool order winning ties.

use strsim::levenshtein;

/// One matching entry of a ranked pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    /// The pool entry that matched
    pub target: String,
    /// Levenshtein distance between candidate and target
    pub distance: usize,
    /// Position of the target in the original pool
    pub index: usize,
}

/// Whether `candidate` is a case-insensitive subsequence of `target`.
#[must_use]
pub fn is_match(candidate: &str, target: &str) -> bool {
    let mut target_chars = target.chars().flat_map(char::to_lowercase);
    candidate
        .chars()
        .flat_map(char::to_lowercase)
        .all(|c| target_chars.by_ref().any(|t| t == c))
}

/// Rank every entry of `pool` against `candidate`, keeping only matches.
///
/// Matches are returned in pool order.
pub fn rank<S: AsRef<str>>(candidate: &str, pool: &[S]) -> Vec<Rank> {
    pool.iter()
        .enumerate()
        .filter(|(_, target)| is_match(candidate, target.as_ref()))
        .map(|(index, target)| Rank {
            target: target.as_ref().to_string(),
            distance: levenshtein(candidate, target.as_ref()),
            index,
        })
        .collect()
}

/// The highest-scoring rank, first in pool order on ties.
#[must_use]
pub fn best(ranks: &[Rank]) -> Option<&Rank> {
    ranks.iter().fold(None, |best: Option<&Rank>, rank| match best {
        Some(current) if current.distance >= rank.distance => Some(current),
        _ => Some(rank),
    })
}
