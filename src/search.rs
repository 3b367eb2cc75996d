//! Fuzzy matching of free-text queries against exercises.
//!
//! Each whitespace-separated query token is matched against the name, the
//! target and secondary muscles, the body parts and the equipments of an
//! exercise. A token's score is the edit distance of its best approximate
//! occurrence inside any of those fields divided by the token length, so `0.0`
//! is an exact (case-insensitive) substring hit and `1.0` matches anything.
//! An exercise matches when every token scores within the threshold; its score
//! is the mean of its token scores.

use crate::model::Exercise;
use std::cmp::Ordering;

pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Clamp a caller-supplied threshold into `[0, 1]`; missing or non-finite
/// values use [`DEFAULT_THRESHOLD`].
pub fn normalize_threshold(threshold: Option<f64>) -> f64 {
    match threshold {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => DEFAULT_THRESHOLD,
    }
}

#[derive(Debug, Clone)]
pub struct FuzzyQuery {
    tokens: Vec<Vec<char>>,
    threshold: f64,
}

impl FuzzyQuery {
    /// Returns `None` for a blank query.
    pub fn new(query: &str, threshold: Option<f64>) -> Option<Self> {
        let tokens: Vec<Vec<char>> = query
            .split_whitespace()
            .map(|token| token.to_lowercase().chars().collect())
            .collect();
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            tokens,
            threshold: normalize_threshold(threshold),
        })
    }

    /// Score of `exercise`, or `None` when some token is out of threshold.
    pub fn score(&self, exercise: &Exercise) -> Option<f64> {
        let fields: Vec<String> = searchable_fields(exercise)
            .map(str::to_lowercase)
            .collect();

        let mut total = 0.0;
        for token in &self.tokens {
            let best = fields
                .iter()
                .map(|field| token_score(token, field))
                .fold(1.0_f64, f64::min);
            if best > self.threshold {
                return None;
            }
            total += best;
        }
        Some(total / self.tokens.len() as f64)
    }

    /// Matching exercises, best score first; equal scores keep input order.
    pub fn rank<'a, I>(&self, exercises: I) -> Vec<&'a Exercise>
    where
        I: IntoIterator<Item = &'a Exercise>,
    {
        let mut scored: Vec<(f64, &Exercise)> = exercises
            .into_iter()
            .filter_map(|exercise| self.score(exercise).map(|score| (score, exercise)))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(_, exercise)| exercise).collect()
    }
}

fn searchable_fields(exercise: &Exercise) -> impl Iterator<Item = &str> {
    std::iter::once(exercise.name.as_str())
        .chain(exercise.target_muscles.iter().map(String::as_str))
        .chain(exercise.secondary_muscles.iter().map(String::as_str))
        .chain(exercise.body_parts.iter().map(String::as_str))
        .chain(exercise.equipments.iter().map(String::as_str))
}

fn token_score(token: &[char], field: &str) -> f64 {
    substring_distance(token, field) as f64 / token.len() as f64
}

/// Minimum edit distance between `pattern` and any substring of `text`.
///
/// Levenshtein with a free start and end in `text`, computed over a single
/// rolling column.
pub fn substring_distance(pattern: &[char], text: &str) -> usize {
    let m = pattern.len();
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = column[m];

    for tc in text.chars() {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = if pattern[i - 1] == tc { 0 } else { 1 };
            column[i] = (diagonal + cost).min(column[i - 1] + 1).min(above + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
    }
    best
}
