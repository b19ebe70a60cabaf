use crate::core::filters::is_gender_compatible;
use crate::models::{EncodedValue, NormalizedPerson};
use std::collections::HashSet;

/// Number of factors averaged into a pair score
pub const FACTOR_COUNT: usize = 10;

/// Per-factor compatibility, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub budget: f64,
    pub age: f64,
    pub smoking: f64,
    pub lifestyle: f64,
    pub living_habits: f64,
    pub pets: f64,
    pub location: f64,
    pub living_arrangement: f64,
    pub hobbies: f64,
    pub sports: f64,
}

impl FactorScores {
    pub fn as_array(&self) -> [f64; FACTOR_COUNT] {
        [
            self.budget,
            self.age,
            self.smoking,
            self.lifestyle,
            self.living_habits,
            self.pets,
            self.location,
            self.living_arrangement,
            self.hobbies,
            self.sports,
        ]
    }

    /// Unweighted mean of the ten factors
    pub fn mean(&self) -> f64 {
        self.as_array().iter().sum::<f64>() / FACTOR_COUNT as f64
    }
}

/// Calculate the compatibility score (0-1) between two people
///
/// Pairs failing the gender gate score exactly 0. Otherwise the score is the
/// mean of:
///   budget, age                  ratio of raw values
///   smoking, lifestyle, habits,
///   pets, location, arrangement  exact match on encoded values
///   hobbies, sports              token overlap
pub fn calculate_match_score(a: &NormalizedPerson, b: &NormalizedPerson) -> f64 {
    match score_breakdown(a, b) {
        Some(factors) => factors.mean(),
        None => 0.0,
    }
}

/// Per-factor scores for a pair, or `None` when the gender gate fails
pub fn score_breakdown(a: &NormalizedPerson, b: &NormalizedPerson) -> Option<FactorScores> {
    if !is_gender_compatible(a, b) {
        return None;
    }

    Some(FactorScores {
        budget: ratio_score(a.raw_budget, b.raw_budget),
        age: ratio_score(a.raw_age, b.raw_age),
        smoking: exact_match(a.smoking, b.smoking),
        lifestyle: exact_match(a.lifestyle, b.lifestyle),
        living_habits: exact_match(a.living_habits, b.living_habits),
        pets: exact_match(a.pets, b.pets),
        location: exact_match(a.location, b.location),
        living_arrangement: exact_match(a.living_arrangement, b.living_arrangement),
        hobbies: overlap_score(&a.hobbies, &b.hobbies),
        sports: overlap_score(&a.sports, &b.sports),
    })
}

/// `1 - |x - y| / max(x, y)`, clamped to [0, 1]
///
/// A missing value scores 0. When the larger value is not positive the ratio
/// is undefined; equal values then score 1 and anything else 0.
#[inline]
pub fn ratio_score(x: Option<f64>, y: Option<f64>) -> f64 {
    let (Some(x), Some(y)) = (x, y) else {
        return 0.0;
    };

    let max = x.max(y);
    if max <= 0.0 {
        return if x == y { 1.0 } else { 0.0 };
    }

    (1.0 - (x - y).abs() / max).clamp(0.0, 1.0)
}

#[inline]
fn exact_match(x: EncodedValue, y: EncodedValue) -> f64 {
    if x == y {
        1.0
    } else {
        0.0
    }
}

/// Shared comma-separated tokens over the longer token list
///
/// Tokens are not trimmed, and duplicates count toward the list length but
/// only once in the intersection. Two empty strings each split into a single
/// empty token and therefore score 1.
#[inline]
pub fn overlap_score(x: &str, y: &str) -> f64 {
    let tokens_x: Vec<&str> = x.split(',').collect();
    let tokens_y: Vec<&str> = y.split(',').collect();

    let set_x: HashSet<&str> = tokens_x.iter().copied().collect();
    let set_y: HashSet<&str> = tokens_y.iter().copied().collect();
    let shared = set_x.intersection(&set_y).count();

    let longest = tokens_x.len().max(tokens_y.len()).max(1);
    shared as f64 / longest as f64
}
