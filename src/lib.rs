//! Roommate Match - pairwise compatibility scoring for a roommate-seeking pool
//!
//! This library normalizes survey answers, scores every pair of people behind
//! a hard gender-preference gate, and ranks the top five pairings per person.

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, is_gender_compatible, normalize, Ranker};
pub use models::{MatchResults, NormalizedPerson, PairScore, PersonRecord, PersonTable, RawTable};
