// Core algorithm exports
pub mod filters;
pub mod normalize;
pub mod ranker;
pub mod scoring;

pub use filters::{accepts_gender, is_gender_compatible};
pub use normalize::{normalize, FeatureEncoding, NormalizeError, NormalizedDataset};
pub use ranker::{score_all_pairs, Ranker, DEFAULT_TOP_K};
pub use scoring::{calculate_match_score, score_breakdown, FactorScores};
