use crate::core::{NormalizeError, Ranker};
use crate::models::MatchResults;
use crate::services::{load_dataset, save_snapshot, DatasetError, SnapshotError};
use std::path::Path;
use thiserror::Error;

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Schema error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Persistence error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Load the dataset, score and rank every pair, and persist the snapshot
///
/// Nothing is written unless every stage succeeds.
pub fn run_batch(input: &Path, snapshot: &Path, ranker: &Ranker) -> Result<MatchResults, PipelineError> {
    tracing::info!("Loading dataset from {}", input.display());
    let table = load_dataset(input)?;

    tracing::info!(
        "Processing {} people and keeping the top {} matches each",
        table.len(),
        ranker.top_k()
    );
    let results = ranker.rank_table(&table)?;

    save_snapshot(snapshot, &results)?;
    Ok(results)
}

/// Human-readable report of the top global matches and every per-person table
pub fn format_summary(results: &MatchResults, top_n: usize) -> String {
    let mut out = String::from("Top Matches:\n");
    if results.matches.is_empty() {
        out.push_str("  (none)\n");
    }
    for pair in results.matches.iter().take(top_n) {
        out.push_str(&format!("  {}\n", pair));
    }

    for table in &results.individual_tables {
        out.push_str(&format!("\nTop Matches for {}:\n", table.name));
        if table.matches.is_empty() {
            out.push_str("  (none)\n");
        }
        for (rank, pair) in table.matches.iter().enumerate() {
            let partner = pair.partner_of(&table.name).unwrap_or_default();
            out.push_str(&format!("  {}. {:<24} {:.4}\n", rank + 1, partner, pair.score));
        }
    }

    out
}
