use crate::core::normalize::{normalize, NormalizeError};
use crate::core::scoring::calculate_match_score;
use crate::models::{MatchResults, NormalizedPerson, PairScore, PersonTable, RawTable};
use std::collections::HashMap;

/// Default number of pairings kept per person
pub const DEFAULT_TOP_K: usize = 5;

/// Ranking orchestrator - scores every pair and builds the per-person tables
///
/// # Pipeline Stages
/// 1. Score all pairs i < j in input order (gated pairs score 0)
/// 2. Stable sort by score, descending
/// 3. Per person, keep the first `top_k` rows involving them
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_k: usize,
}

impl Ranker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Normalize a raw table and rank it
    pub fn rank_table(&self, table: &RawTable) -> Result<MatchResults, NormalizeError> {
        let dataset = normalize(table)?;
        Ok(self.rank(&dataset.people))
    }

    /// Score and rank already-normalized people
    pub fn rank(&self, people: &[NormalizedPerson]) -> MatchResults {
        let matches = score_all_pairs(people);

        tracing::info!(
            "Scored {} pairs for {} people",
            matches.len(),
            people.len()
        );

        let individual_tables = self.individual_tables(people, &matches);

        MatchResults {
            matches,
            individual_tables,
        }
    }

    /// Single pass over the sorted table, filling each person's slots in order
    fn individual_tables(&self, people: &[NormalizedPerson], matches: &[PairScore]) -> Vec<PersonTable> {
        let positions: HashMap<&str, usize> = people
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.as_str(), idx))
            .collect();

        let mut tables: Vec<PersonTable> = people
            .iter()
            .map(|p| PersonTable {
                name: p.name.clone(),
                matches: Vec::with_capacity(self.top_k.min(people.len().saturating_sub(1))),
            })
            .collect();

        for pair in matches {
            for name in [pair.person1.as_str(), pair.person2.as_str()] {
                if let Some(&idx) = positions.get(name) {
                    let table = &mut tables[idx];
                    if table.matches.len() < self.top_k {
                        table.matches.push(pair.clone());
                    }
                }
            }
        }

        tables
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

/// Score every unordered pair and sort the result by score, descending
///
/// Ties keep generation order, i.e. (0,1), (0,2), ..., (1,2), ...
pub fn score_all_pairs(people: &[NormalizedPerson]) -> Vec<PairScore> {
    let n = people.len();
    let mut matches = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for (i, a) in people.iter().enumerate() {
        for b in &people[i + 1..] {
            matches.push(PairScore {
                person1: a.name.clone(),
                person2: b.name.clone(),
                score: calculate_match_score(a, b),
            });
        }
    }

    // sort_by is stable
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches
}
