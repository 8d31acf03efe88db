use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::RankError;
use crate::persist::{load_score_table, IndexPaths, ScoreKind};
use crate::DocId;

/// One row of a ranking: position, doc id, score (spec §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDoc {
    pub rank: usize,
    pub doc_id: DocId,
    pub score: f64,
}

/// Loads `term`'s score table of the given kind, restricts it to `matches`,
/// and returns it sorted descending by score with ties broken ascending by
/// doc id (spec §4.7, §8).
pub fn rank(
    paths: &IndexPaths,
    kind: ScoreKind,
    term: &str,
    matches: &HashSet<DocId>,
) -> Result<Vec<RankedDoc>, RankError> {
    let table = load_score_table(paths, kind, term).map_err(|_| RankError::NoScores {
        term: term.to_string(),
    })?;

    let mut rows: Vec<(DocId, f64)> = table
        .into_iter()
        .filter(|(doc_id, _)| matches.contains(doc_id))
        .collect();

    rows.sort_by(|(doc_a, score_a), (doc_b, score_b)| {
        match score_b.partial_cmp(score_a).unwrap_or(Ordering::Equal) {
            Ordering::Equal => doc_a.cmp(doc_b),
            other => other,
        }
    });

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, (doc_id, score))| RankedDoc {
            rank: index + 1,
            doc_id,
            score,
        })
        .collect())
}
