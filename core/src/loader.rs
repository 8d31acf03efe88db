use std::collections::HashMap;

use crate::error::LoadError;
use crate::persist::{load_inverted_index, IndexPaths};
use crate::{DocId, Term};

/// Loads each category's persisted partition and merges them into one
/// unified posting map (spec §4.5). For a term present in more than one
/// partition, postings are concatenated in `categories` order — the
/// loader does not re-deduplicate, trusting the single-category invariant.
pub fn load_and_merge(
    paths: &IndexPaths,
    categories: &[String],
) -> Result<HashMap<Term, Vec<DocId>>, LoadError> {
    let mut merged: HashMap<Term, Vec<DocId>> = HashMap::new();
    for category in categories {
        let partition = load_inverted_index(paths, category)?;
        for (term, mut postings) in partition {
            merged.entry(term).or_default().append(&mut postings);
        }
    }
    Ok(merged)
}
