use std::collections::{HashMap, HashSet};

use crate::error::QueryError;
use crate::{DocId, Term};

/// Evaluates single/AND/OR queries over a unified, in-memory posting map
/// (spec §4.6). Binary for AND/OR in this release, per the spec's current
/// contract.
pub struct QueryEngine {
    index: HashMap<Term, Vec<DocId>>,
}

impl QueryEngine {
    pub fn new(index: HashMap<Term, Vec<DocId>>) -> Self {
        Self { index }
    }

    pub fn single(&self, term: &str) -> Result<Vec<DocId>, QueryError> {
        match self.index.get(term) {
            Some(postings) if !postings.is_empty() => Ok(postings.clone()),
            _ => Err(QueryError::NoMatch),
        }
    }

    pub fn and(&self, first: &str, second: &str) -> Result<Vec<DocId>, QueryError> {
        let a = self.postings(first);
        let b = self.postings(second);
        let result = intersect(a, b);
        if result.is_empty() {
            Err(QueryError::NoMatch)
        } else {
            Ok(result)
        }
    }

    pub fn or(&self, first: &str, second: &str) -> Result<Vec<DocId>, QueryError> {
        let a = self.postings(first);
        let b = self.postings(second);
        let result = union(a, b);
        if result.is_empty() {
            Err(QueryError::NoMatch)
        } else {
            Ok(result)
        }
    }

    fn postings(&self, term: &str) -> &[DocId] {
        self.index.get(term).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

fn is_sorted(ids: &[DocId]) -> bool {
    ids.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Correct for any input; uses `O(m·log n)` binary-search intersection
/// when both lists are sorted ascending (the build-time contract this
/// crate upholds — see DESIGN.md), and falls back to a hash-set scan
/// otherwise, per spec §4.6 and §9's "binary-search on unsorted postings"
/// note.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut result = if is_sorted(a) && is_sorted(b) {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        small
            .iter()
            .filter(|id| large.binary_search(id).is_ok())
            .cloned()
            .collect::<Vec<_>>()
    } else {
        let b_set: HashSet<&DocId> = b.iter().collect();
        a.iter().filter(|id| b_set.contains(id)).cloned().collect()
    };
    result.sort();
    result.dedup();
    result
}

pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut set: HashSet<DocId> = a.iter().cloned().collect();
    set.extend(b.iter().cloned());
    let mut result: Vec<DocId> = set.into_iter().collect();
    result.sort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(pairs: &[(&str, &[&str])]) -> QueryEngine {
        let mut map = HashMap::new();
        for (term, docs) in pairs {
            map.insert(
                term.to_string(),
                docs.iter().map(|d| d.to_string()).collect(),
            );
        }
        QueryEngine::new(map)
    }

    #[test]
    fn single_missing_term_is_no_match() {
        let engine = index(&[]);
        assert_eq!(engine.single("xyz"), Err(QueryError::NoMatch));
    }

    #[test]
    fn and_intersects_and_or_unions() {
        let engine = index(&[("A", &["1", "2", "3"]), ("B", &["2", "3", "4"])]);
        assert_eq!(engine.and("A", "B").unwrap(), vec!["2", "3"]);
        assert_eq!(
            engine.or("A", "B").unwrap(),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn and_or_with_one_missing_term() {
        let engine = index(&[("A", &["1"])]);
        assert_eq!(engine.and("A", "missing"), Err(QueryError::NoMatch));
        assert_eq!(engine.or("A", "missing").unwrap(), vec!["1"]);
        assert_eq!(engine.or("missing", "missing2"), Err(QueryError::NoMatch));
    }

    #[test]
    fn intersect_falls_back_to_linear_scan_on_unsorted_input() {
        let a = vec!["s1".to_string(), "p1".to_string()];
        let b = vec!["p1".to_string(), "s1".to_string()];
        assert_eq!(intersect(&a, &b), vec!["p1".to_string(), "s1".to_string()]);
    }
}
