use std::collections::HashMap;

use crate::Term;

/// Per-document term counts (spec §3, §4.3). One pass over the token
/// stream, not one pass per distinct term.
pub fn term_counts(token_stream: &[Term]) -> HashMap<Term, u32> {
    let mut counts = HashMap::with_capacity(token_stream.len());
    for term in token_stream {
        *counts.entry(term.clone()).or_insert(0) += 1;
    }
    counts
}

/// TF(t,d) = count(t,d) / L(d). A document with L(d) = 0 contributes no
/// entries (spec §4.3 "no division").
pub fn term_frequencies(counts: &HashMap<Term, u32>) -> HashMap<Term, f64> {
    let length: u32 = counts.values().sum();
    if length == 0 {
        return HashMap::new();
    }
    counts
        .iter()
        .map(|(term, &count)| (term.clone(), f64::from(count) / f64::from(length)))
        .collect()
}

/// df(t) over a scope of documents, given each document's distinct term set.
pub fn document_frequencies<'a, I>(term_sets: I) -> HashMap<Term, u32>
where
    I: IntoIterator<Item = &'a std::collections::HashSet<Term>>,
{
    let mut df: HashMap<Term, u32> = HashMap::new();
    for term_set in term_sets {
        for term in term_set {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }
    df
}

/// IDF(t) = ln(N / df(t)) over a scope of N documents.
pub fn inverse_document_frequencies(df: &HashMap<Term, u32>, scope_size: usize) -> HashMap<Term, f64> {
    df.iter()
        .map(|(term, &doc_freq)| {
            let idf = (scope_size as f64 / f64::from(doc_freq)).ln();
            (term.clone(), idf)
        })
        .collect()
}

/// TF-IDF(t,d) = TF(t,d) * IDF(t), restricted to pairs where TF(t,d) > 0.
pub fn term_frequency_inverse_document_frequency(
    tf: &HashMap<Term, f64>,
    idf: &HashMap<Term, f64>,
) -> HashMap<Term, f64> {
    tf.iter()
        .filter(|(_, &value)| value > 0.0)
        .filter_map(|(term, &value)| idf.get(term).map(|&idf_value| (term.clone(), value * idf_value)))
        .collect()
}
