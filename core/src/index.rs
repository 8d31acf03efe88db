use std::collections::{BTreeMap, HashMap, HashSet};

use crate::document::Document;
use crate::error::{IndexError, TokenizerError};
use crate::stats::{
    document_frequencies, inverse_document_frequencies, term_counts, term_frequencies,
    term_frequency_inverse_document_frequency,
};
use crate::tokenizer::TokenizerAdapter;
use crate::{DocId, Term};

/// `term -> postings` for one category's partition (spec §3).
pub type InvertedIndex = BTreeMap<Term, Vec<DocId>>;
/// `doc_id -> score`, persisted one file per term (spec §3).
pub type ScoreTable = BTreeMap<DocId, f64>;

/// Everything the indexer persists for one build (spec §4.4).
pub struct BuildOutput {
    /// One partition per category, in the order categories were given.
    pub inverted_index: BTreeMap<String, InvertedIndex>,
    /// `term -> (doc_id -> tf)`.
    pub tf: BTreeMap<Term, ScoreTable>,
    /// `term -> (doc_id -> tf*idf)`.
    pub tfidf: BTreeMap<Term, ScoreTable>,
}

/// Tokenizes and scores `documents_by_category` and materializes the three
/// artifact families spec §4.4 describes. `documents_by_category` must
/// already be in per-category enumeration order (see `document::read_category`).
///
/// The scope for df/IDF (spec §4.3) is every document passed in here — the
/// caller decides scope by choosing which categories to include.
pub fn build(
    documents_by_category: &BTreeMap<String, Vec<Document>>,
    tokenizer: &TokenizerAdapter,
) -> Result<BuildOutput, BuildError> {
    let mut inverted_index: BTreeMap<String, InvertedIndex> = BTreeMap::new();
    let mut per_doc_tf: HashMap<DocId, HashMap<Term, f64>> = HashMap::new();
    let mut term_sets: Vec<HashSet<Term>> = Vec::new();
    let mut tf_by_term: BTreeMap<Term, ScoreTable> = BTreeMap::new();
    let mut seen_doc_ids: HashMap<DocId, String> = HashMap::new();
    let mut num_docs = 0usize;

    for (category, documents) in documents_by_category {
        let partition = inverted_index.entry(category.clone()).or_default();
        for document in documents {
            if let Some(first_category) = seen_doc_ids.get(&document.id) {
                return Err(BuildError::Index(IndexError::DuplicateDocId {
                    doc_id: document.id.clone(),
                    first_category: first_category.clone(),
                    second_category: category.clone(),
                }));
            }
            seen_doc_ids.insert(document.id.clone(), category.clone());
            num_docs += 1;

            let (token_stream, term_set) = tokenizer.tokenize(&document.tokenizable_text())?;
            let counts = term_counts(&token_stream);
            let tf = term_frequencies(&counts);

            for term in &term_set {
                partition.entry(term.clone()).or_default().push(document.id.clone());
            }
            for (term, &value) in &tf {
                tf_by_term
                    .entry(term.clone())
                    .or_default()
                    .insert(document.id.clone(), value);
            }

            term_sets.push(term_set);
            per_doc_tf.insert(document.id.clone(), tf);
        }
    }

    let df = document_frequencies(term_sets.iter());
    let idf = inverse_document_frequencies(&df, num_docs.max(1));

    let mut tfidf_by_term: BTreeMap<Term, ScoreTable> = BTreeMap::new();
    for (doc_id, tf) in &per_doc_tf {
        let tfidf = term_frequency_inverse_document_frequency(tf, &idf);
        for (term, value) in tfidf {
            tfidf_by_term
                .entry(term)
                .or_default()
                .insert(doc_id.clone(), value);
        }
    }

    Ok(BuildOutput {
        inverted_index,
        tf: tf_by_term,
        tfidf: tfidf_by_term,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Index(#[from] IndexError),
}
