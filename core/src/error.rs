use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the filesystem-backed document store (spec §4.1).
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the tokenizer adapter (spec §4.2).
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("tokenizer backend failed: {0}")]
    Backend(String),
}

/// Errors raised while persisting index artifacts (spec §4.4).
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("term {term:?} cannot be used as a filename")]
    UnsafeName { term: String },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

/// Errors raised while loading and merging a query-time index (spec §4.5).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("index partition missing: {path}")]
    Missing { path: PathBuf },
    #[error("index partition malformed: {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

/// A user-visible, non-fatal condition: the query produced no matches (spec §4.6).
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum QueryError {
    #[error("文書が見つかりませんでした")]
    NoMatch,
}

/// Errors raised while ranking a match set against persisted score tables (spec §4.7).
#[derive(Debug, Error)]
pub enum RankError {
    #[error("no persisted scores for term {term:?}")]
    NoScores { term: String },
}

/// Errors raised while assembling the index at build time, beyond persistence
/// failures (spec §9, "Open question: category exclusivity").
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(
        "doc id {doc_id:?} appears in both category {first_category:?} and {second_category:?}"
    )]
    DuplicateDocId {
        doc_id: String,
        first_category: String,
        second_category: String,
    },
}
