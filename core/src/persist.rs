use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, PersistError};
use crate::index::{InvertedIndex, ScoreTable};
use crate::Term;

/// Which per-term score table a path refers to (spec §6: `tf/` vs `idf/`,
/// the latter historically named for compatibility but holding TF*IDF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Tf,
    TfIdf,
}

impl ScoreKind {
    fn dir_name(self) -> &'static str {
        match self {
            ScoreKind::Tf => "tf",
            ScoreKind::TfIdf => "idf",
        }
    }
}

/// Resolves the on-disk layout under one index root (spec §6).
pub struct IndexPaths {
    root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn inverted_index_dir(&self, category: &str) -> PathBuf {
        self.root.join("inverted_index").join(category)
    }

    pub fn inverted_index_path(&self, category: &str) -> PathBuf {
        self.inverted_index_dir(category).join("inverted_index.bin")
    }

    pub fn score_path(&self, kind: ScoreKind, term: &str) -> Result<PathBuf, PersistError> {
        let escaped = escape_term(term)?;
        Ok(self.root.join(kind.dir_name()).join(format!("{escaped}.bin")))
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9._-]`. Deterministic and
/// injective, so `unescape_term` exactly inverts it (spec §4.4, §9).
pub fn escape_term(term: &str) -> Result<String, PersistError> {
    if term.is_empty() {
        return Err(PersistError::UnsafeName {
            term: term.to_string(),
        });
    }
    let mut out = String::with_capacity(term.len());
    for byte in term.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(*byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    Ok(out)
}

/// Inverts `escape_term`.
pub fn unescape_term(escaped: &str) -> Result<String, PersistError> {
    let unsafe_err = || PersistError::UnsafeName {
        term: escaped.to_string(),
    };
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = escaped.get(i + 1..i + 3).ok_or_else(unsafe_err)?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| unsafe_err())?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| unsafe_err())
}

/// Writes `bytes` to `path` via a sibling temp file then `rename`, so a
/// crash or interrupt never leaves a half-written file at `path` (spec §5).
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| PersistError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let tmp_path = dir.join(format!(
        ".{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("index")
    ));
    {
        let mut file = File::create(&tmp_path).map_err(|source| PersistError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        file.write_all(bytes).map_err(|source| PersistError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| PersistError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    fs::rename(&tmp_path, path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_inverted_index(
    paths: &IndexPaths,
    category: &str,
    index: &InvertedIndex,
) -> Result<(), PersistError> {
    let path = paths.inverted_index_path(category);
    let bytes = bincode::serialize(index).map_err(|source| PersistError::Encode {
        path: path.clone(),
        source,
    })?;
    atomic_write(&path, &bytes)
}

pub fn load_inverted_index(paths: &IndexPaths, category: &str) -> Result<InvertedIndex, LoadError> {
    let path = paths.inverted_index_path(category);
    let bytes = fs::read(&path).map_err(|_| LoadError::Missing { path: path.clone() })?;
    bincode::deserialize(&bytes).map_err(|source| LoadError::Format { path, source })
}

pub fn save_score_table(
    paths: &IndexPaths,
    kind: ScoreKind,
    term: &Term,
    table: &ScoreTable,
) -> Result<(), PersistError> {
    let path = paths.score_path(kind, term)?;
    let bytes = bincode::serialize(table).map_err(|source| PersistError::Encode {
        path: path.clone(),
        source,
    })?;
    atomic_write(&path, &bytes)
}

pub fn load_score_table(
    paths: &IndexPaths,
    kind: ScoreKind,
    term: &str,
) -> Result<ScoreTable, RankLoadError> {
    let path = paths.score_path(kind, term).map_err(RankLoadError::Persist)?;
    let bytes = fs::read(&path).map_err(|_| RankLoadError::Missing)?;
    bincode::deserialize(&bytes).map_err(|source| RankLoadError::Format { path, source })
}

/// A thin variant of `LoadError` used by the ranker, which treats "file
/// missing" as the user-visible `RankError::NoScores` rather than a fatal
/// load error (spec §4.7, §7).
#[derive(Debug, thiserror::Error)]
pub enum RankLoadError {
    #[error("missing score file")]
    Missing,
    #[error("malformed score file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}
