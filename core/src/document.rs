use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CorpusError;
use crate::DocId;

/// One article record (spec §3). `url` is accepted on input and discarded —
/// it has no field here, so serde drops it silently.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub category: String,
    pub title: String,
    pub body: String,
}

impl Document {
    /// The concatenation the tokenizer adapter consumes (spec §4.2).
    pub fn tokenizable_text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

/// Reads every `<input_root>/<category>/*.json` file into a `Document`.
///
/// Entries are sorted by filename before reading. Per spec §6 the filename
/// stem is the document id, so this also fixes postings within a category
/// in ascending doc-id order — see DESIGN.md.
pub fn read_category<P: AsRef<Path>>(
    input_root: P,
    category: &str,
) -> Result<Vec<Document>, CorpusError> {
    let dir = input_root.as_ref().join(category);
    let read_dir = fs::read_dir(&dir).map_err(|source| CorpusError::Unreadable {
        path: dir.clone(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(&path).map_err(|source| CorpusError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let document: Document =
            serde_json::from_slice(&bytes).map_err(|source| CorpusError::Malformed {
                path: path.clone(),
                source,
            })?;
        documents.push(document);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};

    #[test]
    fn reads_documents_sorted_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        let category_dir = dir.path().join("society");
        create_dir_all(&category_dir).unwrap();
        write(
            category_dir.join("b.json"),
            r#"{"id":"b","category":"society","title":"t2","body":"d2","url":"https://example.com/b"}"#,
        )
        .unwrap();
        write(
            category_dir.join("a.json"),
            r#"{"id":"a","category":"society","title":"t1","body":"d1"}"#,
        )
        .unwrap();

        let docs = read_category(dir.path(), "society").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a");
        assert_eq!(docs[1].id, "b");
    }

    #[test]
    fn missing_category_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_category(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, CorpusError::Unreadable { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let category_dir = dir.path().join("society");
        create_dir_all(&category_dir).unwrap();
        write(category_dir.join("a.json"), "not json").unwrap();

        let err = read_category(dir.path(), "society").unwrap_err();
        assert!(matches!(err, CorpusError::Malformed { .. }));
    }
}
