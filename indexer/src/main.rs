use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use core::document::read_category;
use core::index::build;
use core::persist::{save_inverted_index, save_score_table, IndexPaths, ScoreKind};
use core::tokenizer::TokenizerAdapter;
use tracing_subscriber::{fmt, EnvFilter};

/// Build a partitioned inverted index with TF and TF-IDF score tables
/// (spec §6's Indexer CLI).
#[derive(Parser)]
#[command(name = "indexer")]
struct Cli {
    /// Categories to include in scope.
    #[arg(long, required = true, num_args = 1..)]
    category: Vec<String>,

    /// Corpus root.
    #[arg(short = 'i', long = "input_path", default_value = "output")]
    input_path: PathBuf,

    /// Output root.
    #[arg(short = 'o', long = "output_path", default_value = "index")]
    output_path: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl+C handler")?;

    match run(&cli, &interrupted) {
        Ok(()) => Ok(()),
        Err(err) if interrupted.load(Ordering::SeqCst) => {
            tracing::warn!(%err, "aborted by interrupt");
            println!("インデックスの作成を終了します");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Bails out once the Ctrl+C handler has raised `flag`, so `main` can tell
/// a clean interrupt apart from a real build failure.
fn check_interrupted(flag: &AtomicBool) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        anyhow::bail!("interrupted");
    }
    Ok(())
}

fn run(cli: &Cli, interrupted: &AtomicBool) -> Result<()> {
    let mut documents_by_category = BTreeMap::new();
    for category in &cli.category {
        check_interrupted(interrupted)?;
        let documents = read_category(&cli.input_path, category)
            .with_context(|| format!("reading category {category:?}"))?;
        tracing::info!(category, count = documents.len(), "read category");
        documents_by_category.insert(category.clone(), documents);
    }

    check_interrupted(interrupted)?;
    let tokenizer = TokenizerAdapter::new().context("loading tokenizer dictionary")?;
    let output = build(&documents_by_category, &tokenizer).context("building index")?;

    let paths = IndexPaths::new(&cli.output_path);
    for (category, partition) in &output.inverted_index {
        check_interrupted(interrupted)?;
        save_inverted_index(&paths, category, partition)
            .with_context(|| format!("writing inverted index for category {category:?}"))?;
    }
    for (term, table) in &output.tf {
        check_interrupted(interrupted)?;
        save_score_table(&paths, ScoreKind::Tf, term, table)
            .with_context(|| format!("writing tf table for term {term:?}"))?;
    }
    for (term, table) in &output.tfidf {
        check_interrupted(interrupted)?;
        save_score_table(&paths, ScoreKind::TfIdf, term, table)
            .with_context(|| format!("writing tf-idf table for term {term:?}"))?;
    }

    let num_docs: usize = documents_by_category.values().map(Vec::len).sum();
    tracing::info!(
        num_docs,
        num_terms = output.tf.len(),
        output = %cli.output_path.display(),
        "index build complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::persist::load_inverted_index;
    use std::fs::{create_dir_all, write};

    fn write_article(root: &std::path::Path, category: &str, id: &str, title: &str, body: &str) {
        let dir = root.join(category);
        create_dir_all(&dir).unwrap();
        let json = serde_json::json!({
            "id": id,
            "category": category,
            "url": format!("https://example.com/{id}"),
            "title": title,
            "body": body,
        });
        write(dir.join(format!("{id}.json")), json.to_string()).unwrap();
    }

    #[test]
    fn builds_and_persists_an_index_for_one_category() {
        let input = tempfile::tempdir().unwrap();
        write_article(input.path(), "society", "a", "東京", "東京 大阪");

        let output = tempfile::tempdir().unwrap();
        let cli = Cli {
            category: vec!["society".to_string()],
            input_path: input.path().to_path_buf(),
            output_path: output.path().to_path_buf(),
        };

        run(&cli, &AtomicBool::new(false)).unwrap();

        let paths = IndexPaths::new(output.path());
        let partition = load_inverted_index(&paths, "society").unwrap();
        assert_eq!(partition["東京"], vec!["a".to_string()]);
    }

    #[test]
    fn interrupt_flag_stops_the_run_before_any_writes() {
        let input = tempfile::tempdir().unwrap();
        write_article(input.path(), "society", "a", "東京", "東京");

        let output = tempfile::tempdir().unwrap();
        let cli = Cli {
            category: vec!["society".to_string()],
            input_path: input.path().to_path_buf(),
            output_path: output.path().to_path_buf(),
        };

        let err = run(&cli, &AtomicBool::new(true)).unwrap_err();
        assert_eq!(err.to_string(), "interrupted");
        assert!(!output.path().join("inverted_index").exists());
    }
}
