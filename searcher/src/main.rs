use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use core::error::QueryError;
use core::loader::load_and_merge;
use core::persist::{IndexPaths, ScoreKind};
use core::query::QueryEngine;
use core::rank::rank;
use core::DocId;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Single,
    And,
    Or,
}

/// Evaluate a single/AND/OR query against a merged inverted index and print
/// TF/TF-IDF rankings for single-term queries (spec §6's Searcher CLI).
#[derive(Parser)]
#[command(name = "searcher")]
struct Cli {
    /// Index root to load.
    #[arg(short = 'i', long = "input_path", default_value = "index")]
    input_path: PathBuf,

    /// Partitions to load and merge.
    #[arg(short = 'c', long = "category", required = true, num_args = 1..)]
    category: Vec<String>,

    /// Query terms: one for single mode, two for and/or.
    #[arg(short = 'w', long = "search_word", required = true, num_args = 1..=2)]
    search_word: Vec<String>,

    #[arg(short = 'm', long = "mode", value_enum, default_value = "single")]
    mode: Mode,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let words = validate_words(cli.mode, &cli.search_word)?;

    let paths = IndexPaths::new(&cli.input_path);
    let merged = load_and_merge(&paths, &cli.category).context("loading inverted index")?;
    let engine = QueryEngine::new(merged);

    let (result, first_term) = match words {
        Words::Single(term) => (engine.single(term), term),
        Words::And(a, b) => (engine.and(a, b), a),
        Words::Or(a, b) => (engine.or(a, b), a),
    };

    let matches = match result {
        Ok(matches) => matches,
        Err(QueryError::NoMatch) => {
            println!("文書が見つかりませんでした");
            return Ok(());
        }
    };

    println!("該当件数: {}", matches.len());
    println!("該当文書: {}", matches.join(", "));

    if let Mode::Single = cli.mode {
        let match_set: HashSet<DocId> = matches.into_iter().collect();
        print_ranking(&paths, ScoreKind::Tf, first_term, &match_set, "TF");
        print_ranking(&paths, ScoreKind::TfIdf, first_term, &match_set, "TF-IDF");
    }

    Ok(())
}

fn print_ranking(
    paths: &IndexPaths,
    kind: ScoreKind,
    term: &str,
    matches: &HashSet<DocId>,
    label: &str,
) {
    match rank(paths, kind, term, matches) {
        Ok(ranked) => {
            println!("{label} ランキング:");
            for row in ranked {
                println!("  {}\t{}\t{:.6}", row.rank, row.doc_id, row.score);
            }
        }
        Err(err) => {
            tracing::warn!(%term, %label, %err, "no score table for this ranking");
        }
    }
}

enum Words<'a> {
    Single(&'a str),
    And(&'a str, &'a str),
    Or(&'a str, &'a str),
}

fn validate_words(mode: Mode, words: &[String]) -> Result<Words<'_>> {
    match mode {
        Mode::Single => match words {
            [first] => Ok(Words::Single(first)),
            _ => bail!("single mode takes exactly one --search_word"),
        },
        Mode::And => match words {
            [first, second] => Ok(Words::And(first, second)),
            _ => bail!("and/or mode takes exactly two --search_word values"),
        },
        Mode::Or => match words {
            [first, second] => Ok(Words::Or(first, second)),
            _ => bail!("and/or mode takes exactly two --search_word values"),
        },
    }
}
