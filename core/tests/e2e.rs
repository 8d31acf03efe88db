use std::collections::{BTreeMap, HashSet};
use std::fs::{create_dir_all, write};

use core::document::{read_category, Document};
use core::index::build;
use core::loader::load_and_merge;
use core::persist::{save_inverted_index, save_score_table, IndexPaths, ScoreKind};
use core::query::QueryEngine;
use core::rank::rank;
use core::tokenizer::TokenizerAdapter;

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
fn single_document_indexes_and_searches() {
    let input = tempfile::tempdir().unwrap();
    write_article(input.path(), "c", "a", "東京", "東京 大阪");

    let documents = read_category(input.path(), "c").unwrap();
    let mut by_category = BTreeMap::new();
    by_category.insert("c".to_string(), documents);

    let tokenizer = TokenizerAdapter::new().unwrap();
    let output = build(&by_category, &tokenizer).unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(output_dir.path());
    save_inverted_index(&paths, "c", &output.inverted_index["c"]).unwrap();
    for (term, table) in &output.tf {
        save_score_table(&paths, ScoreKind::Tf, term, table).unwrap();
    }
    for (term, table) in &output.tfidf {
        save_score_table(&paths, ScoreKind::TfIdf, term, table).unwrap();
    }

    let merged = load_and_merge(&paths, &["c".to_string()]).unwrap();
    let engine = QueryEngine::new(merged);
    let matches = engine.single("東京").unwrap();
    assert_eq!(matches, vec!["a".to_string()]);

    let match_set: HashSet<String> = matches.into_iter().collect();
    let ranked = rank(&paths, ScoreKind::Tf, "東京", &match_set).unwrap();
    assert_eq!(ranked[0].doc_id, "a");
    assert!((ranked[0].score - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn missing_term_query_is_no_match() {
    let input = tempfile::tempdir().unwrap();
    write_article(input.path(), "c", "a", "東京", "東京");
    let documents = read_category(input.path(), "c").unwrap();
    let mut by_category = BTreeMap::new();
    by_category.insert("c".to_string(), documents);

    let tokenizer = TokenizerAdapter::new().unwrap();
    let output = build(&by_category, &tokenizer).unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(output_dir.path());
    save_inverted_index(&paths, "c", &output.inverted_index["c"]).unwrap();

    let merged = load_and_merge(&paths, &["c".to_string()]).unwrap();
    let engine = QueryEngine::new(merged);
    assert_eq!(
        engine.single("xyz"),
        Err(core::error::QueryError::NoMatch)
    );
}

#[test]
fn cross_category_and_query() {
    let input = tempfile::tempdir().unwrap();
    write_article(input.path(), "society", "s1", "猫", "猫");
    write_article(input.path(), "sports", "p1", "猫", "猫 犬");

    let mut by_category = BTreeMap::new();
    by_category.insert(
        "society".to_string(),
        read_category(input.path(), "society").unwrap(),
    );
    by_category.insert(
        "sports".to_string(),
        read_category(input.path(), "sports").unwrap(),
    );

    let tokenizer = TokenizerAdapter::new().unwrap();
    let output = build(&by_category, &tokenizer).unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(output_dir.path());
    for (category, partition) in &output.inverted_index {
        save_inverted_index(&paths, category, partition).unwrap();
    }

    let merged =
        load_and_merge(&paths, &["society".to_string(), "sports".to_string()]).unwrap();
    let engine = QueryEngine::new(merged);
    let cats = engine.single("猫").unwrap();
    assert_eq!(cats, vec!["s1".to_string(), "p1".to_string()]);

    let and_result = engine.and("猫", "犬").unwrap();
    assert_eq!(and_result, vec!["p1".to_string()]);
}
