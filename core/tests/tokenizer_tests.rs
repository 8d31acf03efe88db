use core::tokenizer::TokenizerAdapter;

#[test]
fn filters_to_nouns_and_preserves_order() {
    let adapter = TokenizerAdapter::new().expect("dictionary loads");
    let (stream, set) = adapter
        .tokenize("東京で猫と犬を見た")
        .expect("tokenize succeeds");
    assert!(stream.contains(&"東京".to_string()));
    assert!(stream.contains(&"猫".to_string()));
    assert!(stream.contains(&"犬".to_string()));
    assert!(set.contains("東京"));
    assert!(set.contains("猫"));
    assert!(set.contains("犬"));
}

#[test]
fn drops_empty_surface_forms_and_non_nouns() {
    let adapter = TokenizerAdapter::new().expect("dictionary loads");
    let (stream, _set) = adapter.tokenize("走る").expect("tokenize succeeds");
    // "走る" (to run) is a verb; its surface form should not appear as a noun term.
    assert!(!stream.iter().any(|t| t == "走る"));
}
