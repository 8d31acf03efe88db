use std::collections::HashSet;

use lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;

use crate::error::TokenizerError;
use crate::Term;

/// The analyzer's primary part-of-speech tag for nouns. Per spec §9's open
/// question, membership is exact equality, not the substring test the
/// original Python used.
const NOUN_POS: &str = "名詞";

/// Wraps a Japanese morphological analyzer and filters its output down to
/// noun surface forms (spec §4.2). One adapter owns one analyzer session;
/// `tokenize` carries no state between calls beyond the loaded dictionary.
pub struct TokenizerAdapter {
    tokenizer: Tokenizer,
}

impl TokenizerAdapter {
    pub fn new() -> Result<Self, TokenizerError> {
        let dictionary = load_dictionary_from_kind(DictionaryKind::IPADIC)
            .map_err(|err| TokenizerError::Backend(err.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        Ok(Self {
            tokenizer: Tokenizer::new(segmenter),
        })
    }

    /// Tokenizes `text`, returning the ordered noun token stream and its
    /// distinct-term set (spec §3's "Token stream" and "Term set").
    pub fn tokenize(&self, text: &str) -> Result<(Vec<Term>, HashSet<Term>), TokenizerError> {
        let tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|err| TokenizerError::Backend(err.to_string()))?;

        let mut stream = Vec::new();
        let mut set = HashSet::new();
        for mut token in tokens {
            let surface = token.text.to_string();
            if surface.is_empty() {
                continue;
            }
            let is_noun = token
                .details()
                .and_then(|details| details.first())
                .map(|pos| pos.as_str() == NOUN_POS)
                .unwrap_or(false);
            if !is_noun {
                continue;
            }
            set.insert(surface.clone());
            stream.push(surface);
        }
        Ok((stream, set))
    }
}
