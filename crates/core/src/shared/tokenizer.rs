use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unit of comparison used when rendering a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Word,
    Char,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Word => write!(f, "word"),
            Granularity::Char => write!(f, "char"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Granularity::Word),
            "char" => Ok(Granularity::Char),
            other => Err(format!("Diff mode must be 'word' or 'char', got '{other}'")),
        }
    }
}

/// Whitespace-delimited words with empty tokens dropped.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Words and the whitespace runs between them, in input order.
///
/// Concatenating the returned slices reproduces `text` exactly, which is
/// what lets a rendered word diff keep the input spacing and newlines.
pub fn words_with_separators(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        if matches!(in_space, Some(prev) if prev != is_space) {
            tokens.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// One token per Unicode scalar value.
pub fn chars(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(idx, ch)| &text[idx..idx + ch.len_utf8()])
        .collect()
}

/// Splits `text` into the tokens compared at the given granularity.
pub fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Word => words_with_separators(text),
        Granularity::Char => chars(text),
    }
}
