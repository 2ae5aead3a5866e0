// Tokenizer: raw message text to normalized word tokens.
//
// Lowercase, blank out a fixed set of punctuation, split on whitespace.
// Everything else (letters in any script, digits, emoji, `#`, `@`, `-`)
// survives untouched, so "кот-обормот" and "#rust" stay single tokens.

/// Characters replaced by a space before splitting.
pub const PUNCTUATION: &[char] = &[
    ',', '!', '.', '…', '/', '"', '\'', '(', ')', '*', '?', '=', '–', ';', ':', '^', '—', '~',
    '«', '»',
];

/// Information separators U+001C..U+001F. Not `char::is_whitespace`, but
/// they still separate words.
const SEPARATORS: std::ops::RangeInclusive<char> = '\u{1c}'..='\u{1f}';

/// Normalized text ready to be split into tokens.
///
/// Holds the lowercased, punctuation-free string; `iter` can be called any
/// number of times and each call walks the tokens from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    normalized: String,
}

impl Tokens {
    /// Walk the tokens lazily. Empty fragments never appear.
    pub fn iter(&self) -> std::str::SplitWhitespace<'_> {
        self.normalized.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a str;
    type IntoIter = std::str::SplitWhitespace<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalize `text` for tokenization.
pub fn tokenize(text: &str) -> Tokens {
    let normalized = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if PUNCTUATION.contains(&c) || SEPARATORS.contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect();
    Tokens { normalized }
}
