// Exclusion set: stop words removed before any counting arithmetic.
//
// Stored lowercased so membership is case-insensitive. The built-in default
// is a short list of Russian function words; full per-language lists come
// from the `stop-words` crate.

use std::collections::HashSet;

use anyhow::Result;
use stop_words::{get, LANGUAGE};

/// The built-in default list: short, high-frequency Russian function words.
pub const DEFAULT_EXCLUDED: &[&str] = &[
    "а", "в", "н", "и", "э", "я", "у", "вы", "не", "ну", "мы", "ты", "он", "по", "что", "это",
    "нет", "так", "она", "вот", "мне", "всё", "ещё", "или", "тут", "там",
];

/// Case-insensitive set of tokens to ignore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    /// An empty set; nothing is excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Russian default list.
    pub fn default_russian() -> Self {
        DEFAULT_EXCLUDED.iter().copied().collect()
    }

    /// Parse a comma-separated list such as `"foo, Bar,baz"`.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .collect()
    }

    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    pub fn extend(&mut self, other: &ExclusionSet) {
        self.words.extend(other.words.iter().cloned());
    }

    /// Add the `stop-words` list for a language given by name.
    pub fn extend_with_language(&mut self, language: &str) -> Result<()> {
        let lang = language_by_name(language)?;
        let list: Vec<String> = get(lang);
        for word in &list {
            self.insert(word);
        }
        Ok(())
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        // Tokens are already lowercase; only mixed-case lookups pay for this.
        word.chars().any(char::is_uppercase) && self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = ExclusionSet::new();
        for word in iter {
            set.insert(word);
        }
        set
    }
}

fn language_by_name(name: &str) -> Result<LANGUAGE> {
    Ok(match name.trim().to_lowercase().as_str() {
        "english" | "en" => LANGUAGE::English,
        "russian" | "ru" => LANGUAGE::Russian,
        "german" | "de" => LANGUAGE::German,
        "french" | "fr" => LANGUAGE::French,
        "spanish" | "es" => LANGUAGE::Spanish,
        "italian" | "it" => LANGUAGE::Italian,
        "portuguese" | "pt" => LANGUAGE::Portuguese,
        other => anyhow::bail!(
            "Unknown stop-word language '{other}'. \
             Supported: english, russian, german, french, spanish, italian, portuguese"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        let set = ExclusionSet::parse_list("Hello,WORLD");
        assert!(set.contains("hello"));
        assert!(set.contains("HeLLo"));
        assert!(set.contains("world"));
        assert!(!set.contains("there"));
    }

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        let set = ExclusionSet::parse_list(" a , ,b,,");
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn test_default_russian() {
        let set = ExclusionSet::default_russian();
        assert_eq!(set.len(), DEFAULT_EXCLUDED.len());
        assert!(set.contains("что"));
        assert!(set.contains("ЧТО"));
    }

    #[test]
    fn test_extend_with_language() {
        let mut set = ExclusionSet::new();
        set.extend_with_language("English").unwrap();
        assert!(set.contains("the"));
        assert!(set.extend_with_language("klingon").is_err());
    }
}
