//! Keyword normalization and the precompiled pattern cache.
//!
//! Matching is plain substring containment first; the separator-tolerant
//! pattern ("fine lines" vs "fine-lines" vs "fine_lines") is only a fallback.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::models::ReferenceData;

/// Separator class inserted between keyword words.
const SEPARATOR_CLASS: &str = r"[-\s_]*";

/// Convert a keyword into a regex source tolerant of hyphen/space/underscore
/// variation. Each word is escaped, so configuration text never injects
/// regex metacharacters.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword
        .trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(SEPARATOR_CLASS)
}

/// Compiled keyword patterns keyed by lower-cased keyword.
#[derive(Debug, Default)]
pub struct KeywordPatterns {
    patterns: HashMap<String, Regex>,
}

impl KeywordPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Precompile every keyword referenced by the concern catalog.
    pub fn compile(reference: &ReferenceData) -> Self {
        let mut patterns = Self::new();
        for concern in &reference.concerns {
            for keyword in concern
                .maps_to_photos
                .iter()
                .chain(concern.maps_to_specific_issues.iter())
            {
                patterns.insert(keyword);
            }
        }
        patterns
    }

    /// Compile and cache a keyword pattern. Blank keywords are ignored.
    pub fn insert(&mut self, keyword: &str) {
        let key = keyword.trim().to_lowercase();
        if key.is_empty() || self.patterns.contains_key(&key) {
            return;
        }

        match RegexBuilder::new(&normalize_keyword(&key))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => {
                self.patterns.insert(key, regex);
            }
            Err(e) => tracing::warn!(keyword = %key, error = %e, "skipping uncompilable keyword"),
        }
    }

    /// Whether `keyword` occurs in `text`. Uncached keywords use substring only.
    pub fn matches(&self, keyword: &str, text: &str) -> bool {
        self.matches_lowered(keyword, &text.to_lowercase())
    }

    /// Whether any keyword occurs in `text`.
    pub fn matches_any<S: AsRef<str>>(&self, keywords: &[S], text: &str) -> bool {
        self.matches_any_lowered(keywords, &text.to_lowercase())
    }

    /// Like [`matches_any`](Self::matches_any) for text that is already lower-cased.
    pub fn matches_any_lowered<S: AsRef<str>>(&self, keywords: &[S], lowered: &str) -> bool {
        keywords.iter().any(|k| self.matches_lowered(k.as_ref(), lowered))
    }

    fn matches_lowered(&self, keyword: &str, lowered: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }

        let key: Cow<'_, str> = if keyword.chars().any(char::is_uppercase) {
            Cow::Owned(keyword.to_lowercase())
        } else {
            Cow::Borrowed(keyword)
        };
        if lowered.contains(key.as_ref()) {
            return true;
        }

        self.patterns
            .get(key.as_ref())
            .is_some_and(|pattern| pattern.is_match(lowered))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
