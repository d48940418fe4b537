//! Fuzzy matching for the roster filter.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Case-insensitive fuzzy matcher.
///
/// A query matches when its characters appear in order in the text, not
/// necessarily next to each other, so `"jdo"` finds `"John Doe"`.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub fn matches(&self, text: &str, query: &str) -> bool {
        self.inner.fuzzy_match(text, query.trim()).is_some()
    }

    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>, query: &str) -> bool {
        texts.into_iter().any(|text| self.matches(text, query))
    }
}
