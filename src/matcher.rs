//! Case-insensitive title matching
//!
//! Titles and terms are compared as raw bytes after an ASCII-only case fold.
//! Nothing outside `A`-`Z` is folded, so the result never depends on locale
//! and a Latin-1 `WM_NAME` still matches on its ASCII content.

/// Search term folded once and reused against many titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatcher {
    folded: Vec<u8>,
}

impl TitleMatcher {
    pub fn new(term: &str) -> Self {
        Self {
            folded: term.as_bytes().to_ascii_lowercase(),
        }
    }

    /// True if the term occurs anywhere in `title`, ignoring ASCII case.
    /// An absent title never matches; an empty term matches every present title.
    pub fn matches(&self, title: Option<&str>) -> bool {
        title.is_some_and(|title| self.matches_bytes(title.as_bytes()))
    }

    /// Same comparison as [`Self::matches`], over raw title bytes
    pub fn matches_bytes(&self, title: &[u8]) -> bool {
        if self.folded.is_empty() {
            return true;
        }
        if self.folded.len() > title.len() {
            return false;
        }
        let title = title.to_ascii_lowercase();
        title
            .windows(self.folded.len())
            .any(|window| window == self.folded.as_slice())
    }
}

/// One-shot form of [`TitleMatcher::matches`]
pub fn title_matches(title: Option<&str>, term: &str) -> bool {
    TitleMatcher::new(term).matches(title)
}
