//! Detecting sources that were already recorded.

use std::collections::HashSet;

/// Exact membership: `https://a.com` and `https://a.com/` are different
/// sources. Pass the URL exactly as it will be stored.
pub fn is_duplicate(known: &HashSet<String>, candidate: &str) -> bool {
    known.contains(candidate)
}

/// The list of recorded source URLs kept in the repository, one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIndex {
    urls: HashSet<String>,
}

impl SourceIndex {
    /// Blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        Self {
            urls: content
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string())
                .collect(),
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        is_duplicate(&self.urls, url)
    }

    /// Remember a source written during this session.
    pub fn insert(&mut self, url: impl Into<String>) {
        self.urls.insert(url.into());
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
