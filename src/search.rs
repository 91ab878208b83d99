//! Long-lived search state wired to the current document's index.

use docview_layout::{MatchSpan, SearchIndex};

/// Query, matches and the current position among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    query: String,
    matches: Vec<MatchSpan>,
    current: Option<usize>,
}

impl SearchState {
    /// Runs `query` against `index`. The first match becomes current.
    pub fn search(&mut self, index: &SearchIndex, query: &str) -> usize {
        self.query = query.to_string();
        self.matches = index.find(query);
        self.current = if self.matches.is_empty() { None } else { Some(0) };
        log::debug!("Search '{}': {} match(es)", query, self.matches.len());
        self.matches.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<MatchSpan> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Advances with wraparound.
    pub fn next(&mut self) -> Option<MatchSpan> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |i| (i + 1) % count));
        self.current()
    }

    pub fn previous(&mut self) -> Option<MatchSpan> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(count - 1, |i| (i + count - 1) % count));
        self.current()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
