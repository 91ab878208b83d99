//! Text search index built alongside the visual nodes.
//!
//! Offsets and lengths are counted in `char`s. Each entry belongs to a block
//! (one paragraph); matches never cross a block boundary.

use std::ops::Range;

/// Index of an entry in the search index, carried by text-bearing visual nodes.
pub type EntryId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEntry {
    pub offset: usize,
    pub len: usize,
    pub block: usize,
}

impl SearchEntry {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A match in the concatenated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub len: usize,
}

impl MatchSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// The part of a match that falls inside one entry, in entry-local chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySegment {
    pub entry: EntryId,
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct SearchIndexBuilder {
    text: String,
    char_len: usize,
    entries: Vec<SearchEntry>,
    block: usize,
    block_open: bool,
}

impl SearchIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new block; later entries cannot match together with earlier ones.
    pub fn begin_block(&mut self) {
        if self.block_open {
            self.block += 1;
        }
        self.block_open = false;
    }

    /// Appends `text` and returns its entry id. `text` must be non-empty.
    pub fn push(&mut self, text: &str) -> EntryId {
        let len = text.chars().count();
        let id = self.entries.len();
        self.entries.push(SearchEntry {
            offset: self.char_len,
            len,
            block: self.block,
        });
        self.text.push_str(text);
        self.char_len += len;
        self.block_open = true;
        id
    }

    pub fn finish(self) -> SearchIndex {
        let folded = self.text.chars().map(fold_char).collect();
        SearchIndex {
            text: self.text,
            folded,
            entries: self.entries,
        }
    }
}

/// Immutable once built; a reload builds a new one.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    text: String,
    folded: Vec<char>,
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.folded.len()
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&SearchEntry> {
        self.entries.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry covering `offset`, by binary search over the offset table.
    pub fn locate(&self, offset: usize) -> Option<EntryId> {
        let idx = self.entries.partition_point(|e| e.offset <= offset);
        let candidate = idx.checked_sub(1)?;
        let entry = &self.entries[candidate];
        (offset < entry.end()).then_some(candidate)
    }

    /// Case-insensitive, non-overlapping matches of `query`, in order.
    pub fn find(&self, query: &str) -> Vec<MatchSpan> {
        let needle: Vec<char> = query.chars().map(fold_char).collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for range in self.block_ranges() {
            let hay = &self.folded[range.clone()];
            let mut i = 0;
            while i + needle.len() <= hay.len() {
                if hay[i..i + needle.len()] == needle[..] {
                    matches.push(MatchSpan {
                        start: range.start + i,
                        len: needle.len(),
                    });
                    i += needle.len();
                } else {
                    i += 1;
                }
            }
        }
        matches
    }

    /// Splits a match into per-entry pieces for highlighting.
    pub fn segments(&self, span: MatchSpan) -> Vec<EntrySegment> {
        let Some(first) = self.locate(span.start) else {
            return Vec::new();
        };
        self.entries[first..]
            .iter()
            .enumerate()
            .take_while(|(_, e)| e.offset < span.end())
            .map(|(i, e)| {
                let start = span.start.max(e.offset);
                let end = span.end().min(e.end());
                EntrySegment {
                    entry: first + i,
                    start: start - e.offset,
                    len: end - start,
                }
            })
            .collect()
    }

    /// The original text of a match.
    pub fn snippet(&self, span: MatchSpan) -> String {
        self.text.chars().skip(span.start).take(span.len).collect()
    }

    fn block_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut current: Option<(usize, Range<usize>)> = None;
        for e in &self.entries {
            match &mut current {
                Some((block, range)) if *block == e.block => range.end = e.end(),
                _ => {
                    if let Some((_, range)) = current.take() {
                        ranges.push(range);
                    }
                    current = Some((e.block, e.offset..e.end()));
                }
            }
        }
        if let Some((_, range)) = current {
            ranges.push(range);
        }
        ranges
    }
}

/// Single-char lowercase mapping; chars whose lowercase form expands keep
/// their original form so offsets stay aligned.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}
