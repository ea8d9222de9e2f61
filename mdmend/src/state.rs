//! Incremental view over a growing document.
//!
//! [`DocumentView`] owns the text received so far, re-segments after every
//! delta and keeps one completed display string per block. Because block
//! boundaries are stable under appends, every slot before the first changed
//! one keeps its display string, so a renderer only re-parses the tail.

use std::ops::Range;

use crate::complete::complete_with;
use crate::options::CompleteOptions;
use crate::segment::segment;

/// What changed in a [`DocumentView`] after a delta was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewUpdate {
    /// Leading display slots that kept their previous content.
    pub reused: usize,
    /// Total number of blocks after the update.
    pub total: usize,
}

impl ViewUpdate {
    /// Slot indices a renderer has to redraw.
    pub fn changed(&self) -> Range<usize> {
        self.reused..self.total
    }
}

/// Accumulated document text plus its per-block display strings.
#[derive(Debug, Clone, Default)]
pub struct DocumentView {
    opts: CompleteOptions,
    text: String,
    raw: Vec<String>,
    display: Vec<String>,
}

impl DocumentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: CompleteOptions) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    /// Append a streamed delta and refresh the affected display slots.
    pub fn push_str(&mut self, delta: &str) -> ViewUpdate {
        self.text.push_str(delta);
        self.refresh()
    }

    /// Replace the whole text, keeping display slots whose block did not
    /// change.
    pub fn set_text(&mut self, text: impl Into<String>) -> ViewUpdate {
        self.text = text.into();
        self.refresh()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.raw.clear();
        self.display.clear();
    }

    /// The raw text received so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw blocks; concatenating them restores [`Self::text`] exactly.
    pub fn blocks(&self) -> &[String] {
        &self.raw
    }

    /// Completed blocks, ready for a markdown renderer.
    pub fn display_blocks(&self) -> &[String] {
        &self.display
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn refresh(&mut self) -> ViewUpdate {
        let next = segment(&self.text);
        let mut reused = 0usize;
        while reused < next.len()
            && reused < self.raw.len()
            && self.raw[reused] == next[reused]
        {
            reused += 1;
        }
        self.raw.truncate(reused);
        self.display.truncate(reused);
        for block in &next[reused..] {
            self.raw.push((*block).to_string());
            self.display.push(complete_with(block, &self.opts));
        }
        ViewUpdate {
            reused,
            total: next.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_str_reuses_finished_blocks() {
        let mut view = DocumentView::new();
        let first = view.push_str("# Title\n\nPara");
        assert_eq!(first.reused, 0);
        assert_eq!(first.total, 2);

        let second = view.push_str(" grows here");
        assert_eq!(second.reused, 1);
        assert_eq!(second.total, 2);
        assert_eq!(second.changed(), 1..2);
        assert_eq!(view.blocks()[1], "Para grows here");
    }

    #[test]
    fn display_blocks_are_completed() {
        let mut view = DocumentView::new();
        view.push_str("Hello **wor");
        assert_eq!(view.display_blocks(), ["Hello **wor**"]);
        assert_eq!(view.blocks(), ["Hello **wor"]);
    }

    #[test]
    fn concatenated_blocks_restore_text() {
        let mut view = DocumentView::new();
        for delta in ["# T", "itle\n\npara one\n", "\npara two\n```rs\nle", "t x = 1;"] {
            view.push_str(delta);
        }
        assert_eq!(view.blocks().concat(), view.text());
    }

    #[test]
    fn set_text_diffs_against_previous_blocks() {
        let mut view = DocumentView::new();
        view.set_text("a\n\nb\n\nc");
        let update = view.set_text("a\n\nb\n\nc changed");
        assert_eq!(update.reused, 2);
        assert_eq!(update.total, 3);
    }

    #[test]
    fn clear_resets_everything() {
        let mut view = DocumentView::new();
        view.push_str("some **text");
        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.text(), "");
        assert!(view.display_blocks().is_empty());
    }
}
