//! Bridge from display blocks to `pulldown-cmark` events.
//!
//! The adapter keeps one parsed event list per display slot. After each
//! delta, [`PulldownAdapter::sync`] re-parses only the slots whose display
//! string changed, which in the append-only case is the tail block.

use pulldown_cmark::{Event, Options as PulldownOptions, Parser};

#[derive(Debug, Clone)]
pub struct PulldownAdapterOptions {
    pub pulldown: PulldownOptions,
}

impl Default for PulldownAdapterOptions {
    fn default() -> Self {
        // The completer emits tables, strikethrough and `$$` math, so the
        // parser should understand them out of the box.
        Self {
            pulldown: PulldownOptions::ENABLE_TABLES
                | PulldownOptions::ENABLE_STRIKETHROUGH
                | PulldownOptions::ENABLE_MATH,
        }
    }
}

/// Per-slot event cache over the display blocks of a document.
#[derive(Debug, Default)]
pub struct PulldownAdapter {
    opts: PulldownAdapterOptions,
    slots: Vec<(String, Vec<Event<'static>>)>,
}

impl PulldownAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: PulldownAdapterOptions) -> Self {
        Self {
            opts,
            slots: Vec::new(),
        }
    }

    /// Bring the cache in line with `display`, re-parsing changed slots.
    ///
    /// Returns the number of leading slots whose events were reused.
    pub fn sync(&mut self, display: &[String]) -> usize {
        let mut reused = 0usize;
        while reused < display.len()
            && reused < self.slots.len()
            && self.slots[reused].0 == display[reused]
        {
            reused += 1;
        }
        self.slots.truncate(reused);
        for block in &display[reused..] {
            let events = parse_events(block, self.opts.pulldown);
            self.slots.push((block.clone(), events));
        }
        reused
    }

    pub fn events(&self, slot: usize) -> Option<&[Event<'static>]> {
        self.slots.get(slot).map(|(_, events)| events.as_slice())
    }

    /// Event lists for every slot, in document order.
    pub fn iter(&self) -> impl Iterator<Item = &[Event<'static>]> {
        self.slots.iter().map(|(_, events)| events.as_slice())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Parse `input` into owned events that outlive the input buffer.
pub fn parse_events(input: &str, options: PulldownOptions) -> Vec<Event<'static>> {
    Parser::new_ext(input, options)
        .map(|e| e.into_static())
        .collect()
}
