//! Open-construct scanning for the completer.
//!
//! One linear pass over a block produces the ordered stack of openers that
//! are still unmatched at the end of the text. The completer unwinds that
//! stack most-recently-opened first.
//!
//! The scanner is positional, not flanking-aware: it pairs delimiter runs by
//! order and length class the way the streaming renderer this crate replaces
//! did, which keeps repeated application stable.

use std::ops::Range;

use crate::syntax::{is_code_fence_closing_line, parse_code_fence_header, thematic_break_char};

/// An unmatched opener: marker kind, marker length and start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Opener {
    /// `*` or `_` run of length class 1 or 2.
    Emphasis { ch: u8, len: usize, at: usize },
    /// `~~`.
    Strike { at: usize },
    /// Backtick run opening a code span; closes only on an equal-length run.
    Code { len: usize, at: usize },
    /// `$$` span; contents are literal except backtick code spans.
    Math { at: usize },
    /// `[` (or `![` when `image`) with no `]` yet.
    Label { image: bool, at: usize },
    /// `[label](` with no closing `)` yet; `open_at` is the `[`, `label_end`
    /// the `]`. Ends at the first unnested `)`, abandoned by a newline.
    Url {
        image: bool,
        open_at: usize,
        label_end: usize,
        depth: usize,
    },
}

/// Fenced regions of a block, found line by line.
#[derive(Debug, Clone, Default)]
pub(crate) struct FenceScan {
    /// Closed fence regions (opening line start to closing line end).
    pub spans: Vec<Range<usize>>,
    /// Opening line start, fence char and length when the text ends inside
    /// an open fence.
    pub open: Option<(usize, char, usize)>,
}

pub(crate) fn scan_fences(text: &str) -> FenceScan {
    let mut scan = FenceScan::default();
    let mut open: Option<(usize, char, usize)> = None;
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        match open {
            Some((start, ch, len)) => {
                if is_code_fence_closing_line(line, ch, len) {
                    scan.spans.push(start..offset);
                    open = None;
                }
            }
            None => {
                if let Some(h) = parse_code_fence_header(line) {
                    open = Some((line_start, h.fence_char, h.fence_len));
                }
            }
        }
    }
    scan.open = open;
    scan
}

/// Scan `text` and return the unmatched openers, bottom of stack first.
///
/// `masked` are closed fence regions; nothing inside them opens or closes.
pub(crate) fn scan_inline(text: &str, masked: &[Range<usize>]) -> Vec<Opener> {
    let bytes = text.as_bytes();
    let mut stack: Vec<Opener> = Vec::new();
    let mut span_idx = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        while span_idx < masked.len() && masked[span_idx].end <= i {
            span_idx += 1;
        }
        if span_idx < masked.len() && masked[span_idx].contains(&i) {
            i = masked[span_idx].end;
            continue;
        }
        let b = bytes[i];

        // Inside a code span only the exact-length closing run matters.
        if let Some(Opener::Code { len, .. }) = stack.last().copied() {
            if b == b'`' {
                let run = run_len(bytes, i, b'`');
                if run == len {
                    stack.pop();
                }
                i += run;
            } else {
                i += 1;
            }
            continue;
        }

        if b == b'\\' {
            if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) {
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        // Inside a URL: parens nest, the first unnested `)` completes the
        // link, a newline abandons it (the bracket text stays literal).
        if let Some(Opener::Url { depth, .. }) = stack.last_mut() {
            match b {
                b')' => {
                    *depth -= 1;
                    if *depth == 0 {
                        stack.pop();
                    }
                }
                b'(' => *depth += 1,
                b'\n' => {
                    stack.pop();
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        // Inside math everything is literal except code spans and the
        // closing `$$`.
        if let Some(Opener::Math { .. }) = stack.last() {
            match b {
                b'`' => {
                    let run = run_len(bytes, i, b'`');
                    stack.push(Opener::Code { len: run, at: i });
                    i += run;
                }
                b'$' if bytes.get(i + 1) == Some(&b'$') => {
                    stack.pop();
                    i += 2;
                }
                _ => i += 1,
            }
            continue;
        }

        match b {
            b'`' => {
                let run = run_len(bytes, i, b'`');
                stack.push(Opener::Code { len: run, at: i });
                i += run;
            }
            b'$' => {
                if bytes.get(i + 1) == Some(&b'$') {
                    stack.push(Opener::Math { at: i });
                    i += 2;
                } else {
                    i += 1;
                }
            }
            b'~' => {
                let run = run_len(bytes, i, b'~');
                if run >= 2 {
                    if let Some(pos) = stack
                        .iter()
                        .rposition(|o| matches!(o, Opener::Strike { .. }))
                    {
                        literalize_above(&mut stack, pos);
                        stack.remove(pos);
                    } else if run == 2 {
                        stack.push(Opener::Strike { at: i });
                    }
                }
                i += run;
            }
            b'*' | b'_' => {
                let run = run_len(bytes, i, b);
                if on_thematic_break_line(text, i)
                    || (b == b'*' && run == 1 && is_list_marker_at(text, i))
                    || intraword_skip(text, i, run, b)
                {
                    i += run;
                    continue;
                }
                // A run closes matching openers innermost first. An even run
                // pairs only with double openers; an odd run closes the
                // topmost opener of either width.
                let mut remaining = run;
                while remaining > 0 {
                    let Some(pos) = stack.iter().rposition(|o| {
                        matches!(o, Opener::Emphasis { ch, len, .. }
                            if *ch == b
                                && *len <= remaining
                                && (remaining % 2 == 1 || *len == 2))
                    }) else {
                        break;
                    };
                    literalize_above(&mut stack, pos);
                    if let Opener::Emphasis { len, .. } = stack[pos] {
                        remaining -= len;
                    }
                    stack.remove(pos);
                }
                // Leftover markers open again, but runs of four or more are
                // left literal.
                if remaining > 0 && run <= 3 {
                    if remaining >= 2 {
                        stack.push(Opener::Emphasis {
                            ch: b,
                            len: 2,
                            at: i + run - remaining,
                        });
                    }
                    if remaining % 2 == 1 {
                        stack.push(Opener::Emphasis {
                            ch: b,
                            len: 1,
                            at: i + run - 1,
                        });
                    }
                }
                i += run;
            }
            b'[' => {
                let image = i > 0 && bytes[i - 1] == b'!' && !is_escaped(bytes, i - 1);
                stack.push(Opener::Label { image, at: i });
                i += 1;
            }
            b']' => {
                let mut consumed = false;
                if let Some(pos) = stack
                    .iter()
                    .rposition(|o| matches!(o, Opener::Label { .. }))
                {
                    if let Opener::Label { image, at } = stack[pos] {
                        // Emphasis opened inside the label cannot escape it.
                        stack.truncate(pos);
                        if bytes.get(i + 1) == Some(&b'(') {
                            stack.push(Opener::Url {
                                image,
                                open_at: at,
                                label_end: i,
                                depth: 1,
                            });
                            i += 2;
                            consumed = true;
                        }
                    }
                }
                if !consumed {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    stack
}

/// Emphasis and strikethrough entries above `pos` turn literal when an outer
/// closer matches below them; pending link labels stay.
fn literalize_above(stack: &mut Vec<Opener>, pos: usize) {
    let mut k = stack.len();
    while k > pos + 1 {
        k -= 1;
        if matches!(
            stack[k],
            Opener::Emphasis { .. } | Opener::Strike { .. }
        ) {
            stack.remove(k);
        }
    }
}

pub(crate) fn whitespace_or_markers_only(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || matches!(c, '_' | '~' | '*' | '`'))
}

fn run_len(bytes: &[u8], i: usize, b: u8) -> usize {
    let mut n = 0usize;
    while i + n < bytes.len() && bytes[i + n] == b {
        n += 1;
    }
    n
}

fn is_escaped(bytes: &[u8], i: usize) -> bool {
    let mut backslashes = 0usize;
    let mut j = i;
    while j > 0 && bytes[j - 1] == b'\\' {
        backslashes += 1;
        j -= 1;
    }
    backslashes % 2 == 1
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn intraword_skip(text: &str, i: usize, run: usize, b: u8) -> bool {
    // `_` never opens inside a word; a single `*` does not either. `**`
    // stays valid intraword, as in `re**do**ne`.
    if b == b'*' && run != 1 {
        return false;
    }
    let prev = text[..i].chars().next_back();
    let next = text[i + run..].chars().next();
    prev.is_some_and(is_word_char) && next.is_some_and(is_word_char)
}

fn is_list_marker_at(text: &str, i: usize) -> bool {
    let bytes = text.as_bytes();
    let line_start = text[..i].rfind('\n').map_or(0, |p| p + 1);
    let mut j = line_start;
    let mut spaces = 0usize;
    while j < i && spaces < 3 && bytes[j] == b' ' {
        spaces += 1;
        j += 1;
    }
    j == i && matches!(bytes.get(i + 1), Some(b' ' | b'\t'))
}

fn on_thematic_break_line(text: &str, i: usize) -> bool {
    let start = text[..i].rfind('\n').map_or(0, |p| p + 1);
    let end = text[i..].find('\n').map_or(text.len(), |p| i + p);
    thematic_break_char(&text[start..end]).is_some()
}
