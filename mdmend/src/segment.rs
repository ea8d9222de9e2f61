//! Block segmentation.
//!
//! One pass over the lines of the full text. Blank lines end blocks, except
//! inside an open fence or table region; trailing blank lines stay attached
//! to the block before them so concatenation reproduces the input exactly.

use std::ops::Range;

use crate::syntax::{
    heading_level, is_blank_line, is_code_fence_closing_line, is_list_item_start,
    is_table_delimiter_line, looks_like_table_row, parse_code_fence_header,
    setext_underline_char, thematic_break_char,
};
use crate::types::{Block, BlockKind};

#[derive(Debug, Clone, Copy)]
enum Region {
    None,
    Fence { ch: char, len: usize },
    Table,
}

/// Split `text` into top-level blocks.
///
/// The returned slices concatenate to exactly `text`. Boundaries are stable
/// under appends: a block that ended before the append point is returned
/// byte-identical at the same index on the next call.
///
/// ```
/// let blocks = mdmend::segment("# Title\n\nPara one.\n\nPara two.");
/// assert_eq!(blocks, ["# Title\n\n", "Para one.\n\n", "Para two."]);
/// ```
pub fn segment(text: &str) -> Vec<&str> {
    segment_spans(text)
        .into_iter()
        .map(|span| &text[span])
        .collect()
}

/// Like [`segment`], with a [`BlockKind`] label per block.
pub fn segment_blocks(text: &str) -> Vec<Block<'_>> {
    segment_spans(text)
        .into_iter()
        .map(|span| {
            let text = &text[span];
            Block {
                text,
                kind: classify(text),
            }
        })
        .collect()
}

fn segment_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut start = 0usize;
    let mut region = Region::None;
    let mut has_content = false;
    let mut in_trailing_blanks = false;
    // Last row-shaped line of the current block, candidate table header.
    let mut header_candidate: Option<usize> = None;

    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let blank = is_blank_line(line);

        match region {
            Region::Fence { ch, len } => {
                if is_code_fence_closing_line(line, ch, len) {
                    region = Region::None;
                    in_trailing_blanks = true;
                }
                continue;
            }
            Region::Table => {
                if blank {
                    region = Region::None;
                    in_trailing_blanks = true;
                    continue;
                }
                if looks_like_table_row(line) {
                    continue;
                }
                // A non-row line ends the table and opens a fresh block.
                spans.push(start..line_start);
                start = line_start;
                region = Region::None;
                has_content = false;
                in_trailing_blanks = false;
                header_candidate = None;
            }
            Region::None => {}
        }

        if blank {
            if has_content {
                in_trailing_blanks = true;
            }
            header_candidate = None;
            continue;
        }

        if in_trailing_blanks {
            spans.push(start..line_start);
            start = line_start;
            has_content = false;
            in_trailing_blanks = false;
            header_candidate = None;
        }

        if let Some(header) = parse_code_fence_header(line) {
            if has_content {
                // A fence interrupts a paragraph; the open-ended block starts
                // at the fence line.
                spans.push(start..line_start);
                start = line_start;
            }
            region = Region::Fence {
                ch: header.fence_char,
                len: header.fence_len,
            };
            has_content = true;
            header_candidate = None;
            continue;
        }

        if is_table_delimiter_line(line) {
            if let Some(header_start) = header_candidate {
                // The table starts retroactively at its header row.
                if header_start > start {
                    spans.push(start..header_start);
                    start = header_start;
                }
                region = Region::Table;
                has_content = true;
                header_candidate = None;
                continue;
            }
        }

        has_content = true;
        header_candidate = looks_like_table_row(line).then_some(line_start);
    }

    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

fn classify(text: &str) -> BlockKind {
    let mut lines = text.lines().filter(|l| !is_blank_line(l));
    let Some(first) = lines.next() else {
        return BlockKind::Unknown;
    };
    if parse_code_fence_header(first).is_some() {
        return BlockKind::CodeFence;
    }
    if heading_level(first).is_some() {
        return BlockKind::Heading;
    }
    if thematic_break_char(first).is_some() {
        return BlockKind::ThematicBreak;
    }
    if first.trim_start().starts_with('>') {
        return BlockKind::BlockQuote;
    }
    if is_list_item_start(first) {
        return BlockKind::List;
    }
    if let Some(second) = lines.next() {
        if looks_like_table_row(first) && is_table_delimiter_line(second) {
            return BlockKind::Table;
        }
        if setext_underline_char(second).is_some() && lines.next().is_none() {
            return BlockKind::Heading;
        }
    }
    BlockKind::Paragraph
}
