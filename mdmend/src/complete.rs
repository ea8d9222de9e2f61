//! Completion of a single in-flight block.
//!
//! [`complete`] turns the possibly cut-off tail of a stream into well-formed
//! markdown: open constructs are closed in reverse order of opening, a
//! trailing image fragment is dropped, and a link whose URL is still
//! streaming is pointed at [`INCOMPLETE_LINK_URL`]. Text the author already
//! wrote is never reordered or reworded.
//!
//! The function is total and idempotent: any input produces some output, and
//! completing an already completed block changes nothing.
//!
//! [`INCOMPLETE_LINK_URL`]: crate::options::INCOMPLETE_LINK_URL

use std::ops::Range;

use crate::options::CompleteOptions;
use crate::scan::{Opener, scan_fences, scan_inline, whitespace_or_markers_only};
use crate::syntax::{
    count_table_row_cells, ends_with_unescaped_pipe, is_table_delimiter_line, looks_like_table_row,
};

/// Close or neutralize every construct left open by a cut-off block.
///
/// ```
/// assert_eq!(mdmend::complete("Hello **world"), "Hello **world**");
/// assert_eq!(mdmend::complete("Check [this out"), "Check [this out");
/// ```
pub fn complete(block: &str) -> String {
    complete_with(block, &CompleteOptions::default())
}

/// [`complete`] with per-construct control.
pub fn complete_with(block: &str, opts: &CompleteOptions) -> String {
    if block.is_empty() {
        return String::new();
    }

    let fences = scan_fences(block);
    if let Some((start, ch, len)) = fences.open {
        if !opts.code_fences {
            return block.to_string();
        }
        // Text before the fence line still gets its inline closers; the
        // fence region itself is code and only needs the closing line.
        let mut out = close_inline(block[..start].to_string(), &fences.spans, opts);
        out.push_str(&block[start..]);
        return close_open_fence(out, ch, len);
    }

    let mut text = block.to_string();
    if opts.setext_guard {
        guard_setext_underline(&mut text);
    }
    // Padding brackets the inline pass. Closers have to see the padded row
    // so they land after its cells, while a sentinel rewrite or an image
    // drop can truncate the fresh pad right back off the tail.
    if opts.tables {
        pad_dangling_table_row(&mut text);
    }
    let mut text = close_inline(text, &fences.spans, opts);
    if opts.tables {
        pad_dangling_table_row(&mut text);
    }
    text
}

fn close_open_fence(mut out: String, ch: char, len: usize) -> String {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    for _ in 0..len {
        out.push(ch);
    }
    out
}

/// A trailing `-`, `--`, `=` or `==` line under text would flip the whole
/// previous line into a setext heading while the next delta may still turn
/// it into a list item or thematic break. A zero-width space keeps it plain
/// text until more input decides.
fn guard_setext_underline(text: &mut String) {
    let Some(last_nl) = text.rfind('\n') else {
        return;
    };
    let prev_line = text[..last_nl].rsplit('\n').next().unwrap_or("");
    if prev_line.trim().is_empty() {
        return;
    }
    let last_line = &text[last_nl + 1..];
    if last_line.ends_with([' ', '\t']) {
        return;
    }
    if matches!(last_line.trim(), "-" | "--" | "=" | "==") {
        text.push('\u{200B}');
    }
}

/// Pad the dangling last row of a still-streaming table to the header's cell
/// count so the columns keep their places while the row grows.
///
/// Applies only while the table is the open tail of the block: every line
/// from the header pair to the end must be a row. A blank or non-row line
/// after the rows finalizes the table, and a finalized table is the parser's
/// business.
fn pad_dangling_table_row(text: &mut String) {
    let mut lines: Vec<(usize, usize, bool)> = Vec::new();
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);
        lines.push((start, start + content.len(), content.trim().is_empty()));
    }
    let Some(first) = lines.iter().position(|&(_, _, blank)| !blank) else {
        return;
    };
    if lines.len() < first + 3 || lines[first + 1].2 {
        return;
    }
    let header = &text[lines[first].0..lines[first].1];
    let delimiter = &text[lines[first + 1].0..lines[first + 1].1];
    if !looks_like_table_row(header) || !is_table_delimiter_line(delimiter) {
        return;
    }
    for &(start, end, blank) in &lines[first + 2..] {
        if blank || !looks_like_table_row(&text[start..end]) {
            return;
        }
    }
    let (row_start, row_end, _) = lines[lines.len() - 1];
    let row = &text[row_start..row_end];
    if is_table_delimiter_line(row) {
        return;
    }
    let header_cells = count_table_row_cells(header);
    if count_table_row_cells(row) >= header_cells {
        return;
    }
    let mut padded = row.to_string();
    if !ends_with_unescaped_pipe(&padded) {
        padded.push_str(" |");
    }
    // Counting treats one trailing pipe as decoration, so append until the
    // count agrees instead of trusting arithmetic on the original row.
    while count_table_row_cells(&padded) < header_cells {
        padded.push_str(" |");
    }
    text.replace_range(row_start..row_end, &padded);
}

fn close_inline(mut text: String, masked: &[Range<usize>], opts: &CompleteOptions) -> String {
    let mut stack = scan_inline(&text, masked);

    // A trailing image fragment is dropped outright, label and all; a
    // broken image is worse than a missing one. The cut can swallow markers
    // that had closed an earlier opener, so the shorter text is scanned
    // afresh.
    if opts.images {
        if let Some(cut) = earliest_image_start(&stack) {
            text.truncate(cut);
            stack = scan_inline(&text, masked);
        }
    }

    // A link caught mid-URL keeps its text but points at the sentinel so
    // the renderer can show it inert.
    if let Some(&Opener::Url {
        image: false,
        open_at,
        label_end,
        ..
    }) = stack.last()
    {
        if opts.links {
            let label = text[open_at + 1..label_end].to_string();
            text.truncate(open_at);
            text.push('[');
            text.push_str(&label);
            text.push_str("](");
            text.push_str(&opts.incomplete_link_url);
            text.push(')');
            stack.pop();
        }
    }

    // Closers accumulate at a single growing insertion point, innermost
    // opener first. Unwinding stops at the first opener that must stay
    // open: a closer for anything beneath it would land inside the
    // re-opened span and fail to pair on the next pass.
    let mut at = closer_insertion_point(&text, masked);
    for opener in stack.iter().rev() {
        let inserted = match *opener {
            Opener::Emphasis { ch, len, at: start } if opts.emphasis => {
                if has_content(&text, start + len, at) {
                    let closer = match (ch, len) {
                        (b'*', 2) => "**",
                        (b'*', _) => "*",
                        (_, 2) => "__",
                        (_, _) => "_",
                    };
                    insert_closer(&mut text, at, closer)
                } else {
                    Some(0)
                }
            }
            Opener::Strike { at: start } if opts.strikethrough => {
                if has_content(&text, start + 2, at) {
                    insert_closer(&mut text, at, "~~")
                } else {
                    Some(0)
                }
            }
            Opener::Code { len, at: start } if opts.inline_code => {
                if has_content(&text, start + len, at) {
                    Some(close_code_span(&mut text, at, len))
                } else {
                    None
                }
            }
            Opener::Math { at: start } if opts.math => {
                let closer = if text[start + 2..at].contains('\n') {
                    "\n$$"
                } else {
                    "$$"
                };
                text.insert_str(at, closer);
                Some(closer.len())
            }
            // An open `[label` may still become a link; left alone it reads
            // fine as plain text, and outer closers pair across it.
            Opener::Label { .. } => Some(0),
            // Disabled emphasis and strikethrough stay open without
            // blocking the rest; their markers still pair through on a
            // rescan.
            Opener::Emphasis { .. } | Opener::Strike { .. } => Some(0),
            // Code spans, math and URLs hide their contents from a rescan.
            Opener::Code { .. } | Opener::Math { .. } | Opener::Url { .. } => None,
        };
        match inserted {
            Some(n) => at += n,
            None => break,
        }
    }

    text
}

fn earliest_image_start(stack: &[Opener]) -> Option<usize> {
    stack
        .iter()
        .filter_map(|o| match *o {
            // `at` is the `[`; the `!` sits right before it.
            Opener::Label { image: true, at } => Some(at - 1),
            Opener::Url {
                image: true,
                open_at,
                ..
            } => Some(open_at - 1),
            _ => None,
        })
        .min()
}

/// Closers go before the trailing newline run, and before a closed fence
/// that ends the block: the fence region is opaque, so a closer after it
/// would glue onto the closing fence line and never pair.
fn closer_insertion_point(text: &str, masked: &[Range<usize>]) -> usize {
    let mut at = text.trim_end_matches(['\n', '\r']).len();
    for span in masked.iter().rev() {
        if span.start < at && at <= span.end {
            at = text[..span.start].trim_end_matches(['\n', '\r']).len();
        }
    }
    at
}

/// Content of an opener is what sits between its marker and the insertion
/// point; markers and whitespace alone leave it literal.
fn has_content(text: &str, from: usize, to: usize) -> bool {
    from < to && !whitespace_or_markers_only(&text[from..to])
}

/// Insert `closer` at `at`, unless an odd backslash run right before it
/// would escape the closer's first character on a rescan; the opener then
/// stays literal.
fn insert_closer(text: &mut String, at: usize, closer: &str) -> Option<usize> {
    let backslashes = text[..at].bytes().rev().take_while(|&b| b == b'\\').count();
    if backslashes % 2 == 1 {
        return None;
    }
    text.insert_str(at, closer);
    Some(closer.len())
}

fn close_code_span(text: &mut String, at: usize, len: usize) -> usize {
    let trailing = text[..at].bytes().rev().take_while(|&b| b == b'`').count();
    let closer = if trailing < len {
        // Extending the trailing run to the opening length closes the span.
        "`".repeat(len - trailing)
    } else {
        // Appending directly would merge with a longer trailing run; the
        // space keeps the closing run at its own length.
        format!(" {}", "`".repeat(len))
    };
    text.insert_str(at, &closer);
    closer.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(complete(""), "");
    }

    #[test]
    fn complete_block_is_untouched() {
        let text = "A paragraph with **bold**, `code` and [a link](https://example.com).";
        assert_eq!(complete(text), text);
    }

    #[test]
    fn closes_nested_constructs_innermost_first() {
        assert_eq!(
            complete("*italic with **bold"),
            "*italic with **bold***"
        );
        assert_eq!(
            complete("**bold with `code"),
            "**bold with `code`**"
        );
    }

    #[test]
    fn lone_markers_stay_literal() {
        assert_eq!(complete("*"), "*");
        assert_eq!(complete("**"), "**");
        assert_eq!(complete("a `"), "a `");
        assert_eq!(complete("***"), "***");
    }

    #[test]
    fn open_fence_wins_over_inline_markers() {
        assert_eq!(
            complete("```js\nconst a = \"**hi\";"),
            "```js\nconst a = \"**hi\";\n```"
        );
    }

    #[test]
    fn fence_header_alone_is_closed() {
        assert_eq!(complete("```js"), "```js\n```");
    }

    #[test]
    fn text_before_an_open_fence_still_completes() {
        assert_eq!(complete("**a\n```\ncode"), "**a**\n```\ncode\n```");
    }

    #[test]
    fn closer_lands_before_a_trailing_closed_fence() {
        assert_eq!(complete("**a\n```\nx\n```"), "**a**\n```\nx\n```");
    }

    #[test]
    fn trailing_backslash_blocks_the_closer() {
        assert_eq!(complete("|*-$\\"), "|*-$\\");
        assert_eq!(complete(r"**even\\"), r"**even\\**");
    }

    #[test]
    fn contentless_code_opener_stops_the_unwind() {
        assert_eq!(complete("_[`"), "_[`");
        assert_eq!(complete("*a `"), "*a `");
    }

    #[test]
    fn incomplete_url_points_at_sentinel() {
        assert_eq!(
            complete("Check [this](http://ex"),
            "Check [this](mdmend:incomplete-link)"
        );
    }

    #[test]
    fn open_label_is_left_alone() {
        assert_eq!(complete("Check [this out"), "Check [this out");
    }

    #[test]
    fn trailing_image_fragment_is_dropped() {
        assert_eq!(complete("Before ![alt text"), "Before ");
        assert_eq!(complete("Before ![alt](http://ex"), "Before ");
    }

    #[test]
    fn setext_underline_gets_guarded() {
        assert_eq!(complete("Some text\n--"), "Some text\n--\u{200B}");
        assert_eq!(complete("Some text\n=="), "Some text\n==\u{200B}");
        assert_eq!(complete("\n--"), "\n--");
    }

    #[test]
    fn dangling_table_row_is_padded() {
        assert_eq!(
            complete("| A | B | C |\n|---|---|---|\n| 1 | 2"),
            "| A | B | C |\n|---|---|---|\n| 1 | 2 | |"
        );
    }

    #[test]
    fn finalized_table_is_not_padded() {
        let text = "| A | B |\n|---|---|\n| 1\n\n";
        assert_eq!(complete(text), text);
    }

    #[test]
    fn math_block_closes_on_its_own_line() {
        assert_eq!(complete("$$\nx = 1"), "$$\nx = 1\n$$");
        assert_eq!(complete("Inline $$x+y"), "Inline $$x+y$$");
    }

    #[test]
    fn disabled_constructs_are_left_open() {
        let opts = CompleteOptions {
            emphasis: false,
            ..CompleteOptions::default()
        };
        assert_eq!(complete_with("Hello **world", &opts), "Hello **world");
    }

    #[test]
    fn closers_go_before_trailing_newlines() {
        assert_eq!(complete("Hello **world\n\n"), "Hello **world**\n\n");
    }
}
