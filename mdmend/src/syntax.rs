//! Line-level syntax predicates shared by the segmenter and the completer.
//!
//! These are deliberately CommonMark-ish rather than CommonMark-complete:
//! they classify single lines well enough to place block boundaries and to
//! decide what the completer must close, and they never look beyond the line
//! they are given.

/// Parsed opening line of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFenceHeader<'a> {
    pub fence_char: char,
    pub fence_len: usize,
    /// Entire info string (trimmed), excluding fence markers.
    pub info: &'a str,
    /// First token of `info`. `None` means "no language".
    pub language: Option<&'a str>,
}

fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn strip_up_to_three_spaces(line: &str) -> &str {
    let mut s = line;
    let mut spaces = 0usize;
    while spaces < 3 && s.starts_with(' ') {
        s = &s[1..];
        spaces += 1;
    }
    s
}

/// Parse a fence-opening line: up to three leading spaces, then a run of
/// three or more `` ` `` or `~`, then the info string.
///
/// A backtick fence's info string may not contain a backtick (CommonMark), so
/// `` ```python print("x")`` `` is inline code, not a fence.
pub fn parse_code_fence_header(line: &str) -> Option<CodeFenceHeader<'_>> {
    let s = strip_up_to_three_spaces(line.trim_end_matches('\n').trim_end_matches('\r'));
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return None;
    }
    let fence_char = bytes[0] as char;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let mut fence_len = 0usize;
    while fence_len < bytes.len() && bytes[fence_len] == bytes[0] {
        fence_len += 1;
    }
    if fence_len < 3 {
        return None;
    }
    let rest = &s[fence_len..];
    if fence_char == '`' && rest.contains('`') {
        return None;
    }
    let info = rest.trim();
    let language = info.split_whitespace().next();
    Some(CodeFenceHeader {
        fence_char,
        fence_len,
        info,
        language,
    })
}

/// Parse the fence header of a block whose first line opens a fence.
pub fn parse_code_fence_header_from_block(text: &str) -> Option<CodeFenceHeader<'_>> {
    let first_line = text.split('\n').next().unwrap_or(text);
    parse_code_fence_header(first_line)
}

/// A closing fence line: up to three leading spaces, a run of `fence_char` at
/// least `fence_len` long, nothing else.
pub fn is_code_fence_closing_line(line: &str, fence_char: char, fence_len: usize) -> bool {
    let s = strip_up_to_three_spaces(line);
    let trimmed = s.trim_end();
    if trimmed.is_empty() {
        return false;
    }
    let mut count = 0usize;
    for ch in trimmed.chars() {
        if ch != fence_char {
            return false;
        }
        count += 1;
    }
    count >= fence_len
}

pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// A table delimiter row such as `|---|:--:|`: pipes, dashes, colons and
/// whitespace only, with at least one dash and at least one pipe.
///
/// Requiring the pipe keeps `Title\n---` a setext heading instead of
/// mis-opening a one-column table.
pub fn is_table_delimiter_line(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return false;
    }
    let mut has_dash = false;
    let mut has_pipe = false;
    for c in s.chars() {
        match c {
            '|' => has_pipe = true,
            '-' => has_dash = true,
            ':' | ' ' | '\t' => {}
            _ => return false,
        }
    }
    has_dash && has_pipe
}

/// A non-blank line that can sit inside a table region.
pub fn looks_like_table_row(line: &str) -> bool {
    !is_blank_line(line) && line.contains('|')
}

/// Number of cells in a table row.
///
/// One leading and one trailing pipe are decorative; interior unescaped pipes
/// separate cells. `| a | b |`, `| a | b` and `a | b` all count two.
pub fn count_table_row_cells(line: &str) -> usize {
    let mut s = line.trim();
    if s.is_empty() {
        return 0;
    }
    if let Some(rest) = s.strip_prefix('|') {
        s = rest;
    }
    if ends_with_unescaped_pipe(s) {
        s = s[..s.len() - 1].trim_end();
    }
    let bytes = s.as_bytes();
    let mut cells = 1usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'|' => {
                cells += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    cells
}

/// Whether the row's last non-whitespace character is a decorative pipe.
pub fn ends_with_unescaped_pipe(line: &str) -> bool {
    let s = line.trim_end();
    if !s.ends_with('|') {
        return false;
    }
    let mut backslashes = 0usize;
    for b in s[..s.len() - 1].bytes().rev() {
        if b == b'\\' {
            backslashes += 1;
        } else {
            break;
        }
    }
    backslashes % 2 == 0
}

/// Thematic break: up to three leading spaces, then `-`, `*` or `_` repeated
/// three or more times with only spaces/tabs between, nothing else.
pub fn thematic_break_char(line: &str) -> Option<char> {
    let s = strip_up_to_three_spaces(line);
    let s = s.trim_end_matches(['\n', '\r']);
    let s = s.trim_end_matches([' ', '\t']);
    let mut it = s.chars();
    let first = it.next()?;
    if first != '-' && first != '*' && first != '_' {
        return None;
    }
    let mut count = 1usize;
    for c in it {
        if c == first {
            count += 1;
        } else if c != ' ' && c != '\t' {
            return None;
        }
    }
    if count >= 3 { Some(first) } else { None }
}

/// Setext underline: up to three leading spaces, then `=` or `-` repeated,
/// nothing else. Returns the underline character.
pub fn setext_underline_char(line: &str) -> Option<char> {
    let s = strip_up_to_three_spaces(line);
    let s = s.trim_end_matches(['\n', '\r']);
    let s = s.trim_end_matches([' ', '\t']);
    let mut it = s.chars();
    let first = it.next()?;
    if first != '=' && first != '-' {
        return None;
    }
    for c in it {
        if c != first {
            return None;
        }
    }
    Some(first)
}

/// List item start: `-`, `+`, `*` or an ordered marker (`1.`, `1)`) followed
/// by a space or tab.
pub fn is_list_item_start(line: &str) -> bool {
    let s = line.trim_start();
    if s.len() < 2 {
        return false;
    }
    let bytes = s.as_bytes();
    match bytes[0] {
        b'-' | b'+' | b'*' => is_space_or_tab(bytes[1]),
        b'0'..=b'9' => {
            let mut i = 0usize;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            matches!(bytes.get(i), Some(b'.' | b')'))
                && bytes.get(i + 1).copied().is_some_and(is_space_or_tab)
        }
        _ => false,
    }
}

/// ATX heading level (1-6) when the line is `#`s followed by a space, tab or
/// end of line.
pub fn heading_level(line: &str) -> Option<usize> {
    let s = strip_up_to_three_spaces(line.trim_end_matches(['\n', '\r']));
    let bytes = s.as_bytes();
    let mut level = 0usize;
    while level < bytes.len() && bytes[level] == b'#' {
        level += 1;
    }
    if level == 0 || level > 6 {
        return None;
    }
    match bytes.get(level) {
        None => Some(level),
        Some(b) if is_space_or_tab(*b) => Some(level),
        Some(_) => None,
    }
}
