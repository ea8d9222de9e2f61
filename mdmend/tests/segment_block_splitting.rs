mod support;

use mdmend::{BlockKind, segment, segment_blocks};

#[test]
fn splits_paragraphs_on_blank_lines() {
    assert_eq!(
        segment("# Title\n\nPara one.\n\nPara two."),
        ["# Title\n\n", "Para one.\n\n", "Para two."]
    );
}

#[test]
fn trailing_blank_lines_attach_to_the_preceding_block() {
    assert_eq!(
        segment("Para one.\n\n\nPara two.\n\n"),
        ["Para one.\n\n\n", "Para two.\n\n"]
    );
}

#[test]
fn leading_blank_lines_attach_to_the_following_block() {
    assert_eq!(segment("\n\nHello\n"), ["\n\nHello\n"]);
}

#[test]
fn empty_input_yields_no_blocks() {
    assert!(segment("").is_empty());
}

#[test]
fn whitespace_only_input_is_a_single_block() {
    assert_eq!(segment("\n  \n\t\n"), ["\n  \n\t\n"]);
}

#[test]
fn fenced_code_with_blank_interior_stays_one_block() {
    let text = "```\nfn main() {}\n\nprintln!(\"hi\");\n```\nafter";
    assert_eq!(
        segment(text),
        ["```\nfn main() {}\n\nprintln!(\"hi\");\n```\n", "after"]
    );
}

#[test]
fn unterminated_fence_runs_to_the_end_of_input() {
    let text = "intro\n\n````md\n# not a heading\n\nstill code";
    assert_eq!(segment(text), ["intro\n\n", "````md\n# not a heading\n\nstill code"]);
}

#[test]
fn fence_opening_interrupts_a_paragraph() {
    assert_eq!(segment("para\n```js\ncode"), ["para\n", "```js\ncode"]);
}

#[test]
fn tilde_fences_close_only_on_tildes() {
    let text = "~~~\n```\nnot a closer\n~~~\nafter";
    assert_eq!(segment(text), ["~~~\n```\nnot a closer\n~~~\n", "after"]);
}

#[test]
fn table_with_blank_interior_boundary() {
    let text = "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n\nafter";
    assert_eq!(
        segment(text),
        ["| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n\n", "after"]
    );
}

#[test]
fn table_header_is_pulled_out_of_the_preceding_paragraph() {
    let blocks = segment_blocks("Results:\n| a | b |\n|---|---|\n| 1 | 2 |");
    let texts: Vec<&str> = blocks.iter().map(|b| b.text).collect();
    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(texts, ["Results:\n", "| a | b |\n|---|---|\n| 1 | 2 |"]);
    assert_eq!(kinds, [BlockKind::Paragraph, BlockKind::Table]);
}

#[test]
fn dash_underline_without_pipes_is_not_a_table() {
    // `Title` plus dashes reads as a setext heading, not a header row.
    assert_eq!(segment("Title\n---\nbody"), ["Title\n---\nbody"]);
}

#[test]
fn table_ends_at_a_non_row_line() {
    let text = "| a |\n|---|\n| 1 |\nplain text";
    assert_eq!(segment(text), ["| a |\n|---|\n| 1 |\n", "plain text"]);
}

#[test]
fn lists_quotes_and_breaks_do_not_split_without_blank_lines() {
    let text = "- one\n- two\n> quote\n***\ntail";
    assert_eq!(segment(text), [text]);
}

#[test]
fn crlf_blank_lines_split_blocks() {
    assert_eq!(segment("one\r\n\r\ntwo"), ["one\r\n\r\n", "two"]);
}

#[test]
fn block_kinds_cover_common_shapes() {
    let text = "# H\n\n> q\n\n- item\n\n***\n\n```rs\nx\n```\n\nplain";
    let kinds: Vec<BlockKind> = segment_blocks(text).iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        [
            BlockKind::Heading,
            BlockKind::BlockQuote,
            BlockKind::List,
            BlockKind::ThematicBreak,
            BlockKind::CodeFence,
            BlockKind::Paragraph,
        ]
    );
}

#[test]
fn code_fence_block_exposes_its_language() {
    let blocks = segment_blocks("```rust,no_run\nfn f() {}\n```\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::CodeFence);
    assert_eq!(blocks[0].code_fence_language(), Some("rust,no_run"));
}
