#![allow(dead_code)]

use mdmend::DocumentView;

pub fn feed_view(chunks: impl IntoIterator<Item = String>) -> DocumentView {
    let mut view = DocumentView::new();
    for chunk in chunks {
        view.push_str(&chunk);
    }
    view
}

pub fn segment_owned(text: &str) -> Vec<String> {
    mdmend::segment(text)
        .into_iter()
        .map(|b| b.to_string())
        .collect()
}

/// Byte offsets that are valid cut points for prefix-based checks.
pub fn char_boundaries(text: &str) -> Vec<usize> {
    (0..=text.len())
        .filter(|&i| text.is_char_boundary(i))
        .collect()
}

pub fn chunk_whole(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

pub fn chunk_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|s| s.to_string()).collect()
}

pub fn chunk_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

fn fnv1a64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in s.as_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// Short pseudo-random string over `alphabet`, reproducible per trial.
pub fn delimiter_soup(alphabet: &[char], trial: u64, max_len: usize) -> String {
    assert!(max_len > 0);
    let mut state = fnv1a64("delimiter-soup") ^ trial.wrapping_mul(0x9e3779b97f4a7c15);
    let len = (xorshift64(&mut state) as usize % max_len) + 1;
    (0..len)
        .map(|_| alphabet[xorshift64(&mut state) as usize % alphabet.len()])
        .collect()
}

pub fn chunk_pseudo_random(
    text: &str,
    seed_label: &str,
    trial: u64,
    max_bytes: usize,
) -> Vec<String> {
    assert!(max_bytes > 0);
    let mut state = fnv1a64(seed_label) ^ (trial.wrapping_mul(0x9e3779b97f4a7c15));

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let want = (xorshift64(&mut state) as usize % max_bytes) + 1;
        let mut end = (start + want).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(text[start..end].to_string());
        start = end;
    }
    out
}
