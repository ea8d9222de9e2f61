//! Incremental `pulldown-cmark` parsing over completed display blocks.
//!
//! Run:
//!   cargo run --features pulldown --example pulldown_incremental

use mdmend::DocumentView;
use mdmend::adapters::pulldown::PulldownAdapter;
use pulldown_cmark::{Event, Tag};

fn main() {
    let mut view = DocumentView::new();
    let mut adapter = PulldownAdapter::new();

    let chunks = [
        "See the [docs](https://ex",
        "ample.com) for more.\n\n",
        "Then **bold",
        " text** and `code`.\n",
    ];

    for (i, chunk) in chunks.iter().enumerate() {
        println!("\n== tick {i} ==");
        view.push_str(chunk);
        let reused = adapter.sync(view.display_blocks());
        println!("slots={} reparsed={}", adapter.len(), adapter.len() - reused);

        for (idx, events) in adapter.iter().enumerate() {
            let has_link = events
                .iter()
                .any(|e| matches!(e, Event::Start(Tag::Link { .. })));
            println!("slot {idx} events.len={} has_link={has_link}", events.len());
        }
    }
}
