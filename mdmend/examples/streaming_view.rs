//! Streaming segmentation and repair over a growing document.
//!
//! Run:
//!   cargo run --example streaming_view

use mdmend::DocumentView;

fn main() {
    let chunks = [
        "# Streaming demo\n\n",
        "Normal text with **bold",
        " continued**.\n\n",
        "```mermaid\n",
        "graph TD;\nA-->B;\n",
        "```\n\n",
        "A table:\n\n| A | B |\n|---|---|\n| 1",
        " | 2 |\n",
    ];

    let mut view = DocumentView::new();
    for (i, chunk) in chunks.iter().enumerate() {
        println!("\n== append step {i} ==");
        let update = view.push_str(chunk);
        println!("blocks={} reused={}", update.total, update.reused);

        for idx in update.changed() {
            let raw = &view.blocks()[idx];
            println!("slot {idx} raw={raw:?}");
            let display = &view.display_blocks()[idx];
            if display != raw {
                println!("  completed={display:?}");
            }
        }
    }
}
