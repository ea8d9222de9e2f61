//! Token-sized deltas through the coalescer into a view actor.
//!
//! Run:
//!   cargo run --example coalesce_view

use std::time::Duration;

use mdmend::CompleteOptions;
use mdmend_tokio::{BackpressurePolicy, CoalesceOptions, DeltaSender, spawn_view_actor};
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (tx, rx) = mpsc::channel::<String>(64);
    let coalesce = CoalesceOptions {
        max_delay: Duration::from_millis(20),
        ..CoalesceOptions::default()
    };
    let mut patches = spawn_view_actor(rx, coalesce, CompleteOptions::default());

    tokio::spawn(async move {
        let mut sender = DeltaSender::new(tx, BackpressurePolicy::Block);
        let tokens = [
            "# Agent", " reply\n\n", "Work", "ing on", " **your", " request",
            "**.\n\n", "```sh\n", "cargo test\n", "```\n",
        ];
        for token in tokens {
            sender.send(token).await.expect("view actor stopped");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    while let Some(patch) = patches.recv().await {
        println!("reused={} changed={:?}", patch.reused, patch.blocks);
    }
    println!("stream closed");
}
