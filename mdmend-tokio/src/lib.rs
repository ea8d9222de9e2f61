//! Tokio glue for `mdmend`.
//!
//! The core crate is runtime-agnostic and expects a single owner for its
//! [`DocumentView`]. This crate adds the pieces async producers need:
//!
//! - Coalesce tiny deltas into larger chunks (newline-gated and/or
//!   time-window flush) so the view is not re-segmented per token.
//! - Producer-side backpressure policies over a bounded channel.
//! - An actor task that owns the [`DocumentView`] and emits owned
//!   [`DocumentPatch`]es for a renderer on another thread.

use std::time::Duration;

use mdmend::{CompleteOptions, DocumentView};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug)]
pub struct CoalesceOptions {
    /// Flush once the buffered text contains a newline.
    pub flush_on_newline: bool,
    /// Flush when no flush happened for this long (progress guarantee).
    pub max_delay: Duration,
    /// Flush when the buffer reaches this many bytes.
    pub max_bytes: usize,
}

impl Default for CoalesceOptions {
    fn default() -> Self {
        Self {
            flush_on_newline: true,
            max_delay: Duration::from_millis(60),
            max_bytes: 8 * 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackpressurePolicy {
    /// Await capacity; never drops. The producer stalls when the consumer
    /// falls behind.
    Block,
    /// Drop the new delta when the channel is full. Content loss is
    /// accepted in exchange for a producer that never waits.
    DropNew,
    /// Buffer locally and flush opportunistically. Keeps content and avoids
    /// stalling on every token; memory is bounded by `local_max_bytes`.
    CoalesceLocal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Dropped,
    Buffered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendError {
    Closed,
}

/// Producer-side helper for bounded delta channels.
pub struct DeltaSender {
    tx: mpsc::Sender<String>,
    policy: BackpressurePolicy,
    local_buf: String,
    local_max_bytes: usize,
}

impl DeltaSender {
    pub fn new(tx: mpsc::Sender<String>, policy: BackpressurePolicy) -> Self {
        Self {
            tx,
            policy,
            local_buf: String::new(),
            local_max_bytes: 16 * 1024,
        }
    }

    pub fn set_local_max_bytes(&mut self, max: usize) {
        self.local_max_bytes = max.max(1);
    }

    pub fn policy(&self) -> BackpressurePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: BackpressurePolicy) {
        self.policy = policy;
    }

    pub async fn send(&mut self, delta: &str) -> Result<SendOutcome, SendError> {
        match self.policy {
            BackpressurePolicy::Block => {
                self.tx
                    .send(delta.to_string())
                    .await
                    .map_err(|_| SendError::Closed)?;
                Ok(SendOutcome::Sent)
            }
            BackpressurePolicy::DropNew => match self.tx.try_send(delta.to_string()) {
                Ok(()) => Ok(SendOutcome::Sent),
                Err(TrySendError::Full(_)) => Ok(SendOutcome::Dropped),
                Err(TrySendError::Closed(_)) => Err(SendError::Closed),
            },
            BackpressurePolicy::CoalesceLocal => self.send_coalesce_local(delta),
        }
    }

    /// Send any locally buffered text, awaiting capacity.
    pub async fn flush(&mut self) -> Result<SendOutcome, SendError> {
        if self.local_buf.is_empty() {
            return Ok(SendOutcome::Sent);
        }
        let buf = std::mem::take(&mut self.local_buf);
        self.tx.send(buf).await.map_err(|_| SendError::Closed)?;
        Ok(SendOutcome::Sent)
    }

    fn send_coalesce_local(&mut self, delta: &str) -> Result<SendOutcome, SendError> {
        self.local_buf.push_str(delta);
        let ripe =
            self.local_buf.len() >= self.local_max_bytes || self.local_buf.contains('\n');
        if !ripe {
            return Ok(SendOutcome::Buffered);
        }
        match self.tx.try_send(std::mem::take(&mut self.local_buf)) {
            Ok(()) => Ok(SendOutcome::Sent),
            Err(TrySendError::Full(s)) => {
                self.local_buf = s;
                Ok(SendOutcome::Buffered)
            }
            Err(TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushReason {
    Newline,
    MaxDelay,
    MaxBytes,
    ChannelClosed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoalescedChunk {
    pub text: String,
    pub reason: FlushReason,
    /// Input messages merged into this chunk.
    pub merged_messages: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoalesceStats {
    pub total_in_messages: u64,
    pub total_out_chunks: u64,
    pub total_out_bytes: u64,
    pub last_reason: Option<FlushReason>,
    pub last_merged_messages: usize,
    pub last_bytes: usize,
}

impl CoalesceStats {
    fn record_flush(&mut self, reason: FlushReason, merged: usize, bytes: usize) {
        self.total_in_messages = self.total_in_messages.saturating_add(merged as u64);
        self.total_out_chunks = self.total_out_chunks.saturating_add(1);
        self.total_out_bytes = self.total_out_bytes.saturating_add(bytes as u64);
        self.last_reason = Some(reason);
        self.last_merged_messages = merged;
        self.last_bytes = bytes;
    }
}

/// Receiver wrapper that merges high-frequency deltas into fewer chunks.
pub struct CoalescingReceiver {
    rx: mpsc::Receiver<String>,
    opts: CoalesceOptions,
    buf: String,
    deadline: Option<Instant>,
    stats: CoalesceStats,
}

impl CoalescingReceiver {
    pub fn new(rx: mpsc::Receiver<String>, opts: CoalesceOptions) -> Self {
        Self {
            rx,
            opts,
            buf: String::new(),
            deadline: None,
            stats: CoalesceStats::default(),
        }
    }

    pub fn set_options(&mut self, opts: CoalesceOptions) {
        self.opts = opts;
        // Buffered text stays; the deadline restarts under the new policy.
        if !self.buf.is_empty() {
            self.deadline = Some(Instant::now() + self.opts.max_delay);
        }
    }

    pub fn options(&self) -> CoalesceOptions {
        self.opts
    }

    pub fn stats(&self) -> CoalesceStats {
        self.stats
    }

    /// Receive the next coalesced chunk.
    ///
    /// Returns `None` once the channel is closed and the buffer is empty; a
    /// final buffered chunk is delivered before that.
    pub async fn recv(&mut self) -> Option<String> {
        self.recv_with_meta().await.map(|c| c.text)
    }

    pub async fn recv_with_meta(&mut self) -> Option<CoalescedChunk> {
        let mut merged = 0usize;

        if self.buf.is_empty() {
            let first = self.rx.recv().await?;
            self.buf.push_str(&first);
            merged += 1;
            self.deadline = Some(Instant::now() + self.opts.max_delay);
        }

        loop {
            if let Some(reason) = self.ripe_reason() {
                return Some(self.flush(reason, merged));
            }

            let Some(deadline) = self.deadline else {
                self.deadline = Some(Instant::now() + self.opts.max_delay);
                continue;
            };

            match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(s)) => {
                    self.buf.push_str(&s);
                    merged += 1;
                }
                Ok(None) => {
                    if self.buf.is_empty() {
                        return None;
                    }
                    return Some(self.flush(FlushReason::ChannelClosed, merged));
                }
                Err(_) => {
                    return Some(self.flush(FlushReason::MaxDelay, merged));
                }
            }
        }
    }

    fn ripe_reason(&self) -> Option<FlushReason> {
        if self.buf.len() >= self.opts.max_bytes {
            return Some(FlushReason::MaxBytes);
        }
        if self.opts.flush_on_newline && self.buf.contains('\n') {
            return Some(FlushReason::Newline);
        }
        None
    }

    fn flush(&mut self, reason: FlushReason, merged_messages: usize) -> CoalescedChunk {
        self.deadline = None;
        let text = std::mem::take(&mut self.buf);
        self.stats.record_flush(reason, merged_messages, text.len());
        CoalescedChunk {
            text,
            reason,
            merged_messages,
        }
    }
}

/// Owned display update emitted by the view actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentPatch {
    /// Leading display slots unchanged since the previous patch.
    pub reused: usize,
    /// Replacement display blocks for every slot from `reused` on.
    pub blocks: Vec<String>,
}

/// Spawn a task that owns a [`DocumentView`] and emits owned patches.
///
/// A renderer applies a patch by truncating its block list to `reused` and
/// appending `blocks`. Parsing and completion stay off the render thread.
pub fn spawn_view_actor(
    rx: mpsc::Receiver<String>,
    coalesce: CoalesceOptions,
    complete: CompleteOptions,
) -> mpsc::Receiver<DocumentPatch> {
    let (tx_out, rx_out) = mpsc::channel::<DocumentPatch>(64);

    tokio::spawn(async move {
        let mut view = DocumentView::with_options(complete);
        let mut rx = CoalescingReceiver::new(rx, coalesce);
        while let Some(chunk) = rx.recv().await {
            let update = view.push_str(&chunk);
            let patch = DocumentPatch {
                reused: update.reused,
                blocks: view.display_blocks()[update.reused..].to_vec(),
            };
            if tx_out.send(patch).await.is_err() {
                return;
            }
        }
    });

    rx_out
}
