//! Fire-and-forget remote writes.
//!
//! Each write runs on its own tokio task. Mutations never wait on them;
//! outcomes are collected from a channel when the caller settles up.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::write::RemoteWrite;
use crate::remote::RestClient;

#[derive(Debug)]
struct WriteOutcome {
    seq: u64,
    error: Option<String>,
}

/// A write that did not reach the backend.
#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub write: RemoteWrite,
    pub error: String,
}

pub struct SyncDispatcher {
    client: RestClient,
    tx: mpsc::UnboundedSender<WriteOutcome>,
    rx: mpsc::UnboundedReceiver<WriteOutcome>,
    pending: HashMap<u64, RemoteWrite>,
    next_seq: u64,
}

impl SyncDispatcher {
    pub fn new(client: RestClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            tx,
            rx,
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Spawn `write` onto the runtime and return immediately.
    pub fn dispatch(&mut self, write: RemoteWrite) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(seq, write.clone());

        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(seq, write = %write.describe(), "remote write dispatched");
        tokio::spawn(async move {
            let error = write.apply(&client).await.err().map(|e| e.to_string());
            // The receiver only goes away with the dispatcher.
            let _ = tx.send(WriteOutcome { seq, error });
        });
    }

    /// Collect outcomes that have already arrived without waiting.
    pub fn poll(&mut self) -> Vec<FailedWrite> {
        let mut failed = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            self.settle(outcome, &mut failed);
        }
        failed
    }

    /// Wait up to `timeout` for every in-flight write.
    ///
    /// Returns the writes that failed plus any still unsettled at the
    /// deadline.
    pub async fn finish(&mut self, timeout: Duration) -> Vec<FailedWrite> {
        let mut failed = self.poll();
        let deadline = tokio::time::Instant::now() + timeout;
        while !self.pending.is_empty() {
            match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(outcome)) => self.settle(outcome, &mut failed),
                Ok(None) | Err(_) => break,
            }
        }

        for (_, write) in self.pending.drain() {
            warn!(write = %write.describe(), "remote write still pending at exit");
            failed.push(FailedWrite {
                write,
                error: "timed out".into(),
            });
        }
        failed
    }

    fn settle(&mut self, outcome: WriteOutcome, failed: &mut Vec<FailedWrite>) {
        let Some(write) = self.pending.remove(&outcome.seq) else {
            return;
        };
        match outcome.error {
            None => debug!(seq = outcome.seq, "remote write settled"),
            Some(error) => {
                warn!(write = %write.describe(), %error, "remote write failed");
                failed.push(FailedWrite { write, error });
            }
        }
    }
}
