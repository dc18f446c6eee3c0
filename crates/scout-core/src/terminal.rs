//! Append-only console log shared by every component.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

const TAIL_CAPACITY: usize = 256;

/// One immutable console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEntry {
    pub at: DateTime<Utc>,
    pub line: String,
}

/// Cheaply cloneable handle to the session log.
///
/// Entries are never removed or edited. Appends are serialized, so the
/// stored order and the order seen by tail subscribers agree.
#[derive(Debug, Clone)]
pub struct TerminalLog {
    entries: Arc<Mutex<Vec<TerminalEntry>>>,
    tail: broadcast::Sender<TerminalEntry>,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLog {
    pub fn new() -> Self {
        let (tail, _) = broadcast::channel(TAIL_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            tail,
        }
    }

    /// A log seeded with an initial banner line.
    pub fn with_banner(banner: impl Into<String>) -> Self {
        let log = Self::new();
        log.append(banner);
        log
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TerminalEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, line: impl Into<String>) {
        let entry = TerminalEntry {
            at: Utc::now(),
            line: line.into(),
        };
        let mut entries = self.lock();
        tracing::info!(target: "scout::terminal", "{}", entry.line);
        entries.push(entry.clone());
        // No subscribers is fine; the stored log is authoritative.
        let _ = self.tail.send(entry);
    }

    /// Receive every entry appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TerminalEntry> {
        self.tail.subscribe()
    }

    /// Follow the whole log from its first entry.
    ///
    /// Entries are read from the stored log, so a reader that falls behind
    /// the broadcast buffer still sees every line. The tail ends once every
    /// `TerminalLog` handle is dropped and the stored entries are drained.
    pub fn tail(&self) -> TerminalTail {
        TerminalTail {
            wake: self.tail.subscribe(),
            entries: Arc::clone(&self.entries),
            next: 0,
            closed: false,
        }
    }

    pub fn entries(&self) -> Vec<TerminalEntry> {
        self.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whole log as the console shows it, one entry per line.
    pub fn transcript(&self) -> String {
        self.lines().join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|e| e.line.contains(needle))
    }

    /// Index of the first entry containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.lock().iter().position(|e| e.line.contains(needle))
    }
}

/// Ordered reader over a [`TerminalLog`]; see [`TerminalLog::tail`].
pub struct TerminalTail {
    wake: broadcast::Receiver<TerminalEntry>,
    entries: Arc<Mutex<Vec<TerminalEntry>>>,
    next: usize,
    closed: bool,
}

impl TerminalTail {
    pub async fn next(&mut self) -> Option<TerminalEntry> {
        loop {
            let stored = self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .get(self.next)
                .cloned();
            if let Some(entry) = stored {
                self.next += 1;
                return Some(entry);
            }
            if self.closed {
                return None;
            }
            match self.wake.recv().await {
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Terminal tail caught up from stored log");
                }
                Err(broadcast::error::RecvError::Closed) => self.closed = true,
            }
        }
    }
}
