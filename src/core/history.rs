/// Recency buffer: the most recent generated messages, per recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ring::RingBuffer;

/// Recipient name that matches every record in [`RecencyBuffer::query`].
pub const ALL_RECIPIENTS: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub recipient: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RecencyBuffer {
    ring: RingBuffer<HistoryRecord>,
}

impl RecencyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: RingBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.ring.push(record);
    }

    /// Held records, oldest first.
    pub fn get_all(&self) -> Vec<HistoryRecord> {
        self.ring.to_vec()
    }

    pub fn has(&self, record: &HistoryRecord) -> bool {
        self.ring.contains(record)
    }

    /// Records for `recipient`, oldest first, compared case-insensitively.
    /// `"*"` returns every record.
    pub fn query(&self, recipient: &str) -> Vec<HistoryRecord> {
        if recipient == ALL_RECIPIENTS {
            return self.get_all();
        }
        let wanted = recipient.to_lowercase();
        self.ring
            .iter()
            .filter(|r| r.recipient.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    /// The `n` newest records, oldest first.
    pub fn latest(&self, n: usize) -> Vec<HistoryRecord> {
        let skip = self.ring.len().saturating_sub(n);
        self.ring.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }
}
