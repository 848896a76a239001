//! Append-only activity log.
//!
//! Both the registry and the dispatch engine keep one of these. Entries are
//! timestamped with the local clock and BLAKE3-chained to their predecessor,
//! so an edited or reordered entry fails [`ActivityLog::verify_chain`].
//! The log is bounded: once `capacity` is reached the oldest entry is dropped.

use chrono::{Local, NaiveDateTime};
use std::collections::VecDeque;
use std::fmt;

/// Timestamp layout used when rendering entries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 500;

/// One timestamped log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Position since the log was created (survives eviction)
    pub sequence: u64,
    /// Local wall-clock time of the entry
    pub timestamp: NaiveDateTime,
    /// Free-form message
    pub message: String,
    /// Hash of the previous entry (all zeros for the first one)
    pub prev_hash: [u8; 32],
    /// BLAKE3 over sequence, timestamp, message and `prev_hash`
    pub hash: [u8; 32],
}

impl LogEntry {
    fn new(sequence: u64, timestamp: NaiveDateTime, message: String, prev_hash: [u8; 32]) -> Self {
        let mut entry = Self {
            sequence,
            timestamp,
            message,
            prev_hash,
            hash: [0u8; 32],
        };
        entry.hash = entry.compute_hash();
        entry
    }

    /// Recompute the hash of this entry
    pub fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.sequence.to_le_bytes());
        hasher.update(&self.timestamp.and_utc().timestamp_millis().to_le_bytes());
        hasher.update(self.message.as_bytes());
        hasher.update(&self.prev_hash);
        *hasher.finalize().as_bytes()
    }

    /// Hex form of the entry hash
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.message
        )
    }
}

/// Bounded, append-only, hash-chained activity log
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_sequence: u64,
    head_hash: [u8; 32],
}

impl ActivityLog {
    /// Create a log retaining at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_sequence: 0,
            head_hash: [0u8; 32],
        }
    }

    /// Append a message stamped with the current local time
    pub fn record(&mut self, message: impl Into<String>) -> &LogEntry {
        self.record_at(message, Local::now().naive_local())
    }

    /// Append a message with an explicit timestamp
    pub fn record_at(&mut self, message: impl Into<String>, timestamp: NaiveDateTime) -> &LogEntry {
        let entry = LogEntry::new(self.next_sequence, timestamp, message.into(), self.head_hash);
        self.next_sequence += 1;
        self.head_hash = entry.hash;
        self.entries.push_back(entry);

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        // just pushed, so never empty
        &self.entries[self.entries.len() - 1]
    }

    /// The newest `count` entries, oldest first
    pub fn tail(&self, count: usize) -> Vec<&LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).collect()
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries ever appended, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }

    /// Hash of the newest entry
    pub fn head_hash(&self) -> [u8; 32] {
        self.head_hash
    }

    /// Check every retained entry hashes correctly and links to its predecessor.
    ///
    /// The oldest retained entry's `prev_hash` is trusted as-is since its
    /// predecessor may have been evicted.
    pub fn verify_chain(&self) -> bool {
        let mut prev: Option<&LogEntry> = None;
        for entry in &self.entries {
            if entry.compute_hash() != entry.hash {
                return false;
            }
            if let Some(p) = prev {
                if entry.prev_hash != p.hash || entry.sequence != p.sequence + 1 {
                    return false;
                }
            }
            prev = Some(entry);
        }
        prev.map_or(true, |last| last.hash == self.head_hash)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_entry_display() {
        let mut log = ActivityLog::new(10);
        let entry = log.record_at("Incident FIRE-001 registered", at(9, 5, 7));

        assert_eq!(
            entry.to_string(),
            "[2025-03-14 09:05:07] Incident FIRE-001 registered"
        );
    }

    #[test]
    fn test_tail_returns_newest_oldest_first() {
        let mut log = ActivityLog::new(10);
        for i in 0..6 {
            log.record_at(format!("event {}", i), at(10, 0, i));
        }

        let tail: Vec<_> = log.tail(3).iter().map(|e| e.message.clone()).collect();
        assert_eq!(tail, vec!["event 3", "event 4", "event 5"]);

        assert_eq!(log.tail(100).len(), 6);
        assert!(log.tail(0).is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = ActivityLog::new(3);
        for i in 0..5 {
            log.record_at(format!("event {}", i), at(11, 0, i));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.total_recorded(), 5);
        assert_eq!(log.entries().next().unwrap().message, "event 2");
        assert!(log.verify_chain());
    }

    #[test]
    fn test_chain_links() {
        let mut log = ActivityLog::default();
        log.record("first");
        log.record("second");

        let entries: Vec<_> = log.entries().collect();
        assert_eq!(entries[0].prev_hash, [0u8; 32]);
        assert_eq!(entries[1].prev_hash, entries[0].hash);
        assert_eq!(log.head_hash(), entries[1].hash);
        assert_eq!(entries[1].hash_hex().len(), 64);
        assert!(log.verify_chain());
    }

    #[test]
    fn test_tampering_detected() {
        let mut log = ActivityLog::new(10);
        log.record_at("Unit F-01 registered", at(8, 0, 0));
        log.record_at("Unit A-01 registered", at(8, 0, 1));

        log.entries[0].message = "Unit F-99 registered".to_string();
        assert!(!log.verify_chain());
    }

    #[test]
    fn test_empty_log_verifies() {
        let log = ActivityLog::new(0);
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 1);
        assert!(log.verify_chain());
    }
}
