//! Bounded in-memory audit trail

use std::collections::VecDeque;

use adaptiv_types::AssetId;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::entry::AuditEntry;
use crate::query::AuditQuery;

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 1000;

/// FIFO ring buffer of audit entries.
///
/// Append and eviction happen under one lock, so concurrent writers never
/// observe more than `capacity` entries.
#[derive(Debug)]
pub struct AuditRecorder {
    entries: Mutex<VecDeque<AuditEntry>>,
    capacity: usize,
}

impl AuditRecorder {
    /// Create a recorder. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn record(&self, entry: AuditEntry) {
        debug!(
            asset_id = %entry.asset_id,
            action = %entry.action,
            path = %entry.path,
            new_value = %entry.new_value,
            "Recording audit entry"
        );

        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most recent `limit` entries, optionally for one asset, oldest first
    pub fn query(&self, asset_id: Option<&AssetId>, limit: usize) -> Vec<AuditEntry> {
        let query = AuditQuery {
            asset_id: asset_id.cloned(),
            limit: Some(limit),
            ..AuditQuery::default()
        };
        self.search(&query)
    }

    /// Entries matching an arbitrary query, oldest first
    pub fn search(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let entries = self.entries.lock();
        query.apply(entries.iter())
    }

    /// Snapshot of every entry, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "Cleared audit trail");
    }
}

impl Default for AuditRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditAction;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn entry(asset: &str, value: usize) -> AuditEntry {
        AuditEntry::builder()
            .asset_id(asset)
            .action(AuditAction::Patch)
            .path("Capabilities/ProcessCapability:Milling/SurfaceFinishGrade")
            .new_value(value.to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_capacity() {
        let recorder = AuditRecorder::default();
        assert_eq!(recorder.capacity(), 1000);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let recorder = AuditRecorder::new(3);
        for i in 0..4 {
            recorder.record(entry("m", i));
        }

        let values: Vec<String> = recorder.entries().into_iter().map(|e| e.new_value).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_query_filters_and_limits() {
        let recorder = AuditRecorder::default();
        for i in 0..10 {
            recorder.record(entry(if i % 2 == 0 { "a" } else { "b" }, i));
        }

        let a = AssetId::new("a");
        let recent: Vec<String> = recorder
            .query(Some(&a), 2)
            .into_iter()
            .map(|e| e.new_value)
            .collect();
        assert_eq!(recent, vec!["6", "8"]);

        assert_eq!(recorder.query(None, 100).len(), 10);
        assert_eq!(recorder.query(Some(&AssetId::new("c")), 5).len(), 0);
    }

    #[test]
    fn test_clear() {
        let recorder = AuditRecorder::new(5);
        recorder.record(entry("m", 1));
        recorder.clear();
        assert_eq!(recorder.len(), 0);
    }

    #[test]
    fn test_concurrent_writers_respect_capacity() {
        let recorder = Arc::new(AuditRecorder::new(50));
        std::thread::scope(|scope| {
            for t in 0..8 {
                let recorder = Arc::clone(&recorder);
                scope.spawn(move || {
                    for i in 0..100 {
                        recorder.record(entry(&format!("asset-{t}"), i));
                    }
                });
            }
        });
        assert_eq!(recorder.len(), 50);
    }

    proptest! {
        #[test]
        fn ring_keeps_newest_capacity_entries(capacity in 1usize..20, writes in 0usize..60) {
            let recorder = AuditRecorder::new(capacity);
            for i in 0..writes {
                recorder.record(entry("m", i));
            }

            let kept: Vec<usize> = recorder
                .entries()
                .iter()
                .map(|e| e.new_value.parse().unwrap())
                .collect();
            let expected: Vec<usize> = (writes.saturating_sub(capacity)..writes).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
