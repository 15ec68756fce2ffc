//! Audit query support

use adaptiv_types::AssetId;
use chrono::{DateTime, Utc};

use crate::entry::{AuditAction, AuditEntry};

/// Filter over the audit trail
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Filter by asset
    pub asset_id: Option<AssetId>,

    /// Filter by capability element path
    pub path: Option<String>,

    /// Filter by action kind
    pub action: Option<AuditAction>,

    /// Filter by time range start (inclusive)
    pub since: Option<DateTime<Utc>>,

    /// Keep only the most recent matches
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn builder() -> AuditQueryBuilder {
        AuditQueryBuilder::default()
    }

    /// Check if an entry matches this query
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref asset_id) = self.asset_id {
            if &entry.asset_id != asset_id {
                return false;
            }
        }

        if let Some(ref path) = self.path {
            if &entry.path != path {
                return false;
            }
        }

        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }

        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }

        true
    }

    /// Apply the query to entries ordered oldest first.
    ///
    /// Results stay oldest first; `limit` keeps the newest matches.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<AuditEntry>
    where
        I: IntoIterator<Item = &'a AuditEntry>,
        I::IntoIter: DoubleEndedIterator,
    {
        let limit = self.limit.unwrap_or(usize::MAX);
        let mut results: Vec<AuditEntry> = entries
            .into_iter()
            .rev()
            .filter(|e| self.matches(e))
            .take(limit)
            .cloned()
            .collect();
        results.reverse();
        results
    }
}

/// Builder for audit queries
#[derive(Debug, Default)]
pub struct AuditQueryBuilder {
    query: AuditQuery,
}

impl AuditQueryBuilder {
    pub fn asset_id(mut self, asset_id: impl Into<AssetId>) -> Self {
        self.query.asset_id = Some(asset_id.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.query.path = Some(path.into());
        self
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.query.action = Some(action);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.query.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn build(self) -> AuditQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entries() -> Vec<AuditEntry> {
        let base = Utc::now();
        (0..6)
            .map(|i| {
                AuditEntry::builder()
                    .timestamp(base + Duration::seconds(i))
                    .asset_id(if i % 2 == 0 { "even" } else { "odd" })
                    .action(if i == 5 {
                        AuditAction::ManualPatch
                    } else {
                        AuditAction::Patch
                    })
                    .path(format!("path-{}", i % 3))
                    .new_value(i.to_string())
                    .build()
                    .unwrap()
            })
            .collect()
    }

    fn values(results: &[AuditEntry]) -> Vec<&str> {
        results.iter().map(|e| e.new_value.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let all = entries();
        assert_eq!(AuditQuery::default().apply(&all).len(), 6);
    }

    #[test]
    fn test_filters_combine() {
        let all = entries();

        let q = AuditQuery::builder().asset_id("even").build();
        assert_eq!(values(&q.apply(&all)), vec!["0", "2", "4"]);

        let q = AuditQuery::builder().asset_id("odd").path("path-2").build();
        assert_eq!(values(&q.apply(&all)), vec!["5"]);

        let q = AuditQuery::builder().action(AuditAction::ManualPatch).build();
        assert_eq!(values(&q.apply(&all)), vec!["5"]);

        let q = AuditQuery::builder().since(all[4].timestamp).build();
        assert_eq!(values(&q.apply(&all)), vec!["4", "5"]);
    }

    #[test]
    fn test_limit_keeps_most_recent_in_order() {
        let all = entries();
        let q = AuditQuery::builder().asset_id("odd").limit(2).build();
        assert_eq!(values(&q.apply(&all)), vec!["3", "5"]);

        let q = AuditQuery::builder().limit(0).build();
        assert!(q.apply(&all).is_empty());
    }
}
