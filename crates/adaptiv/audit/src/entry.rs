//! Audit entry types

use std::fmt;

use adaptiv_types::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuditError, Result};

/// Kind of capability write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Write triggered by a policy rule
    Patch,

    /// Operator override
    ManualPatch,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Patch => "PATCH",
            AuditAction::ManualPatch => "MANUAL_PATCH",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied capability write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: Uuid,

    /// When the write was applied
    pub timestamp: DateTime<Utc>,

    /// Asset whose capability changed
    pub asset_id: AssetId,

    /// Policy-driven or manual
    pub action: AuditAction,

    /// Capability element path
    pub path: String,

    /// Value before the write, when known
    pub old_value: Option<String>,

    /// Value written
    pub new_value: String,

    /// Human-readable cause, e.g. `Health index = 72`
    pub reason: String,
}

impl AuditEntry {
    /// Create a new audit entry builder
    pub fn builder() -> AuditEntryBuilder {
        AuditEntryBuilder::new()
    }

    /// Entry for a write made by a policy rule
    pub fn policy_patch(
        asset_id: AssetId,
        path: impl Into<String>,
        old_value: Option<String>,
        new_value: impl Into<String>,
        health_index: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            asset_id,
            action: AuditAction::Patch,
            path: path.into(),
            old_value,
            new_value: new_value.into(),
            reason: format!("Health index = {health_index}"),
        }
    }

    /// Entry for an operator override
    pub fn manual_patch(
        asset_id: AssetId,
        path: impl Into<String>,
        old_value: Option<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            asset_id,
            action: AuditAction::ManualPatch,
            path: path.into(),
            old_value,
            new_value: new_value.into(),
            reason: "Manual admin override".to_string(),
        }
    }
}

/// Builder for audit entries
#[derive(Debug, Default)]
pub struct AuditEntryBuilder {
    timestamp: Option<DateTime<Utc>>,
    asset_id: Option<AssetId>,
    action: Option<AuditAction>,
    path: Option<String>,
    old_value: Option<String>,
    new_value: Option<String>,
    reason: Option<String>,
}

impl AuditEntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timestamp (defaults to now)
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn asset_id(mut self, asset_id: impl Into<AssetId>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn old_value(mut self, old_value: impl Into<String>) -> Self {
        self.old_value = Some(old_value.into());
        self
    }

    pub fn new_value(mut self, new_value: impl Into<String>) -> Self {
        self.new_value = Some(new_value.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Build the entry; the reason defaults to empty
    pub fn build(self) -> Result<AuditEntry> {
        Ok(AuditEntry {
            id: Uuid::new_v4(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            asset_id: self.asset_id.ok_or(AuditError::MissingField("asset_id"))?,
            action: self.action.ok_or(AuditError::MissingField("action"))?,
            path: self.path.ok_or(AuditError::MissingField("path"))?,
            old_value: self.old_value,
            new_value: self.new_value.ok_or(AuditError::MissingField("new_value"))?,
            reason: self.reason.unwrap_or_default(),
        })
    }
}
