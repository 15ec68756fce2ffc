//! # Adaptiv Audit
//!
//! Bounded trail of capability writes.
//!
//! Every change applied to an asset's advertised capability, whether driven
//! by a policy rule or by an operator override, is recorded with the value
//! it replaced and the reason it happened. The trail keeps the most recent
//! entries only; older entries are evicted first.
//!
//! ## Key Components
//!
//! - [`AuditEntry`]: One applied write
//! - [`AuditRecorder`]: Thread-safe ring buffer of entries
//! - [`AuditQuery`]: Filter by asset, path, action, or time

#![deny(unsafe_code)]

pub mod entry;
pub mod error;
pub mod query;
pub mod recorder;

pub use entry::{AuditAction, AuditEntry, AuditEntryBuilder};
pub use error::{AuditError, Result};
pub use query::{AuditQuery, AuditQueryBuilder};
pub use recorder::{AuditRecorder, DEFAULT_CAPACITY};
