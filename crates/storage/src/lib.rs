//! Seam disk infrastructure adapter.
//!
//! Implements the [`capability::RecordStore`] trait on the local file system
//! with `tokio::fs`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File layout, atomic replacement, and JSON encoding live
//! here. Consumers see only [`capability::RecordStore`]; I/O and parse errors
//! are logged with their paths and then reduced to a
//! [`capability::ProviderFault`] that carries neither.

mod error;
mod file_store;

pub use error::OpenError;
pub use file_store::FileRecordStore;
