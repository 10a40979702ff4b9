//! Core domain for Seam.
//!
//! This crate contains every identifier, value type, and capability trait that
//! consumers and providers share. Provider crates implement the traits defined
//! here; consumer crates call them. Neither side adds rules to this crate.
//!
//! ## Architectural Layer
//!
//! **Port definitions.** This crate has no I/O dependencies.
//! It defines *what* a consumer needs; provider crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`UserId`, `RecordKey`, `DeliveryId`, etc.) |
//! | [`types`] | Request and result values (`User`, `Record`, `Notification`, etc.) |
//! | [`errors`] | [`ProviderFault`], the single failure indicator |
//! | [`ports`] | The capability traits (`UserDirectory`, `RecordStore`, `Notifier`) |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{FaultKind, ProviderFault};
pub use identifiers::{DeliveryId, Recipient, RecordKey, UserId};
pub use ports::{names, Notifier, RecordStore, UserDirectory};
pub use types::{
    AlertSeverity, Notification, NotificationKind, NotificationMessage, Record, Timestamp, User,
};
