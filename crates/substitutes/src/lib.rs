//! Seam substitute providers.
//!
//! In-process implementations of every [`capability`] trait, for deterministic
//! tests and for running the `seam` binary without any backing resource.
//!
//! Each substitute:
//!
//! - records every call it receives so tests can assert on the inputs it saw;
//! - returns pre-programmed results, falling back to the trait's defined
//!   absence result for anything it was not told about;
//! - can be told to fail, for all inputs or for one input, with any
//!   [`capability::ProviderFault`].
//!
//! Programming methods take `&self`, so a substitute can be reprogrammed after
//! it has been handed to a consumer behind an `Arc`.

mod call_log;
mod notifier;
mod records;
mod users;

pub use call_log::{CallLog, FaultPlan};
pub use notifier::RecordingNotifier;
pub use records::{InMemoryRecordStore, RecordStoreCall};
pub use users::FakeUserDirectory;
