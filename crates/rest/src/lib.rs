//! Seam HTTP infrastructure adapter.
//!
//! Implements the [`capability::UserDirectory`] and [`capability::Notifier`]
//! traits over JSON/HTTP with `reqwest`. Additional HTTP-backed providers are
//! added as new types in this crate without any change to `capability`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, URL construction, status-code
//! interpretation and response parsing all live here. Consumers see only the
//! capability traits and [`capability::ProviderFault`]; no `reqwest` type
//! crosses the trait boundary.
//!
//! Nothing here retries. A failed exchange is logged at `warn` with its full
//! transport detail and returned to the caller as a fault.

mod client;
mod error;
mod notifier;
mod users;

#[cfg(test)]
mod test_support;

pub use client::HttpSettings;
pub use error::SetupError;
pub use notifier::{WebhookNotifier, DELIVERY_ID_HEADER};
pub use reqwest::Url;
pub use users::RestUserDirectory;
