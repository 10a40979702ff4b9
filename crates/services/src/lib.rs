//! Seam consumer services.
//!
//! Business operations written purely against the [`capability`] traits.
//! Every service receives its providers at construction time as
//! `Arc<dyn Trait>` and never names a concrete provider type, so the same
//! code runs against the HTTP/disk providers in production and the
//! `substitutes` crate in tests.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Services sequence capability calls and add the
//! small amount of local logic around them (input checks, fallbacks). Faults
//! from providers are passed through as [`ServiceError::Provider`]; nothing
//! here retries or swallows them.
//!
//! | Service | Capabilities used |
//! |---------|-------------------|
//! | [`UserService`] | `UserDirectory` |
//! | [`RecordService`] | `RecordStore` |
//! | [`NotificationService`] | `Notifier` |
//! | [`OnboardingService`] | all three, through the services above |

mod errors;
mod notifications;
mod onboarding;
mod records;
mod users;

pub use errors::ServiceError;
pub use notifications::NotificationService;
pub use onboarding::{OnboardingOutcome, OnboardingService};
pub use records::RecordService;
pub use users::UserService;
