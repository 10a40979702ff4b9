use std::path::PathBuf;

use capability::{names, FaultKind, ProviderFault};
use thiserror::Error;

/// Failure to open a [`crate::FileRecordStore`].
#[derive(Debug, Error)]
#[error("cannot use '{}' as a record directory: {source}", path.display())]
pub struct OpenError {
    /// Directory that was requested.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

/// Everything that can go wrong while touching one record file.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("{operation} '{}' failed: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' does not hold a valid record: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' holds the record for key '{found}'", path.display())]
    WrongKey { path: PathBuf, found: String },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Strips file-system detail, keeping only a [`FaultKind`] and a message.
    ///
    /// The message names the operation but never the absolute path.
    pub(crate) fn into_fault(self) -> ProviderFault {
        match self {
            Self::Io {
                operation, source, ..
            } => ProviderFault::new(
                names::RECORD_STORE,
                FaultKind::Unavailable,
                format!("{operation} failed ({})", source.kind()),
            ),
            Self::Corrupt { .. } => {
                ProviderFault::malformed(names::RECORD_STORE, "stored record could not be parsed")
            }
            Self::WrongKey { found, .. } => ProviderFault::malformed(
                names::RECORD_STORE,
                format!("stored record belongs to key '{found}'"),
            ),
        }
    }
}
