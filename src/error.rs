//! Error types for admission validation.
//!
//! Validation failures are not errors: they are reported as diagnostics on a
//! [`Decision`](crate::webhooks::Decision). The variants here cover the cases
//! where a policy could not be evaluated at all.

use thiserror::Error;

use crate::webhooks::Diagnostic;

/// Error type for admission validation
#[derive(Error, Debug)]
pub enum Error {
    /// The incoming object could not be converted to its unstructured form
    #[error("failed to convert new {kind} to unstructured object: {source}")]
    ConvertNew {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored object could not be converted to its unstructured form
    #[error("failed to convert old {kind} to unstructured object: {source}")]
    ConvertOld {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// An admission payload could not be decoded into the typed resource
    #[error("failed to decode {kind} from admission request: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The admission request did not carry an object the operation requires
    #[error("missing {0} in admission request")]
    MissingObject(&'static str),
}

impl Error {
    /// Wrap this error into an `InternalError` diagnostic at the root path.
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::internal_error(&self)
    }
}

/// Result type alias for admission validation
pub type Result<T> = std::result::Result<T, Error>;
