use thiserror::Error;

use crate::data::source::BoxError;

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while walking a container and building
/// output records. Any of these aborts the whole extraction run; no partial
/// record sequence is ever returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The hierarchy revisits a group (cyclic link) or a group's children
    /// cannot be enumerated.
    #[error("malformed hierarchy at '{path}': {reason}")]
    MalformedHierarchy { path: String, reason: String },

    /// Bulk extraction requires every plain leaf to share one shape.
    #[error("dataset '{path}' has shape {actual:?}, expected {expected:?}")]
    InconsistentShapes {
        expected: Vec<usize>,
        actual: Vec<usize>,
        path: String,
    },

    /// A structured leaf could not be decoded as a table.
    #[error("failed to read '{path}' as a table")]
    TabularRead {
        path: String,
        #[source]
        cause: BoxError,
    },

    /// A plain leaf could not be materialized.
    #[error("failed to read dataset '{path}'")]
    DatasetRead {
        path: String,
        #[source]
        cause: BoxError,
    },
}
