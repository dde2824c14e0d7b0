use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error kinds surfaced by the clustering engine.
///
/// The taxonomy is flat: every fallible operation reports exactly one of
/// these, there are no nested causes beyond the captured I/O source, and no
/// operation retries. Batch operations are all-or-nothing; the first error
/// fails the whole call.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A file could not be opened for reading or writing.
    #[error("unable to access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A point's coordinate count does not match the expected dimension.
    /// Prediction against an empty model reports `expected: 0`.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    /// A blank or malformed line was found while parsing a dataset or model
    /// file. `line` is 1-based.
    #[error("malformed input at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The fit configuration cannot be applied to the given dataset.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
