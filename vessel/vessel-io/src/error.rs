//! Error types for skeleton file I/O.

use thiserror::Error;

/// Result type for skeleton I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing skeleton files.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file does not start with a recognized format header.
    #[error("unknown skeleton header: {found:?}")]
    UnknownHeader {
        /// The first token of the file.
        found: String,
    },

    /// A mandatory keyword token was missing or misspelled.
    #[error("expected {expected:?}, found {found:?}")]
    UnexpectedToken {
        /// The keyword that was required here.
        expected: &'static str,
        /// The token actually read.
        found: String,
    },

    /// The token stream ended before the structure was complete.
    #[error("unexpected end of input while reading {reading}")]
    UnexpectedEof {
        /// What was being read when the input ran out.
        reading: &'static str,
    },

    /// A node or branch count was zero or negative.
    #[error("invalid {field} count: {value}")]
    InvalidCount {
        /// Which count was rejected.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// A branch referenced a node outside the node table.
    #[error("node index {index} out of range for {count} nodes")]
    NodeIndex {
        /// The out-of-range index.
        index: u32,
        /// Number of nodes in the table.
        count: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}
