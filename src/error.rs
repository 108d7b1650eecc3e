//! Error types for the object store.
//!
//! Every failure is returned to the caller; nothing in the library exits the process.

use thiserror::Error;

/// Result type alias using ObjectError
pub type Result<T> = std::result::Result<T, ObjectError>;

/// Errors surfaced by the codec, the store and the tree decoder.
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("cannot initialize store: {0}")]
    StoreInit(String),

    #[error("invalid object address '{0}': expected 40 hex characters")]
    InvalidAddress(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("corrupt object {address}: {reason}")]
    CorruptObject { address: String, reason: String },

    #[error("malformed object frame: {0}")]
    MalformedFrame(String),

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
