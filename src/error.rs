use std::io;
use std::path::PathBuf;

use crate::lock::LockError;

/// Coarse classification of a [`StoreError`].
///
/// Callers branch on this rather than on individual variants: a missing
/// fragment, a rejected argument, and everything that went wrong below the
/// store (I/O, corrupt documents, lock poisoning).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    StorageFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No fragment with this id exists in the collection.
    #[error("fragment {id} not found in collection {collection}")]
    NotFound { collection: String, id: String },

    /// Rejected before any I/O took place.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading, writing or renaming a document failed.
    #[error("storage failure at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A document could not be parsed or holds data violating a store invariant.
    #[error("corrupt document at {}: {detail}", .path.display())]
    Corrupt { path: PathBuf, detail: String },

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StoreError::Storage { .. } | StoreError::Corrupt { .. } | StoreError::Lock(_) => {
                ErrorKind::StorageFailure
            }
        }
    }

    pub(crate) fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
