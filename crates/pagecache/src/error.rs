use pagecache_core::error::{ErrorClass as CoreErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable class + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self {
            class: err.class.into(),
            origin: err.origin.into(),
            message: err.message,
        }
    }
}

///
/// ErrorClass
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorClass {
    InvalidArgument,
    UnknownField,
    ResolverTypeMismatch,
    SourceFailure,
    SnapshotNull,
    ProgressDrift,
    Internal,
}

impl From<CoreErrorClass> for ErrorClass {
    fn from(class: CoreErrorClass) -> Self {
        match class {
            CoreErrorClass::InvalidArgument => Self::InvalidArgument,
            CoreErrorClass::UnknownField => Self::UnknownField,
            CoreErrorClass::ResolverTypeMismatch => Self::ResolverTypeMismatch,
            CoreErrorClass::SourceFailure => Self::SourceFailure,
            CoreErrorClass::SnapshotNull => Self::SnapshotNull,
            CoreErrorClass::ProgressDrift => Self::ProgressDrift,
            CoreErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Filter,
    Store,
    PageMap,
    Prefetch,
    Fetch,
    Manager,
    Snapshot,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Filter => Self::Filter,
            CoreErrorOrigin::Store => Self::Store,
            CoreErrorOrigin::PageMap => Self::PageMap,
            CoreErrorOrigin::Prefetch => Self::Prefetch,
            CoreErrorOrigin::Fetch => Self::Fetch,
            CoreErrorOrigin::Manager => Self::Manager,
            CoreErrorOrigin::Snapshot => Self::Snapshot,
        }
    }
}
