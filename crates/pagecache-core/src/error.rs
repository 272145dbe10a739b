use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    pub fn invalid_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, origin, message)
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(
            ErrorClass::UnknownField,
            ErrorOrigin::Filter,
            format!("no resolver registered for field `{field}`"),
        )
    }

    pub fn resolver_type_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Self::new(
            ErrorClass::ResolverTypeMismatch,
            ErrorOrigin::Filter,
            format!("field `{field}` expected a {expected} value but resolver produced {found}"),
        )
    }

    pub fn source_failure(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::SourceFailure, origin, message)
    }

    pub fn snapshot_null(part: &str) -> Self {
        Self::new(
            ErrorClass::SnapshotNull,
            ErrorOrigin::Snapshot,
            format!("snapshot is missing its `{part}` part"),
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    UnknownField,
    ResolverTypeMismatch,
    SourceFailure,
    SnapshotNull,
    ProgressDrift,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::UnknownField => "unknown_field",
            Self::ResolverTypeMismatch => "resolver_type_mismatch",
            Self::SourceFailure => "source_failure",
            Self::SnapshotNull => "snapshot_null",
            Self::ProgressDrift => "progress_drift",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Filter,
    Store,
    PageMap,
    Prefetch,
    Fetch,
    Manager,
    Snapshot,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Filter => "filter",
            Self::Store => "store",
            Self::PageMap => "page_map",
            Self::Prefetch => "prefetch",
            Self::Fetch => "fetch",
            Self::Manager => "manager",
            Self::Snapshot => "snapshot",
        };
        write!(f, "{label}")
    }
}
