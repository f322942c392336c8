//! Directory service error types.
//!
//! The directory service is the chat platform holding the live guild state.
//! `Unavailable` and `Timeout` on a read abort the pass; `OperationFailed` is
//! raised per mutated item.

/// Kinds of directory service errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DirectoryErrorKind {
    /// A read against the platform failed at the transport level
    #[display("Directory unavailable: {}", _0)]
    Unavailable(String),
    /// A single mutation (nickname, role, emoji) was rejected
    #[display("Directory operation '{}' failed for '{}': {}", operation, target, reason)]
    OperationFailed {
        /// Operation name, e.g. `edit_role`
        operation: String,
        /// Item the operation targeted
        target: String,
        /// Platform-supplied reason
        reason: String,
    },
    /// A directory read exceeded the configured timeout
    ///
    /// Mutations that time out are reported as `OperationFailed` instead.
    #[display("Directory read '{}' timed out after {}s", operation, seconds)]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Timeout that elapsed
        seconds: u64,
    },
    /// An identifier could not be interpreted by the platform
    #[display("Invalid identifier: {}", _0)]
    InvalidId(String),
}

/// Directory service error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Directory Error: {} at line {} in {}", kind, line, file)]
pub struct DirectoryError {
    /// The kind of error that occurred
    pub kind: DirectoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DirectoryError {
    /// Create a new directory error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DirectoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a failed mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncbot_error::{DirectoryError, DirectoryErrorKind};
    ///
    /// let err = DirectoryError::operation("delete_role", "vip", "Missing Permissions");
    /// assert!(matches!(err.kind, DirectoryErrorKind::OperationFailed { .. }));
    /// ```
    #[track_caller]
    pub fn operation(
        operation: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(DirectoryErrorKind::OperationFailed {
            operation: operation.into(),
            target: target.into(),
            reason: reason.into(),
        })
    }
}

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
