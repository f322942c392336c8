//! Desired-state store error types.

/// Kinds of desired-state store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// The store could not be reached or the key is absent
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
    /// A snapshot record could not be decoded or violates key uniqueness
    #[display("Malformed snapshot under '{}': {}", key, reason)]
    MalformedSnapshot {
        /// Store key holding the bad record
        key: String,
        /// What was wrong with it
        reason: String,
    },
    /// A store call exceeded the configured timeout
    #[display("Store call timed out after {}s: {}", seconds, operation)]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Timeout that elapsed
        seconds: u64,
    },
}

/// Desired-state store error with location tracking.
///
/// # Examples
///
/// ```
/// use syncbot_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::MalformedSnapshot {
///     key: "syncbot:users".to_string(),
///     reason: "expected a JSON array".to_string(),
/// });
/// assert!(format!("{}", err).contains("syncbot:users"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a malformed record under `key`.
    #[track_caller]
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::MalformedSnapshot {
            key: key.into(),
            reason: reason.into(),
        })
    }
}

/// Result type for desired-state store operations.
pub type StoreResult<T> = Result<T, StoreError>;
