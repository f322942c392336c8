//! Emoji asset error types.

use std::path::PathBuf;

/// Kinds of asset errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AssetErrorKind {
    /// No asset exists for the requested name
    #[display("Asset not found for '{}' at {}", name, path.display())]
    NotFound {
        /// Emoji name that was looked up
        name: String,
        /// Path the lookup resolved to
        path: PathBuf,
    },
    /// The asset exists but could not be read
    #[display("Asset unreadable at {}: {}", path.display(), reason)]
    Unreadable {
        /// Path that failed to read
        path: PathBuf,
        /// I/O error message
        reason: String,
    },
}

/// Asset error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
