//! Top-level error wrapper types.

use crate::{AssetError, ConfigError, DirectoryError, DirectoryErrorKind, StoreError};

/// Every failure a reconciliation pass can surface.
///
/// # Examples
///
/// ```
/// use syncbot_error::{ConfigError, SyncError};
///
/// let err: SyncError = ConfigError::new("bad interval").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SyncErrorKind {
    /// Desired-state store error
    #[from(StoreError)]
    Store(StoreError),
    /// Directory service error
    #[from(DirectoryError)]
    Directory(DirectoryError),
    /// Emoji asset error
    #[from(AssetError)]
    Asset(AssetError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Syncbot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Syncbot Error: {}", _0)]
pub struct SyncError(Box<SyncErrorKind>);

impl SyncError {
    /// Create a new error from a kind.
    pub fn new(kind: SyncErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SyncErrorKind {
        &self.0
    }

    /// Whether this error invalidates the whole pass rather than one item.
    ///
    /// Store failures and directory read failures mean the model would be
    /// stale or partial. Item mutations and asset lookups only affect the
    /// item they were attempted on.
    pub fn is_pass_fatal(&self) -> bool {
        match self.kind() {
            SyncErrorKind::Store(_) | SyncErrorKind::Config(_) => true,
            SyncErrorKind::Directory(err) => matches!(
                err.kind,
                DirectoryErrorKind::Unavailable(_) | DirectoryErrorKind::Timeout { .. }
            ),
            SyncErrorKind::Asset(_) => false,
        }
    }
}

impl<T> From<T> for SyncError
where
    T: Into<SyncErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for syncbot operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
