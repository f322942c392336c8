//! Error types for the syncbot guild reconciler.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Read failures (`StoreError`, `DirectoryError::Unavailable`) abort a
//! reconciliation pass. Per-item failures (`DirectoryError::OperationFailed`,
//! `AssetError`) are handed to the syncer's failure policy.
//!
//! # Examples
//!
//! ```
//! use syncbot_error::{StoreError, StoreErrorKind, SyncResult};
//!
//! fn load() -> SyncResult<String> {
//!     Err(StoreError::new(StoreErrorKind::Unavailable("connection refused".into())))?
//! }
//!
//! let err = load().unwrap_err();
//! assert!(err.is_pass_fatal());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod directory;
mod error;
mod store;

pub use asset::{AssetError, AssetErrorKind};
pub use config::ConfigError;
pub use directory::{DirectoryError, DirectoryErrorKind, DirectoryResult};
pub use error::{SyncError, SyncErrorKind, SyncResult};
pub use store::{StoreError, StoreErrorKind, StoreResult};
