//! Engine error kinds and their mapping onto FUSE/libc errno values.
//!
//! This is the Rust shape of spec.md §7's error table: every kind the
//! Sync Engine can produce is listed here once, and `to_errno` is the single
//! place that knows how each one is surfaced to the kernel.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Exists(String),

    #[error("directory not empty: {0}")]
    NotEmpty(String),

    #[error("not a directory: {0}")]
    NotDir(String),

    #[error("is a directory: {0}")]
    IsDir(String),

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("local I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Maps to the libc errno spec.md §7 prescribes for this kind.
    ///
    /// `InvariantViolation` is logged and returned as `EIO` here; whether to
    /// abort the process outright is a policy decision left to the call site
    /// (some violations are safe to merely skip, per §7).
    pub fn to_errno(&self) -> i32 {
        match self {
            EngineError::NotFound(_) => libc::ENOENT,
            EngineError::Exists(_) => libc::EEXIST,
            EngineError::NotEmpty(_) => libc::ENOTEMPTY,
            EngineError::NotDir(_) => libc::ENOTDIR,
            EngineError::IsDir(_) => libc::EISDIR,
            EngineError::Unsupported(_) => libc::ENOSYS,
            EngineError::Remote(_) => libc::EIO,
            EngineError::InvariantViolation(_) => libc::EIO,
            EngineError::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}

/// Errors surfaced by the Remote API Facade (network, auth, quota).
///
/// Per spec.md §4.2 / §7, every remote call failure collapses to `EIO` at
/// the FUSE boundary; the caller's recovery mechanism is to reissue the
/// syscall (which triggers a fresh `refresh`).
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote item not found")]
    Gone,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote returned malformed data: {0}")]
    Malformed(String),

    #[error("credentials unavailable: {0}")]
    NoCredentials(String),
}
