//! Error types for the Aurora3D engine
//!
//! This module defines the error types used throughout the engine,
//! including device initialization, resource creation and render submission.

use std::fmt;

/// Result type for Aurora3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Aurora3D engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (OpenGL, ...). Native diagnostics are carried in the message.
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, mesh, render target, ...)
    InvalidResource(String),

    /// Initialization failed (device, context, render path)
    InitializationFailed(String),

    /// Operation not allowed in the current state (double map, unmap while unmapped, ...)
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR message and return early with `Error::BackendError`
///
/// # Example
///
/// ```no_run
/// # use aurora_3d_engine::engine_bail;
/// # fn create() -> aurora_3d_engine::aurora3d::Result<()> {
/// engine_bail!("aurora3d::opengl", "Failed to create buffer: {}", "no memory");
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::aurora3d::Error::BackendError(message));
    }};
}

/// Log an ERROR message and produce an `Error::BackendError` value
///
/// Meant for `map_err` / `ok_or_else` closures.
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::aurora3d::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
