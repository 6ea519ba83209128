//! Error types for the visibility volume pipeline
//!
//! This module defines the error type shared by the capture session, the
//! reconstructor, the configuration loader and every render backend.

use std::fmt;

/// Result type for visibility volume operations
pub type Result<T> = std::result::Result<T, Error>;

/// Visibility volume errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Render backend failure (draw, present, depth read-back)
    BackendError(String),

    /// The render backend lacks a capability the capture requires (fatal)
    UnsupportedCapability(String),

    /// Malformed or inconsistent configuration entity
    InvalidConfig(String),

    /// Operation called out of sequence (capture past the last direction, etc.)
    InvalidState(String),

    /// File system failure while reading or writing
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::UnsupportedCapability(msg) => write!(f, "Unsupported capability: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl Error {
    /// Whether the error must abort the whole run rather than a single volume
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnsupportedCapability(_))
    }
}

/// Log an error with file:line information and return it from the current function
///
/// # Example
///
/// ```no_run
/// # use visibility_volume::visvol_bail;
/// # fn check(width: u32) -> visibility_volume::visvol::Result<()> {
/// if width == 0 {
///     visvol_bail!("visvol::VisibilityVolume", InvalidConfig, "width must be non-zero");
/// }
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! visvol_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::visvol_error!($source, "{}", message);
        return Err($crate::visvol::Error::$kind(message));
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
