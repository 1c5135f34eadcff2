//! Error types for the watchdog
//!
//! This module defines all error types used throughout the crate.
//!
//! The taxonomy deliberately separates fatal startup errors
//! ([`Error::Credentials`], [`Error::Config`]) from transient per-cycle
//! errors ([`Error::Probe`], [`Error::Reboot`], [`Error::Other`]). The
//! monitor contains the transient kinds; the daemon refuses to start on the
//! fatal kinds.

use thiserror::Error;

/// Result type alias for watchdog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the watchdog
#[derive(Error, Debug)]
pub enum Error {
    /// Reachability probe errors
    ///
    /// Probe implementations normally map failures to "unreachable" rather
    /// than surfacing this variant; it exists for probe construction and
    /// factory failures.
    #[error("probe error: {0}")]
    Probe(String),

    /// Reboot action errors (login failed, endpoint missing, timed out)
    #[error("reboot error: {0}")]
    Reboot(String),

    /// Credential source errors (missing file, empty content)
    #[error("credential error: {0}")]
    Credentials(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a probe error
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Create a reboot error
    pub fn reboot(msg: impl Into<String>) -> Self {
        Self::Reboot(msg.into())
    }

    /// Create a credential error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must prevent the process from starting
    ///
    /// Transient errors are contained per-cycle by the monitor; fatal errors
    /// are surfaced at startup with a non-zero exit code.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Credentials(_) | Self::Config(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(Error::credentials("missing").is_fatal());
        assert!(Error::config("bad interval").is_fatal());
        assert!(!Error::reboot("login failed").is_fatal());
        assert!(!Error::probe("resolve failed").is_fatal());
    }
}
