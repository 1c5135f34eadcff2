//! Credential loading
//!
//! The router password lives in a plain file: the first
//! whitespace-delimited token is the password, anything after it is
//! ignored. A missing file or empty content is a fatal startup error.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Router admin password
///
/// Newtype wrapper so the secret never leaks through `Debug` output or log
/// records. Access the raw value only at the point it is sent to the
/// router.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Wrap a raw password string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Expose the raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// The secret must never appear in logs or debug dumps
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<REDACTED>)")
    }
}

/// Load the router password from a credential file
///
/// # Errors
///
/// - `Error::Credentials` if the file does not exist
/// - `Error::Credentials` if the file contains no token
pub fn load_password(path: impl AsRef<Path>) -> Result<Password> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::credentials(format!(
            "credential file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;

    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| {
            Error::credentials(format!("no password found in {}", path.display()))
        })?;

    Ok(Password::new(token))
}
