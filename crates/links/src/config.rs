//! Signing configuration record

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::LinkError;

/// Minimum length of the shared signing secret
pub const MIN_SECRET_LEN: usize = 16;

/// Minimum link lifetime in hours
pub const MIN_EXPIRY_HOURS: i64 = 1;

/// Maximum link lifetime in hours
pub const MAX_EXPIRY_HOURS: i64 = 24;

/// How download links are issued: base URL, shared secret, download root
/// and link lifetime
///
/// At most one configuration is active at a time; it is replaced wholesale
/// by an admin update and never deleted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Public base URL the reverse proxy serves files from, e.g.
    /// `https://files.example.com`
    pub base_url: String,
    /// Shared secret known to this application and the reverse proxy
    pub secret_key: String,
    /// Directory on the download host that file paths are relative to
    pub download_path: String,
    /// Lifetime of issued links in hours
    pub link_expiry_hours: i64,
}

impl SigningConfig {
    /// Check every constraint on a candidate configuration
    ///
    /// # Errors
    /// Returns `LinkError::Validation` naming the first violated constraint.
    pub fn validate(&self) -> crate::Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(LinkError::Validation("base URL must not be empty".to_string()));
        }
        if self.download_path.trim().is_empty() {
            return Err(LinkError::Validation(
                "download path must not be empty".to_string(),
            ));
        }
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(LinkError::Validation(format!(
                "secret key must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        if self.link_expiry_hours < MIN_EXPIRY_HOURS || self.link_expiry_hours > MAX_EXPIRY_HOURS {
            return Err(LinkError::Validation(format!(
                "link expiry must be between {} and {} hours",
                MIN_EXPIRY_HOURS, MAX_EXPIRY_HOURS
            )));
        }
        Ok(())
    }

    /// Secret with all but the last four characters masked, for display
    /// and admin read endpoints
    pub fn masked_secret(&self) -> String {
        let visible: String = self
            .secret_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }
}

// The secret must never leak through logs or debug output.
impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("base_url", &self.base_url)
            .field("secret_key", &"<redacted>")
            .field("download_path", &self.download_path)
            .field("link_expiry_hours", &self.link_expiry_hours)
            .finish()
    }
}
