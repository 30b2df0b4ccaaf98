//! Signed URL generation

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{LinkError, SigningConfig};

/// A time-limited download URL plus the parts it was assembled from
///
/// Derived on demand and never persisted; the same inputs always produce
/// the same link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedLink {
    /// Complete URL handed to the user
    pub url: String,
    /// Unix timestamp after which the reverse proxy denies the request
    pub expires_at_epoch: i64,
    /// Lowercase hex SHA-256 over `secret + path + expires`
    pub signature: String,
}

/// Compute the link signature
///
/// This formula is the contract shared with the reverse proxy: the digest
/// input is the raw concatenation of the secret, the relative file path and
/// the decimal expiry timestamp, in that order. Nothing else may enter the
/// hash.
pub(crate) fn compute_signature(secret: &str, file_path: &str, expires_at_epoch: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(file_path.as_bytes());
    hasher.update(expires_at_epoch.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Reject empty, absolute, and directory-escaping paths
fn validate_path(file_path: &str) -> crate::Result<()> {
    if file_path.trim().is_empty() {
        return Err(LinkError::InvalidPath("path is empty".to_string()));
    }
    if file_path.starts_with('/') || file_path.starts_with('\\') {
        return Err(LinkError::InvalidPath(format!(
            "path must be relative to the download directory: {}",
            file_path
        )));
    }
    if file_path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(LinkError::InvalidPath(format!(
            "path must not contain parent-directory segments: {}",
            file_path
        )));
    }
    Ok(())
}

/// Issue a signed, time-limited URL for one file
///
/// # Arguments
/// * `file_path` - Path relative to the configured download directory
/// * `config` - Active signing configuration
/// * `now` - Current time, passed in so signing stays a pure function
///
/// # Errors
/// Returns `LinkError::InvalidPath` for empty paths, absolute paths, or
/// any path containing a `..` segment.
pub fn sign_path(
    file_path: &str,
    config: &SigningConfig,
    now: DateTime<Utc>,
) -> crate::Result<SignedLink> {
    validate_path(file_path)?;

    let expires_at_epoch = now.timestamp() + config.link_expiry_hours * 3600;
    let signature = compute_signature(&config.secret_key, file_path, expires_at_epoch);
    let url = format!(
        "{}/{}?expires={}&signature={}",
        config.base_url.trim_end_matches('/'),
        file_path,
        expires_at_epoch,
        signature
    );

    Ok(SignedLink {
        url,
        expires_at_epoch,
        signature,
    })
}
