//! Settings service: the single source of truth for `SigningConfig`

use chrono::{DateTime, Utc};
use std::path::Path;
use store::SingleDoc;

use crate::{render_proxy_config, sign_path, SignedLink, SigningConfig};

/// Result of a successful settings update
#[derive(Debug, Clone)]
pub struct AppliedSettings {
    /// The configuration as persisted
    pub config: SigningConfig,
    /// Proxy snippet regenerated from the new configuration
    pub proxy_config: String,
}

/// Persisted signing configuration plus the operations built on it
///
/// The configuration lifecycle is unconfigured until the first successful
/// `set`, then configured forever; updates overwrite in place.
pub struct SettingsService {
    doc: SingleDoc<SigningConfig>,
}

impl SettingsService {
    /// Open the settings record under the data directory
    pub fn open(dir: &Path) -> crate::Result<Self> {
        let doc = SingleDoc::open(dir, "signing_config")?;
        Ok(Self { doc })
    }

    /// Current configuration, or `None` while unconfigured
    pub fn get(&self) -> Option<SigningConfig> {
        self.doc.get()
    }

    /// Validate and persist a candidate configuration
    ///
    /// On success the proxy snippet is regenerated from the stored value
    /// and returned alongside it, so the admin screen can surface it
    /// immediately.
    ///
    /// # Errors
    /// `LinkError::Validation` naming the violated constraint, or
    /// `LinkError::Store` if persistence fails.
    pub fn set(&self, candidate: SigningConfig) -> crate::Result<AppliedSettings> {
        candidate.validate()?;
        self.doc.set(candidate.clone())?;
        tracing::info!("signing configuration updated, proxy config regenerated");

        let proxy_config = render_proxy_config(&candidate);
        Ok(AppliedSettings {
            config: candidate,
            proxy_config,
        })
    }

    /// Issue a signed link with the current configuration
    ///
    /// # Errors
    /// `LinkError::NotConfigured` before the first successful `set`, or
    /// `LinkError::InvalidPath` for a bad file path.
    pub fn sign(&self, file_path: &str, now: DateTime<Utc>) -> crate::Result<SignedLink> {
        let config = self.get().ok_or(crate::LinkError::NotConfigured)?;
        sign_path(file_path, &config, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{verify, LinkError};
    use tempfile::tempdir;

    fn candidate() -> SigningConfig {
        SigningConfig {
            base_url: "https://files.example.com".to_string(),
            secret_key: "0123456789abcdef".to_string(),
            download_path: "/downloads".to_string(),
            link_expiry_hours: 2,
        }
    }

    #[test]
    fn test_unconfigured_by_default() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();
        assert!(service.get().is_none());
    }

    #[test]
    fn test_sign_before_configure_fails() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();
        let err = service.sign("movie.mkv", Utc::now()).unwrap_err();
        assert!(matches!(err, LinkError::NotConfigured));
    }

    #[test]
    fn test_set_validates() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();

        let mut bad = candidate();
        bad.secret_key = "short".to_string();
        assert!(matches!(service.set(bad), Err(LinkError::Validation(_))));
        assert!(service.get().is_none());
    }

    #[test]
    fn test_set_persists_and_renders_proxy_config() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();

        let applied = service.set(candidate()).unwrap();
        assert_eq!(applied.config, candidate());
        assert!(applied.proxy_config.contains("0123456789abcdef"));
        assert_eq!(service.get().unwrap(), candidate());
    }

    #[test]
    fn test_update_overwrites() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();

        service.set(candidate()).unwrap();

        let mut updated = candidate();
        updated.link_expiry_hours = 24;
        service.set(updated).unwrap();

        assert_eq!(service.get().unwrap().link_expiry_hours, 24);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let service = SettingsService::open(dir.path()).unwrap();
            service.set(candidate()).unwrap();
        }
        let reopened = SettingsService::open(dir.path()).unwrap();
        assert_eq!(reopened.get().unwrap(), candidate());
    }

    #[test]
    fn test_signed_link_verifies() {
        let dir = tempdir().unwrap();
        let service = SettingsService::open(dir.path()).unwrap();
        service.set(candidate()).unwrap();

        let now = Utc::now();
        let link = service.sign("show/episode.mkv", now).unwrap();
        assert!(verify(
            "show/episode.mkv",
            link.expires_at_epoch,
            &link.signature,
            &candidate(),
            now
        ));
    }
}
