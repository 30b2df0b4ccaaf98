//! Reference verifier for signed URLs
//!
//! The reverse proxy in front of the download directory owns verification
//! in production; this implementation is the executable form of that
//! contract and is what the generated proxy configuration must reproduce.

use chrono::{DateTime, Utc};

use crate::sign::compute_signature;
use crate::SigningConfig;

/// Compare two byte strings without short-circuiting on the first mismatch
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Decide whether a request for `file_path` is authorized
///
/// Fails closed: an expired timestamp is denied before any signature work,
/// and a malformed signature simply never matches. Verification failures
/// are an ordinary deny outcome, not an error.
///
/// # Arguments
/// * `file_path` - Requested path, relative to the download directory
/// * `expires_param` - `expires` query parameter from the request
/// * `signature_param` - `signature` query parameter from the request
/// * `config` - Active signing configuration
/// * `now` - Request time
pub fn verify(
    file_path: &str,
    expires_param: i64,
    signature_param: &str,
    config: &SigningConfig,
    now: DateTime<Utc>,
) -> bool {
    if expires_param < now.timestamp() {
        return false;
    }

    let expected = compute_signature(&config.secret_key, file_path, expires_param);
    constant_time_eq(expected.as_bytes(), signature_param.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign_path;
    use chrono::TimeZone;

    fn config() -> SigningConfig {
        SigningConfig {
            base_url: "https://files.example.com".to_string(),
            secret_key: "0123456789abcdef".to_string(),
            download_path: "/downloads".to_string(),
            link_expiry_hours: 1,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        assert!(verify(
            "movie.mkv",
            link.expires_at_epoch,
            &link.signature,
            &config(),
            fixed_now()
        ));
    }

    #[test]
    fn test_expired_denied_even_with_valid_signature() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        let after_expiry = fixed_now() + chrono::Duration::hours(2);
        assert!(!verify(
            "movie.mkv",
            link.expires_at_epoch,
            &link.signature,
            &config(),
            after_expiry
        ));
    }

    #[test]
    fn test_valid_until_the_last_second() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        let at_expiry = Utc.timestamp_opt(link.expires_at_epoch, 0).unwrap();
        assert!(verify(
            "movie.mkv",
            link.expires_at_epoch,
            &link.signature,
            &config(),
            at_expiry
        ));
        assert!(!verify(
            "movie.mkv",
            link.expires_at_epoch,
            &link.signature,
            &config(),
            at_expiry + chrono::Duration::seconds(1)
        ));
    }

    #[test]
    fn test_wrong_path_denied() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        assert!(!verify(
            "other.mkv",
            link.expires_at_epoch,
            &link.signature,
            &config(),
            fixed_now()
        ));
    }

    #[test]
    fn test_tampered_expiry_denied() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        assert!(!verify(
            "movie.mkv",
            link.expires_at_epoch + 3600,
            &link.signature,
            &config(),
            fixed_now()
        ));
    }

    #[test]
    fn test_wrong_secret_denied() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        let mut other = config();
        other.secret_key = "another-secret-key".to_string();
        assert!(!verify(
            "movie.mkv",
            link.expires_at_epoch,
            &link.signature,
            &other,
            fixed_now()
        ));
    }

    #[test]
    fn test_malformed_signature_denied() {
        let link = sign_path("movie.mkv", &config(), fixed_now()).unwrap();
        assert!(!verify("movie.mkv", link.expires_at_epoch, "", &config(), fixed_now()));
        assert!(!verify(
            "movie.mkv",
            link.expires_at_epoch,
            "not-hex-at-all",
            &config(),
            fixed_now()
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
