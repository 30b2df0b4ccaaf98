use std::fmt;

/// Custom error type for Jackett operations
#[derive(Debug)]
pub enum JackettError {
    /// No API key has been supplied
    NotConfigured,
    /// Transport-level failure (includes timeouts)
    Http(reqwest::Error),
    /// Jackett answered with a non-success status
    Status(u16),
}

impl fmt::Display for JackettError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JackettError::NotConfigured => write!(f, "Jackett is not configured (missing API key)"),
            JackettError::Http(e) => write!(f, "Jackett request failed: {}", e),
            JackettError::Status(code) => write!(f, "Jackett returned status {}", code),
        }
    }
}

impl std::error::Error for JackettError {}

impl From<reqwest::Error> for JackettError {
    fn from(err: reqwest::Error) -> Self {
        JackettError::Http(err)
    }
}
