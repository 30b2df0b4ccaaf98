use std::fmt;

/// Custom error type for link signing and settings operations
#[derive(Debug)]
pub enum LinkError {
    /// Candidate signing configuration violated a constraint
    Validation(String),
    /// Requested file path is empty, absolute, or escapes the download root
    InvalidPath(String),
    /// No signing configuration has been saved yet
    NotConfigured,
    /// Settings persistence failure
    Store(store::StoreError),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Validation(msg) => write!(f, "invalid configuration: {}", msg),
            LinkError::InvalidPath(msg) => write!(f, "invalid file path: {}", msg),
            LinkError::NotConfigured => write!(f, "download links are not configured"),
            LinkError::Store(e) => write!(f, "settings storage error: {}", e),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<store::StoreError> for LinkError {
    fn from(err: store::StoreError) -> Self {
        LinkError::Store(err)
    }
}
