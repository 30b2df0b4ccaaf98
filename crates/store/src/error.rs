use std::fmt;

/// Custom error type for store operations
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem error while reading or writing a collection file
    Io(std::io::Error),
    /// Serialization or deserialization failure
    Serde(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Serde(e) => write!(f, "store serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err)
    }
}
