use std::fmt;

/// Custom error type for nsctl operations
#[derive(Debug)]
pub enum CtlError {
    /// No context exists with the given name
    NotFound(String),
    /// The cached credential exists but could not be read
    CacheUnreadable(String),
    /// The cached credential could not be decoded into claims
    MalformedToken(String),
    /// JSON parsing error
    Json(String),
    /// Configuration error
    Config(String),
}

impl fmt::Display for CtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtlError::NotFound(name) => write!(f, "no context exists with the name: {}", name),
            CtlError::CacheUnreadable(msg) => write!(f, "Cannot read cached credential: {}", msg),
            CtlError::MalformedToken(msg) => write!(f, "Malformed token: {}", msg),
            CtlError::Json(msg) => write!(f, "JSON error: {}", msg),
            CtlError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CtlError {}

impl From<serde_json::Error> for CtlError {
    fn from(err: serde_json::Error) -> Self {
        CtlError::Json(err.to_string())
    }
}

impl From<serde_yml::Error> for CtlError {
    fn from(err: serde_yml::Error) -> Self {
        CtlError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CtlError {
    fn from(err: std::io::Error) -> Self {
        CtlError::Config(err.to_string())
    }
}

/// Result type alias for nsctl operations
pub type Result<T> = std::result::Result<T, CtlError>;
