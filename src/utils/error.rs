use std::fmt;

#[derive(Debug)]
pub enum AppError {
    StorageError(String),
    NotFound(String),
    InvalidRequest(String),
    /// Business rejection reported inside a 200 envelope: duplicate
    /// registration, bad credentials. The front-end shows the message as-is.
    Rejected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Rejected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}
