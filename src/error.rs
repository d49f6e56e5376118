use std::fmt;

/// Central error types for the photo browser demo
#[derive(Debug)]
pub enum AppError {
    /// Filesystem error
    Io(std::io::Error),
    /// Image decoding or encoding error
    Image(String),
    /// Resource not found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "Filesystem error: {}", e),
            AppError::Image(msg) => write!(f, "Image error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}
