use std::fmt;

use crate::platform::PlatformError;

/// Error type for asset image, data, and favorite operations
#[derive(Debug, Clone)]
pub enum AssetError {
    /// The asset has no backing data resource to read
    NoResources,
    /// An error reported by the platform, passed through unchanged
    Platform(PlatformError),
    /// The platform reported failure without any error detail
    Unknown,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NoResources => write!(f, "Asset has no backing resources"),
            AssetError::Platform(e) => write!(f, "Platform error: {}", e),
            AssetError::Unknown => write!(f, "Unknown platform error"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Platform(e) => Some(e.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<PlatformError> for AssetError {
    fn from(e: PlatformError) -> Self {
        AssetError::Platform(e)
    }
}
