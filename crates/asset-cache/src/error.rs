//! Error types for the asset cache

use crate::dimensions::ParseError;
use crate::remote::RemoteError;
use std::fmt;

#[derive(Debug)]
pub enum AssetError {
    /// Unknown namespace or an original that could not be materialized
    NotFound(String),
    /// Key that would escape the namespace root
    InvalidKey(String),
    Parse(ParseError),
    Io(Box<std::io::Error>),
    Remote(RemoteError),
    Config(String),
}

impl AssetError {
    /// Errors the HTTP boundary reports as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AssetError::NotFound(_) | AssetError::InvalidKey(_) | AssetError::Remote(_)
        )
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AssetError::InvalidKey(key) => write!(f, "Invalid key: {}", key),
            AssetError::Parse(err) => write!(f, "{}", err),
            AssetError::Io(err) => write!(f, "IO error: {}", err),
            AssetError::Remote(err) => write!(f, "Remote store error: {}", err),
            AssetError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Parse(err) => Some(err),
            AssetError::Io(err) => Some(err.as_ref()),
            AssetError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::Io(Box::new(err))
    }
}

impl From<ParseError> for AssetError {
    fn from(err: ParseError) -> Self {
        AssetError::Parse(err)
    }
}

impl From<RemoteError> for AssetError {
    fn from(err: RemoteError) -> Self {
        AssetError::Remote(err)
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AssetError::NotFound("unknown namespace: missing".to_string());
        assert_eq!(format!("{}", err), "Not found: unknown namespace: missing");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(AssetError::NotFound("x".to_string()).is_not_found());
        assert!(AssetError::InvalidKey("../etc".to_string()).is_not_found());
        assert!(AssetError::Remote(RemoteError::NotFound("k".to_string())).is_not_found());
        assert!(!AssetError::from(std::io::Error::other("disk")).is_not_found());
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;
        let err = AssetError::from(std::io::Error::other("disk full"));
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("disk full"));
    }
}
