//! Error types for the object store client

use std::fmt;

#[derive(Debug)]
pub enum ObjectStoreError {
    Http(Box<reqwest::Error>),
    /// Non-success status for the given URL
    Status(u16, String),
    InvalidUrl(String),
}

impl ObjectStoreError {
    /// True when the store answered 404 for the object
    pub fn is_not_found(&self) -> bool {
        matches!(self, ObjectStoreError::Status(404, _))
    }
}

impl fmt::Display for ObjectStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectStoreError::Http(err) => write!(f, "HTTP error: {}", err),
            ObjectStoreError::Status(code, url) => {
                write!(f, "Object store returned status {} for {}", code, url)
            }
            ObjectStoreError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
        }
    }
}

impl std::error::Error for ObjectStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjectStoreError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ObjectStoreError {
    fn from(err: reqwest::Error) -> Self {
        ObjectStoreError::Http(Box::new(err))
    }
}

impl From<url::ParseError> for ObjectStoreError {
    fn from(err: url::ParseError) -> Self {
        ObjectStoreError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ObjectStoreError>;
