//! Transform specifications and their cache-key encoding

use crate::dimensions::{Dimensions, ParseError};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// A transform the external image tool knows how to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Proportional scale bounded by the target, never upscaling
    Resize,
    /// Scale then center-crop to exactly the target
    Fill,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Resize => "resize",
            Operation::Fill => "fill",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation text plus target dimensions, e.g. `resize` / `200x200`.
///
/// The operation text is kept verbatim; operations are recognised by
/// substring so `resize,fill` names both. Specs compare equal exactly when
/// their encodings do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformSpec {
    operations: String,
    dimensions: Dimensions,
}

impl TransformSpec {
    pub fn new(operations: &str, dimensions: Dimensions) -> Result<Self, ParseError> {
        if operations.is_empty() {
            return Err(ParseError::new("operations are empty"));
        }
        if !operations
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b',' | b'-' | b'_'))
        {
            return Err(ParseError::new(format!(
                "operations {:?} contain unsupported characters",
                operations
            )));
        }

        Ok(Self {
            operations: operations.to_string(),
            dimensions,
        })
    }

    /// Parse the two path segments of a derivative request
    pub fn parse(operations: &str, dimensions: &str) -> Result<Self, ParseError> {
        Self::new(operations, Dimensions::parse(dimensions)?)
    }

    pub fn operations_text(&self) -> &str {
        &self.operations
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Recognised operations in the order they are applied
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        if self.operations.contains("resize") {
            ops.push(Operation::Resize);
        }
        if self.operations.contains("crop") || self.operations.contains("fill") {
            ops.push(Operation::Fill);
        }
        ops
    }

    /// `<operations>_<WxH>`, the cache-key suffix
    pub fn encoding(&self) -> String {
        format!("{}_{}", self.operations, self.dimensions)
    }

    /// `<original>+<operations>_<WxH>`
    pub fn derived_path(&self, original: &Path) -> PathBuf {
        let mut path = OsString::from(original.as_os_str());
        path.push("+");
        path.push(self.encoding());
        PathBuf::from(path)
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoding())
    }
}
