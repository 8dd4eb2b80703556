//! `WxH` dimensions as they appear on the wire and in cache file names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Malformed dimensions, transform or probe text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Target or measured pixel dimensions.
///
/// The canonical text is kept verbatim because it becomes part of derivative
/// file names. Values built with [`Dimensions::new`] always re-serialize to
/// their canonical text; parsed input such as `x600` or `0800x600` keeps the
/// caller's spelling. An empty side parses as 0 and means "unconstrained" to
/// the transform tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
    canonical: String,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canonical: format!("{}x{}", width, height),
        }
    }

    /// Parse `"<W>x<H>"`
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (w, h) = text
            .split_once('x')
            .ok_or_else(|| ParseError::new(format!("dimensions {:?} missing 'x'", text)))?;

        if w.is_empty() && h.is_empty() {
            return Err(ParseError::new(format!("dimensions {:?} are empty", text)));
        }

        Ok(Self {
            width: parse_side(text, w)?,
            height: parse_side(text, h)?,
            canonical: text.to_string(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The `WxH` wire form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

fn parse_side(text: &str, side: &str) -> Result<u32, ParseError> {
    if side.is_empty() {
        return Ok(0);
    }
    if !side.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(format!(
            "dimensions {:?} contain a non-numeric side",
            text
        )));
    }
    side.parse()
        .map_err(|_| ParseError::new(format!("dimensions {:?} out of range", text)))
}

impl FromStr for Dimensions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let dims = Dimensions::parse("800x600").unwrap();
        assert_eq!(dims.as_str(), "800x600");
        assert_eq!(dims.width(), 800);
        assert_eq!(dims.height(), 600);
    }

    #[test]
    fn test_missing_separator_is_parse_error() {
        let err = Dimensions::parse("800").unwrap_err();
        assert!(err.to_string().contains("missing 'x'"));
        assert!(Dimensions::parse("").is_err());
    }

    #[test]
    fn test_non_numeric_is_parse_error() {
        assert!(Dimensions::parse("axb").is_err());
        assert!(Dimensions::parse("10x-5").is_err());
        assert!(Dimensions::parse("10x5/..").is_err());
        assert!(Dimensions::parse("x").is_err());
    }

    #[test]
    fn test_single_side_keeps_external_spelling() {
        let dims = Dimensions::parse("x600").unwrap();
        assert_eq!(dims.width(), 0);
        assert_eq!(dims.height(), 600);
        assert_eq!(dims.as_str(), "x600");
    }

    #[test]
    fn test_new_reserializes_to_canonical() {
        let dims = Dimensions::new(200, 150);
        assert_eq!(dims.to_string(), "200x150");
        assert_eq!(Dimensions::parse(dims.as_str()).unwrap(), dims);
    }

    #[test]
    fn test_from_str() {
        let dims: Dimensions = "64x64".parse().unwrap();
        assert_eq!(dims, Dimensions::new(64, 64));
    }
}
