//! External image capabilities: transform, probe and optimize.
//!
//! The cache only decides *when* these run and where their output lands;
//! the pixel work belongs to whatever implements the traits.

use crate::dimensions::{Dimensions, ParseError};
use crate::transform::Operation;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub enum CapabilityError {
    /// The program could not be started
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The program exited unsuccessfully
    Failed {
        program: String,
        status: String,
        output: String,
    },
    /// The program's output could not be understood
    Output(ParseError),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::Spawn { program, source } => {
                write!(f, "Failed to run {}: {}", program, source)
            }
            CapabilityError::Failed {
                program,
                status,
                output,
            } => write!(f, "{} failed ({}): {}", program, status, output.trim()),
            CapabilityError::Output(err) => write!(f, "Unexpected output: {}", err),
        }
    }
}

impl std::error::Error for CapabilityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CapabilityError::Spawn { source, .. } => Some(source),
            CapabilityError::Output(err) => Some(err),
            CapabilityError::Failed { .. } => None,
        }
    }
}

impl From<ParseError> for CapabilityError {
    fn from(err: ParseError) -> Self {
        CapabilityError::Output(err)
    }
}

/// Writes a transformed copy of `source` at `dest`
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(
        &self,
        source: &Path,
        operation: Operation,
        dimensions: &Dimensions,
        dest: &Path,
    ) -> Result<(), CapabilityError>;
}

/// Measures an image file
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeReport, CapabilityError>;
}

/// Shrinks a file in place without changing what it depicts
#[async_trait]
pub trait Optimizer: Send + Sync {
    async fn optimize(&self, path: &Path) -> Result<(), CapabilityError>;
}

/// One line of probe output: `<FORMAT> <W>x<H> <SIZE>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub format: String,
    pub dimensions: Dimensions,
    pub size: String,
}

impl FromStr for ProbeReport {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [format, dimensions, size] = tokens.as_slice() else {
            return Err(ParseError::new(format!(
                "probe output {:?} is not \"<FORMAT> <W>x<H> <SIZE>\"",
                s.trim()
            )));
        };

        Ok(Self {
            format: format.to_string(),
            dimensions: Dimensions::parse(dimensions)?,
            size: size.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_report_parse() {
        let report: ProbeReport = "JPEG 800x600 41.2KB\n".parse().unwrap();
        assert_eq!(report.format, "JPEG");
        assert_eq!(report.dimensions, Dimensions::new(800, 600));
        assert_eq!(report.size, "41.2KB");
    }

    #[test]
    fn test_probe_report_wrong_token_count() {
        assert!("JPEG 800x600".parse::<ProbeReport>().is_err());
        assert!("".parse::<ProbeReport>().is_err());
        assert!("GIF 1x1 1B GIF 1x1 1B".parse::<ProbeReport>().is_err());
    }

    #[test]
    fn test_probe_report_bad_dimensions() {
        assert!("PNG big 10KB".parse::<ProbeReport>().is_err());
    }

    #[test]
    fn test_failed_display_trims_output() {
        let err = CapabilityError::Failed {
            program: "convert".to_string(),
            status: "exit status: 1".to_string(),
            output: "convert: no decode delegate\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "convert failed (exit status: 1): convert: no decode delegate"
        );
    }
}
