//! Capabilities backed by ImageMagick and jpegoptim processes

use crate::capability::{CapabilityError, Optimizer, ProbeReport, Prober, Transformer};
use crate::dimensions::Dimensions;
use crate::transform::Operation;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Run a program to completion, returning its stdout on success
async fn run(program: &str, args: Vec<OsString>) -> Result<String, CapabilityError> {
    debug!(program, args = ?args, "Executing");

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|source| CapabilityError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let mut combined = stdout;
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(CapabilityError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            output: combined,
        });
    }

    Ok(stdout)
}

/// `convert`-based resize and fill
#[derive(Debug, Clone)]
pub struct ImageMagickTransformer {
    program: String,
    quality: u8,
}

impl ImageMagickTransformer {
    pub fn new() -> Self {
        Self {
            program: "convert".to_string(),
            quality: 80,
        }
    }

    /// Use a different binary, e.g. `magick`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub(crate) fn args(
        &self,
        source: &Path,
        operation: Operation,
        dimensions: &Dimensions,
        dest: &Path,
    ) -> Vec<OsString> {
        let geometry = dimensions.as_str();
        let mut args: Vec<OsString> = vec![source.into(), "-auto-orient".into()];

        match operation {
            Operation::Resize => {
                args.push("-resize".into());
                args.push(format!("{}>", geometry).into());
            }
            Operation::Fill => {
                args.push("-resize".into());
                args.push(format!("{}^", geometry).into());
                args.push("-gravity".into());
                args.push("center".into());
                args.push("-extent".into());
                args.push(geometry.into());
            }
        }

        let quality = self.quality.to_string();
        for arg in ["-quality", quality.as_str(), "-strip", "-depth", "8"] {
            args.push(arg.into());
        }
        args.push(dest.into());
        args
    }
}

impl Default for ImageMagickTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transformer for ImageMagickTransformer {
    async fn transform(
        &self,
        source: &Path,
        operation: Operation,
        dimensions: &Dimensions,
        dest: &Path,
    ) -> Result<(), CapabilityError> {
        run(&self.program, self.args(source, operation, dimensions, dest)).await?;
        Ok(())
    }
}

/// `identify`-based probe of the first frame
#[derive(Debug, Clone)]
pub struct ImageMagickProber {
    program: String,
}

impl ImageMagickProber {
    pub fn new() -> Self {
        Self {
            program: "identify".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for ImageMagickProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for ImageMagickProber {
    async fn probe(&self, path: &Path) -> Result<ProbeReport, CapabilityError> {
        let mut first_frame = OsString::from(path.as_os_str());
        first_frame.push("[0]");

        let args = vec!["-format".into(), "%m %wx%h %b".into(), first_frame];
        let output = run(&self.program, args).await?;
        Ok(output.parse()?)
    }
}

/// Lossy in-place JPEG optimization
#[derive(Debug, Clone)]
pub struct JpegOptimizer {
    program: String,
}

impl JpegOptimizer {
    pub fn new() -> Self {
        Self {
            program: "jpegoptim".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for JpegOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Optimizer for JpegOptimizer {
    async fn optimize(&self, path: &Path) -> Result<(), CapabilityError> {
        let output = run(&self.program, vec![path.into()]).await?;
        debug!(path = ?path, output = %output.trim(), "Optimized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_resize_args() {
        let t = ImageMagickTransformer::new();
        let args = t.args(
            Path::new("/c/x.jpg"),
            Operation::Resize,
            &Dimensions::new(200, 100),
            Path::new("/c/x.jpg+resize_200x100"),
        );
        assert_eq!(
            strings(args),
            vec![
                "/c/x.jpg",
                "-auto-orient",
                "-resize",
                "200x100>",
                "-quality",
                "80",
                "-strip",
                "-depth",
                "8",
                "/c/x.jpg+resize_200x100",
            ]
        );
    }

    #[test]
    fn test_fill_args() {
        let t = ImageMagickTransformer::new();
        let args = strings(t.args(
            Path::new("/c/x.jpg"),
            Operation::Fill,
            &Dimensions::new(64, 64),
            Path::new("/c/out"),
        ));
        let expected_prefix = [
            "/c/x.jpg",
            "-auto-orient",
            "-resize",
            "64x64^",
            "-gravity",
            "center",
            "-extent",
            "64x64",
        ];
        assert_eq!(&args[..expected_prefix.len()], &expected_prefix);
        assert_eq!(args.last().map(String::as_str), Some("/c/out"));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let prober = ImageMagickProber::new().with_program("definitely-not-a-real-identify");
        let result = prober.probe(Path::new("/tmp/whatever.png")).await;
        assert!(matches!(result, Err(CapabilityError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failed() {
        let optimizer = JpegOptimizer::new().with_program("false");
        let result = optimizer.optimize(Path::new("/tmp/x.jpg")).await;
        assert!(matches!(result, Err(CapabilityError::Failed { .. })));
    }
}
