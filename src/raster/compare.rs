use crate::foundation::error::{LayercastError, LayercastResult};
use std::path::Path;
use std::process::Command;

/// External pixel-difference utility: absolute number of differing pixels
/// between two image files, `0` meaning identical content.
///
/// Compare failures are non-fatal to the export; the coordinator falls back
/// to accepting the freshly rendered image.
pub trait ImageCompare: Send + Sync {
    fn pixel_difference(&self, a: &Path, b: &Path) -> LayercastResult<u64>;
}

/// ImageMagick-backed comparison using the absolute-error metric.
pub struct MagickCompare {
    program: String,
}

impl MagickCompare {
    /// Use the `convert` binary found on `PATH`.
    pub fn new() -> Self {
        Self::with_program("convert")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MagickCompare {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCompare for MagickCompare {
    fn pixel_difference(&self, a: &Path, b: &Path) -> LayercastResult<u64> {
        let output = Command::new(&self.program)
            .arg(a)
            .arg(b)
            .args(["-metric", "AE", "-compare", "-format", "%[distortion]", "info:"])
            .output()
            .map_err(|e| LayercastError::render(format!("spawn '{}': {e}", self.program)))?;

        // The AE distortion is printed as a (possibly scientific-notation)
        // number on stdout; anything unparseable is treated as a tool error.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = stdout.trim();
        text.parse::<f64>()
            .map(|v| v.round().max(0.0) as u64)
            .map_err(|_| {
                LayercastError::render(format!(
                    "unexpected compare output '{text}' (status {})",
                    output.status
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/compare.rs"]
mod tests;
