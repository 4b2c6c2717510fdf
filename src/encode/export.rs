use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::core::Raster;
use crate::foundation::error::{ExportError, ExportResult};

/// Per-call export inputs shared by every container format.
#[derive(Clone, Debug, Default)]
pub struct ExportRequest {
    /// Pre-rendered frames to encode instead of rendering the whole document.
    pub frames: Option<Vec<Raster>>,
    /// Frame rate override; `None` or `Some(0.0)` uses the document's rate.
    pub fps: Option<f64>,
}

impl ExportRequest {
    /// Request that renders every frame at the document's frame rate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode these frames instead of rendering the document.
    pub fn with_frames(mut self, frames: Vec<Raster>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Override the document frame rate.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }
}

/// Codec capability: writes an ordered list of equally sized RGBA frames as one animated file.
///
/// `delay_ms` is applied uniformly to every frame.
pub trait AnimationCodec {
    /// Human-readable container name used in logs and errors.
    fn format_name(&self) -> &'static str;

    /// Encode `frames` (never empty) and write them to `path`.
    fn write(&self, path: &Path, frames: &[RgbaImage], delay_ms: u32) -> ExportResult<()>;
}

/// Convert rasters into the codec pixel representation. All frames must match the first one's size.
pub(crate) fn to_rgba_images(frames: Vec<Raster>) -> ExportResult<Vec<RgbaImage>> {
    let Some(first) = frames.first() else {
        return Err(ExportError::EmptyFrameSet);
    };
    let (width, height) = (first.width, first.height);
    if width == 0 || height == 0 {
        return Err(ExportError::validation("frame width/height must be non-zero"));
    }

    frames
        .into_iter()
        .enumerate()
        .map(|(i, raster)| {
            if (raster.width, raster.height) != (width, height) {
                return Err(ExportError::validation(format!(
                    "frame {i} is {}x{}, expected {width}x{height}",
                    raster.width, raster.height
                )));
            }
            RgbaImage::from_raw(width, height, raster.data).ok_or_else(|| {
                ExportError::validation(format!(
                    "frame {i} buffer does not hold {width}x{height} RGBA pixels"
                ))
            })
        })
        .collect()
}

/// Fail unless the codec actually produced `path`.
pub(crate) fn verify_written(format: &'static str, path: &Path) -> ExportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ExportError::WriteVerification {
            format,
            path: path.to_path_buf(),
        })
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub(crate) fn create_output(path: &Path) -> ExportResult<std::io::BufWriter<std::fs::File>> {
    ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create output file '{}'", path.display()))?;
    Ok(std::io::BufWriter::new(file))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
