use crate::foundation::error::{ExportError, ExportResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Read-only canvas metadata of a loaded document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasMetadata {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Frames per second declared by the document.
    pub frame_rate: f64,
    /// Number of renderable frames.
    pub total_frames: u32,
    /// Playback duration in seconds.
    pub duration: f64,
}

impl CanvasMetadata {
    /// Whether the canvas is large enough to produce a raster.
    pub fn has_canvas(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One rendered frame as straight (non-premultiplied) RGBA8.
///
/// Pixels are tightly packed, row-major, top-left origin: `data.len() == width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA8 buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ExportResult<Self> {
        let expected = rgba_len(width, height);
        if data.len() != expected {
            return Err(ExportError::validation(format!(
                "raster buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; rgba_len(width, height)],
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

pub(crate) fn rgba_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
