use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Raster;
use crate::foundation::error::{ExportError, ExportResult};

/// Rasterizer capability: turns a textual animation document into a [`LoadedDocument`].
///
/// Implementations own parsing; a failed load produces no document at all, so the caller's
/// previous state is never touched.
pub trait Rasterizer {
    /// Parsed document type produced by this backend.
    type Document: LoadedDocument;

    /// Parse an in-memory document payload.
    fn load_from_data(&self, text: &str) -> ExportResult<Self::Document>;

    /// Read and parse a document from disk.
    fn load_from_file(&self, path: &Path) -> ExportResult<Self::Document> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read document '{}'", path.display()))
            .map_err(|e| ExportError::load(format!("{e:#}")))?;
        self.load_from_data(&text)
    }
}

/// A successfully parsed document.
///
/// Metadata is fixed for the lifetime of the value. `render_rgba` must be deterministic: the same
/// `(frame, width, height)` always yields identical bytes.
pub trait LoadedDocument {
    /// Canvas width in pixels.
    fn width(&self) -> u32;
    /// Canvas height in pixels.
    fn height(&self) -> u32;
    /// Declared frames per second.
    fn frame_rate(&self) -> f64;
    /// Number of renderable frames.
    fn total_frames(&self) -> u32;
    /// Playback duration in seconds.
    fn duration(&self) -> f64;
    /// Render one frame as straight-alpha RGBA8 at `width x height`.
    fn render_rgba(&self, frame: u32, width: u32, height: u32) -> ExportResult<Raster>;
}
