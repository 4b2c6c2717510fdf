use std::path::Path;

use crate::encode::apng::ApngOptions;
use crate::encode::export::{AnimationCodec, ExportRequest, to_rgba_images, verify_written};
use crate::encode::gif::GifOptions;
use crate::encode::timing::frame_duration_ms;
use crate::encode::webp::WebpOptions;
use crate::foundation::core::{CanvasMetadata, Raster};
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::{LoadedDocument, Rasterizer};
use crate::render::cpu::CpuRasterizer;
use crate::source::frames::Frames;
use crate::source::loader::read_gzip_text;

/// Frame source over one loaded animation document.
///
/// An `Animation` starts empty. A successful `load_*` call replaces the current document; a failed
/// one leaves whatever was loaded before untouched. Metadata accessors return zero values while
/// nothing is loaded, while [`Animation::metadata`], [`Animation::render`] and the exporters fail
/// with [`ExportError::NotLoaded`].
///
/// Loads take `&mut self`; give each thread its own instance for parallel exports.
pub struct Animation<R: Rasterizer = CpuRasterizer> {
    rasterizer: R,
    doc: Option<R::Document>,
}

impl<R: Rasterizer + std::fmt::Debug> std::fmt::Debug for Animation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("rasterizer", &self.rasterizer)
            .field("metadata", &self.metadata().ok())
            .finish()
    }
}

impl Default for Animation<CpuRasterizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation<CpuRasterizer> {
    /// Empty frame source backed by the built-in CPU rasterizer.
    pub fn new() -> Self {
        Self::with_rasterizer(CpuRasterizer::new())
    }
}

impl<R: Rasterizer> Animation<R> {
    /// Empty frame source backed by a custom rasterizer.
    pub fn with_rasterizer(rasterizer: R) -> Self {
        Self {
            rasterizer,
            doc: None,
        }
    }

    /// Load a document from a file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ExportResult<()> {
        let doc = self.rasterizer.load_from_file(path.as_ref())?;
        self.replace(doc);
        Ok(())
    }

    /// Load a document from an in-memory JSON payload.
    #[tracing::instrument(skip_all, fields(bytes = text.len()))]
    pub fn load_json(&mut self, text: &str) -> ExportResult<()> {
        let doc = self.rasterizer.load_from_data(text)?;
        self.replace(doc);
        Ok(())
    }

    /// Load a gzip-compressed document such as a `.tgs` sticker.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_tgs(&mut self, path: impl AsRef<Path>) -> ExportResult<()> {
        let text = read_gzip_text(path.as_ref())?;
        let doc = self.rasterizer.load_from_data(&text)?;
        self.replace(doc);
        Ok(())
    }

    fn replace(&mut self, doc: R::Document) {
        tracing::debug!(
            width = doc.width(),
            height = doc.height(),
            fps = doc.frame_rate(),
            frames = doc.total_frames(),
            "document loaded"
        );
        self.doc = Some(doc);
    }

    /// Whether a document is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    /// The loaded document, if any.
    pub fn document(&self) -> Option<&R::Document> {
        self.doc.as_ref()
    }

    /// Snapshot of the canvas metadata.
    pub fn metadata(&self) -> ExportResult<CanvasMetadata> {
        let doc = self.doc.as_ref().ok_or(ExportError::NotLoaded)?;
        Ok(CanvasMetadata {
            width: doc.width(),
            height: doc.height(),
            frame_rate: doc.frame_rate(),
            total_frames: doc.total_frames(),
            duration: doc.duration(),
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.doc.as_ref().map_or(0, |d| d.width())
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.doc.as_ref().map_or(0, |d| d.height())
    }

    /// `(width, height)` of the canvas.
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Declared frame rate.
    pub fn fps(&self) -> f64 {
        self.doc.as_ref().map_or(0.0, |d| d.frame_rate())
    }

    /// Number of renderable frames.
    pub fn frames(&self) -> u32 {
        self.doc.as_ref().map_or(0, |d| d.total_frames())
    }

    /// Playback duration in seconds.
    pub fn duration(&self) -> f64 {
        self.doc.as_ref().map_or(0.0, |d| d.duration())
    }

    /// Render one frame at the canvas size.
    pub fn render(&self, frame: u32) -> ExportResult<Raster> {
        self.render_at(frame, self.width(), self.height())
    }

    /// Render one frame at an explicit pixel size.
    pub fn render_at(&self, frame: u32, width: u32, height: u32) -> ExportResult<Raster> {
        let doc = self.loaded_doc()?;
        if width == 0 || height == 0 {
            return Err(ExportError::validation(
                "render width/height must be non-zero",
            ));
        }
        doc.render_rgba(frame, width, height)
    }

    /// Lazily render every frame in index order.
    pub fn iter_frames(&self) -> ExportResult<Frames<'_, R::Document>> {
        Frames::new(self.loaded_doc()?)
    }

    fn loaded_doc(&self) -> ExportResult<&R::Document> {
        match &self.doc {
            Some(doc) if doc.width() > 0 && doc.height() > 0 => Ok(doc),
            _ => Err(ExportError::NotLoaded),
        }
    }

    /// Export as an animated GIF.
    pub fn export_gif(
        &self,
        path: impl AsRef<Path>,
        request: ExportRequest,
        options: &GifOptions,
    ) -> ExportResult<()> {
        self.export_with(path, request, options)
    }

    /// Export as an animated WebP.
    pub fn export_webp(
        &self,
        path: impl AsRef<Path>,
        request: ExportRequest,
        options: &WebpOptions,
    ) -> ExportResult<()> {
        self.export_with(path, request, options)
    }

    /// Export as an animated PNG.
    pub fn export_apng(
        &self,
        path: impl AsRef<Path>,
        request: ExportRequest,
        options: &ApngOptions,
    ) -> ExportResult<()> {
        self.export_with(path, request, options)
    }

    /// Run the export pipeline with any codec.
    ///
    /// Frames come from `request.frames` when set, otherwise every frame of the document is
    /// rendered. A failed export may leave a partial file behind.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), format = codec.format_name()))]
    pub fn export_with<C: AnimationCodec + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        request: ExportRequest,
        codec: &C,
    ) -> ExportResult<()> {
        let path = path.as_ref();
        let ExportRequest { frames, fps } = request;

        let frames = match frames {
            Some(frames) => frames,
            None => self.iter_frames()?.collect::<ExportResult<Vec<_>>>()?,
        };
        if frames.is_empty() {
            return Err(ExportError::EmptyFrameSet);
        }

        let delay_ms = frame_duration_ms(fps, self.fps())?;
        let images = to_rgba_images(frames)?;
        tracing::debug!(frames = images.len(), delay_ms, "encoding animation");

        codec.write(path, &images, delay_ms)?;
        verify_written(codec.format_name(), path)?;
        tracing::info!(frames = images.len(), "animation written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/animation.rs"]
mod tests;
