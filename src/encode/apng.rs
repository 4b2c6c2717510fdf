use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::encode::export::{AnimationCodec, create_output};
use crate::foundation::error::{ExportError, ExportResult};

/// Animated PNG export parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApngOptions {
    /// Number of plays; `0` loops forever.
    pub loop_count: u16,
}

impl AnimationCodec for ApngOptions {
    fn format_name(&self) -> &'static str {
        "APNG"
    }

    fn write(&self, path: &Path, frames: &[RgbaImage], delay_ms: u32) -> ExportResult<()> {
        let first = frames.first().ok_or(ExportError::EmptyFrameSet)?;
        let (width, height) = first.dimensions();
        let num_frames = u32::try_from(frames.len())
            .map_err(|_| ExportError::validation("too many frames for APNG"))?;
        let delay = apng_delay_ms(delay_ms)?;

        let out = create_output(path)?;
        let mut encoder = png::Encoder::new(out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .set_animated(num_frames, u32::from(self.loop_count))
            .map_err(|e| ExportError::codec(format!("configure APNG animation: {e}")))?;
        encoder
            .set_frame_delay(delay, 1000)
            .map_err(|e| ExportError::codec(format!("set APNG frame delay: {e}")))?;
        encoder
            .set_dispose_op(png::DisposeOp::None)
            .map_err(|e| ExportError::codec(format!("set APNG dispose op: {e}")))?;
        encoder
            .set_blend_op(png::BlendOp::Source)
            .map_err(|e| ExportError::codec(format!("set APNG blend op: {e}")))?;

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::codec(format!("write APNG header: {e}")))?;
        for (i, image) in frames.iter().enumerate() {
            if image.dimensions() != (width, height) {
                return Err(ExportError::validation(format!(
                    "APNG frame {i} is {}x{}, expected {width}x{height}",
                    image.width(),
                    image.height()
                )));
            }
            writer
                .write_image_data(image.as_raw())
                .map_err(|e| ExportError::codec(format!("write APNG frame {i}: {e}")))?;
        }
        writer
            .finish()
            .with_context(|| format!("finish APNG '{}'", path.display()))?;
        Ok(())
    }
}

fn apng_delay_ms(delay_ms: u32) -> ExportResult<u16> {
    u16::try_from(delay_ms).map_err(|_| {
        ExportError::validation(format!(
            "APNG frame delay {delay_ms} ms exceeds {} ms",
            u16::MAX
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/apng.rs"]
mod tests;
