use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;
use webp_animation::{
    AnimParams, EncoderOptions, EncodingConfig, EncodingType, LossyEncodingConfig,
};

use crate::encode::export::{AnimationCodec, ensure_parent_dir};
use crate::foundation::error::{ExportError, ExportResult};

/// Animated WebP export parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WebpOptions {
    /// Number of loops; `0` loops forever.
    pub loop_count: u16,
    /// Encoder quality `0.0..=100.0`; used as compression effort when `lossless` is set.
    pub quality: f32,
    /// Speed/size trade-off `0..=6` (higher is slower and smaller).
    pub method: u8,
    /// Encode frames losslessly.
    pub lossless: bool,
}

impl Default for WebpOptions {
    fn default() -> Self {
        Self {
            loop_count: 0,
            quality: 90.0,
            method: 4,
            lossless: false,
        }
    }
}

impl WebpOptions {
    fn encoder_options(&self) -> EncoderOptions {
        let encoding_type = if self.lossless {
            EncodingType::Lossless
        } else {
            EncodingType::Lossy(LossyEncodingConfig::default())
        };
        EncoderOptions {
            anim_params: AnimParams {
                loop_count: i32::from(self.loop_count),
            },
            encoding_config: Some(EncodingConfig {
                encoding_type,
                quality: self.quality,
                method: usize::from(self.method),
            }),
            ..Default::default()
        }
    }
}

impl AnimationCodec for WebpOptions {
    fn format_name(&self) -> &'static str {
        "WebP"
    }

    fn write(&self, path: &Path, frames: &[RgbaImage], delay_ms: u32) -> ExportResult<()> {
        let first = frames.first().ok_or(ExportError::EmptyFrameSet)?;
        let step = webp_step_ms(delay_ms)?;

        let mut encoder = webp_animation::Encoder::new_with_options(
            first.dimensions(),
            self.encoder_options(),
        )
        .map_err(|e| ExportError::codec(format!("create WebP encoder: {e:?}")))?;

        let mut timestamp = 0i32;
        for (i, image) in frames.iter().enumerate() {
            encoder
                .add_frame(image.as_raw(), timestamp)
                .map_err(|e| ExportError::codec(format!("add WebP frame {i}: {e:?}")))?;
            timestamp = timestamp
                .checked_add(step)
                .ok_or_else(|| ExportError::validation("WebP animation is too long"))?;
        }
        let data = encoder
            .finalize(timestamp)
            .map_err(|e| ExportError::codec(format!("finalize WebP: {e:?}")))?;

        ensure_parent_dir(path)?;
        std::fs::write(path, &*data)
            .with_context(|| format!("write WebP '{}'", path.display()))?;
        Ok(())
    }
}

/// WebP timestamps must strictly increase, so sub-millisecond delays become 1 ms.
fn webp_step_ms(delay_ms: u32) -> ExportResult<i32> {
    i32::try_from(delay_ms.max(1)).map_err(|_| {
        ExportError::validation(format!("WebP frame delay {delay_ms} ms is too large"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/webp.rs"]
mod tests;
