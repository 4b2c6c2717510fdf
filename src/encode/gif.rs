use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::encode::export::{AnimationCodec, create_output};
use crate::foundation::error::{ExportError, ExportResult};

/// GIF frame disposal method (how the canvas is cleared before the next frame).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GifDisposal {
    /// No disposal specified (code 0).
    Unspecified,
    /// Leave the frame in place (code 1).
    Keep,
    /// Restore the frame area to the background (code 2).
    #[default]
    Background,
    /// Restore the previous canvas contents (code 3).
    Previous,
}

impl TryFrom<u8> for GifDisposal {
    type Error = ExportError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Keep),
            2 => Ok(Self::Background),
            3 => Ok(Self::Previous),
            other => Err(ExportError::validation(format!(
                "GIF disposal must be 0..=3, got {other}"
            ))),
        }
    }
}

impl GifDisposal {
    fn to_gif(self) -> gif::DisposalMethod {
        match self {
            Self::Unspecified => gif::DisposalMethod::Any,
            Self::Keep => gif::DisposalMethod::Keep,
            Self::Background => gif::DisposalMethod::Background,
            Self::Previous => gif::DisposalMethod::Previous,
        }
    }
}

/// GIF export parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifOptions {
    /// Number of loops; `0` loops forever.
    pub loop_count: u16,
    /// Disposal applied to every frame.
    pub disposal: GifDisposal,
    /// Spend more time on palette quantization for better colors.
    pub optimize: bool,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            loop_count: 0,
            disposal: GifDisposal::Background,
            optimize: false,
        }
    }
}

// `gif` quantizer speeds: 1 is the slowest/best, 10 is the crate's recommended default.
const QUANTIZE_SPEED_OPTIMIZED: i32 = 1;
const QUANTIZE_SPEED_DEFAULT: i32 = 10;

impl AnimationCodec for GifOptions {
    fn format_name(&self) -> &'static str {
        "GIF"
    }

    fn write(&self, path: &Path, frames: &[RgbaImage], delay_ms: u32) -> ExportResult<()> {
        let first = frames.first().ok_or(ExportError::EmptyFrameSet)?;
        let width: u16 = first
            .width()
            .try_into()
            .map_err(|_| ExportError::validation("GIF width exceeds 65535"))?;
        let height: u16 = first
            .height()
            .try_into()
            .map_err(|_| ExportError::validation("GIF height exceeds 65535"))?;

        let delay = gif_delay_cs(delay_ms)?;

        let out = create_output(path)?;
        let mut encoder = gif::Encoder::new(out, width, height, &[])
            .map_err(|e| ExportError::codec(format!("create GIF encoder: {e}")))?;
        encoder
            .set_repeat(gif_repeat(self.loop_count))
            .map_err(|e| ExportError::codec(format!("set GIF repeat: {e}")))?;

        let speed = if self.optimize {
            QUANTIZE_SPEED_OPTIMIZED
        } else {
            QUANTIZE_SPEED_DEFAULT
        };
        for (i, image) in frames.iter().enumerate() {
            let mut pixels = image.as_raw().clone();
            let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, speed);
            frame.delay = delay;
            frame.dispose = self.disposal.to_gif();
            encoder
                .write_frame(&frame)
                .map_err(|e| ExportError::codec(format!("write GIF frame {i}: {e}")))?;
        }

        let mut out = encoder
            .into_inner()
            .map_err(|e| ExportError::codec(format!("finish GIF: {e}")))?;
        out.flush()
            .with_context(|| format!("flush '{}'", path.display()))?;
        Ok(())
    }
}

fn gif_repeat(loop_count: u16) -> gif::Repeat {
    if loop_count == 0 {
        gif::Repeat::Infinite
    } else {
        gif::Repeat::Finite(loop_count)
    }
}

/// GIF delays are stored in whole centiseconds, truncated.
fn gif_delay_cs(delay_ms: u32) -> ExportResult<u16> {
    u16::try_from(delay_ms / 10).map_err(|_| {
        ExportError::validation(format!(
            "GIF frame delay {delay_ms} ms exceeds {} cs",
            u16::MAX
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
