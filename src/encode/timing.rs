use crate::foundation::error::{ExportError, ExportResult};

/// Resolve the uniform per-frame display time, in whole milliseconds.
///
/// `fps_override` wins when it is set to a non-zero value; `Some(0.0)` falls back to
/// `canvas_fps` just like `None`. The result is `floor(1000 / fps)`.
pub fn frame_duration_ms(fps_override: Option<f64>, canvas_fps: f64) -> ExportResult<u32> {
    let fps = match fps_override {
        Some(fps) if fps != 0.0 => fps,
        _ => canvas_fps,
    };
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ExportError::InvalidFrameRate(fps));
    }
    Ok((1000.0 / fps).floor().min(f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/timing.rs"]
mod tests;
