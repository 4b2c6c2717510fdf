//! `lottie-export` renders Lottie vector animations to RGBA frames on the CPU and re-encodes them
//! as animated GIF, WebP or PNG files.
//!
//! # Pipeline overview
//!
//! 1. **Load**: JSON text, a `.json` file or a gzip-compressed `.tgs` file becomes a loaded
//!    document inside an [`Animation`].
//! 2. **Render**: `Animation + frame index -> Raster` (straight-alpha RGBA8), one frame at a time
//!    or lazily over the whole range with [`Animation::iter_frames`].
//! 3. **Time**: a frame rate becomes one uniform per-frame delay via [`frame_duration_ms`].
//! 4. **Encode**: an [`AnimationCodec`] ([`GifOptions`], [`WebpOptions`], [`ApngOptions`]) writes
//!    the frame list, then the output file is checked to exist.
//!
//! Rasterization and encoding sit behind the [`Rasterizer`] and [`AnimationCodec`] traits, so
//! either side can be swapped without touching the pipeline.
//!
//! ```no_run
//! use lottie_export::{Animation, ExportRequest, GifOptions};
//!
//! # fn main() -> lottie_export::ExportResult<()> {
//! let mut anim = Animation::new();
//! anim.load_file("sticker.json")?;
//! anim.export_gif("sticker.gif", ExportRequest::new(), &GifOptions::default())?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod document;
mod encode;
mod foundation;
mod render;
mod source;

pub use encode::apng::ApngOptions;
pub use encode::export::{AnimationCodec, ExportRequest};
pub use encode::gif::{GifDisposal, GifOptions};
pub use encode::timing::frame_duration_ms;
pub use encode::webp::WebpOptions;
pub use foundation::core::{CanvasMetadata, Raster};
pub use foundation::error::{ExportError, ExportResult};
pub use render::backend::{LoadedDocument, Rasterizer};
pub use render::cpu::{CpuRasterizer, LottieDocument};
pub use source::animation::Animation;
pub use source::frames::Frames;
