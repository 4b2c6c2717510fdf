use kurbo::Shape as _;

use crate::document::model::{DocumentDef, LAYER_SHAPE, LAYER_SOLID, LayerDef, ShapeDef};
use crate::foundation::core::{Affine, BezPath, Point, Raster, Vec2};
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::{LoadedDocument, Rasterizer};

const PATH_TOLERANCE: f64 = 0.1;

/// CPU rasterizer for Lottie JSON documents, drawing with `vello_cpu`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuRasterizer {
    clear_rgba: Option<[u8; 4]>,
}

impl CpuRasterizer {
    /// Rasterizer that renders onto a transparent canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every frame with a straight-alpha RGBA8 background before drawing layers.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

impl Rasterizer for CpuRasterizer {
    type Document = LottieDocument;

    fn load_from_data(&self, text: &str) -> ExportResult<LottieDocument> {
        let def = DocumentDef::from_json(text)?;
        Ok(LottieDocument {
            def,
            clear_rgba: self.clear_rgba,
        })
    }
}

/// A parsed Lottie document ready for rendering.
#[derive(Clone, Debug)]
pub struct LottieDocument {
    def: DocumentDef,
    clear_rgba: Option<[u8; 4]>,
}

impl LottieDocument {
    /// Bodymovin version string (`v`), if present.
    pub fn version(&self) -> Option<&str> {
        self.def.v.as_deref()
    }

    /// Document name (`nm`), if present.
    pub fn name(&self) -> Option<&str> {
        self.def.nm.as_deref()
    }

    /// Document frame time for a 0-based frame index. Indices past the end clamp to the last frame.
    fn frame_time(&self, frame: u32) -> f64 {
        let last = self.def.total_frames().saturating_sub(1);
        self.def.ip + f64::from(frame.min(last))
    }

    fn parent_transform(&self, layer: &LayerDef, time: f64) -> Affine {
        let mut out = Affine::IDENTITY;
        let mut next = layer.parent;
        let mut depth = 0;
        // Bounded by the layer count so a parent cycle cannot loop forever.
        while let Some(ind) = next
            && depth < self.def.layers.len()
        {
            let Some(parent) = self.def.layers.iter().find(|l| l.ind == Some(ind)) else {
                break;
            };
            out = parent.ks.affine(time - parent.st) * out;
            next = parent.parent;
            depth += 1;
        }
        out
    }

    fn draw_layer(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &LayerDef,
        root: Affine,
        time: f64,
    ) -> ExportResult<()> {
        if layer.hd {
            return Ok(());
        }
        let ip = layer.ip.unwrap_or(self.def.ip);
        let op = layer.op.unwrap_or(self.def.op);
        if time < ip || time >= op {
            return Ok(());
        }

        let local = time - layer.st;
        let opacity = layer.ks.opacity(local);
        if opacity <= 0.0 {
            return Ok(());
        }
        let transform = root * self.parent_transform(layer, time) * layer.ks.affine(local);

        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity as f32);
        }
        match layer.ty {
            LAYER_SOLID => {
                let [r, g, b] = parse_hex_rgb(layer.sc.as_deref().unwrap_or("#000000"))?;
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, layer.sw, layer.sh));
            }
            LAYER_SHAPE => draw_shapes(ctx, &layer.shapes, transform, 1.0, local),
            other => tracing::trace!(ty = other, "skipping unsupported layer type"),
        }
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }
}

impl LoadedDocument for LottieDocument {
    fn width(&self) -> u32 {
        self.def.w
    }

    fn height(&self) -> u32 {
        self.def.h
    }

    fn frame_rate(&self) -> f64 {
        self.def.fr
    }

    fn total_frames(&self) -> u32 {
        self.def.total_frames()
    }

    fn duration(&self) -> f64 {
        self.def.duration_secs()
    }

    fn render_rgba(&self, frame: u32, width: u32, height: u32) -> ExportResult<Raster> {
        if width == 0 || height == 0 {
            return Err(ExportError::raster("render width/height must be non-zero"));
        }
        let w16: u16 = width
            .try_into()
            .map_err(|_| ExportError::raster("render width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| ExportError::raster("render height exceeds u16"))?;

        let time = self.frame_time(frame);
        let root = Affine::scale_non_uniform(
            canvas_scale(width, self.def.w),
            canvas_scale(height, self.def.h),
        );

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        if let Some([r, g, b, a]) = self.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }
        // First layer in the document is the top-most one.
        for layer in self.def.layers.iter().rev() {
            self.draw_layer(&mut ctx, layer, root, time)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Raster::new(width, height, data)
    }
}

fn canvas_scale(target: u32, canvas: u32) -> f64 {
    if canvas == 0 {
        1.0
    } else {
        f64::from(target) / f64::from(canvas)
    }
}

/// Draw one shape group: fills paint the geometry declared at the same level,
/// nested groups paint on their own, and later items sit below earlier ones.
fn draw_shapes(
    ctx: &mut vello_cpu::RenderContext,
    items: &[ShapeDef],
    parent: Affine,
    parent_opacity: f64,
    time: f64,
) {
    let (local, local_opacity) = items
        .iter()
        .find_map(|s| match s {
            ShapeDef::Transform(tr) => Some((tr.affine(time), tr.opacity(time))),
            _ => None,
        })
        .unwrap_or((Affine::IDENTITY, 1.0));
    let transform = parent * local;
    let opacity = parent_opacity * local_opacity;
    if opacity <= 0.0 {
        return;
    }

    let paths: Vec<BezPath> = items.iter().filter_map(|s| geometry(s, time)).collect();

    for item in items.iter().rev() {
        match item {
            ShapeDef::Group { it, hd: false } => draw_shapes(ctx, it, transform, opacity, time),
            ShapeDef::Fill { c, o, hd: false } if !paths.is_empty() => {
                let fill_opacity = o
                    .as_ref()
                    .map(|o| o.sample(time).scalar_or(100.0))
                    .unwrap_or(100.0)
                    .clamp(0.0, 100.0)
                    / 100.0;
                let [r, g, b, a] = color_rgba8(&c.sample(time).0, fill_opacity * opacity);
                if a == 0 {
                    continue;
                }
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                for path in &paths {
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
            }
            _ => {}
        }
    }
}

fn geometry(shape: &ShapeDef, time: f64) -> Option<BezPath> {
    match shape {
        ShapeDef::Rect { p, s, r, hd: false } => {
            let center = p.sample(time).vec2_or(Vec2::ZERO);
            let size = s.sample(time).vec2_or(Vec2::ZERO);
            let radius = r
                .as_ref()
                .map(|r| r.sample(time).scalar_or(0.0))
                .unwrap_or(0.0)
                .max(0.0);
            let rect = kurbo::Rect::from_center_size(center.to_point(), size.to_size());
            if radius > 0.0 {
                Some(rect.to_rounded_rect(radius).to_path(PATH_TOLERANCE))
            } else {
                Some(rect.to_path(PATH_TOLERANCE))
            }
        }
        ShapeDef::Ellipse { p, s, hd: false } => {
            let center = p.sample(time).vec2_or(Vec2::ZERO);
            let size = s.sample(time).vec2_or(Vec2::ZERO);
            let ellipse = kurbo::Ellipse::new(Point::new(center.x, center.y), size / 2.0, 0.0);
            Some(ellipse.to_path(PATH_TOLERANCE))
        }
        ShapeDef::Path { ks, hd: false } => Some(ks.sample(time).to_bezpath()),
        _ => None,
    }
}

/// Lottie colors are normalized floats; legacy files use 0..=255.
fn color_rgba8(components: &[f64], opacity: f64) -> [u8; 4] {
    let scale = if components.iter().take(3).any(|&c| c > 1.0) {
        1.0
    } else {
        255.0
    };
    let channel = |i: usize| {
        let v = components.get(i).copied().unwrap_or(0.0) * scale;
        v.round().clamp(0.0, 255.0) as u8
    };
    let alpha = components.get(3).copied().unwrap_or(1.0).clamp(0.0, 1.0) * opacity;
    [
        channel(0),
        channel(1),
        channel(2),
        (alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

fn parse_hex_rgb(hex: &str) -> ExportResult<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Err(ExportError::raster(format!("invalid solid color '{hex}'")));
    }
    let v = u32::from_str_radix(digits, 16)
        .map_err(|_| ExportError::raster(format!("invalid solid color '{hex}'")))?;
    Ok([(v >> 16) as u8, (v >> 8) as u8, v as u8])
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
