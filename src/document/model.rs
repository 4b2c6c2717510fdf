//! Serde model for the subset of the Lottie JSON format the CPU rasterizer understands.

use serde::{Deserialize, Deserializer};

use crate::document::value::{Animated, BezierShape, Values};
use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{ExportError, ExportResult};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DocumentDef {
    #[serde(default)]
    pub(crate) v: Option<String>,
    #[serde(default)]
    pub(crate) nm: Option<String>,
    pub(crate) fr: f64,
    pub(crate) ip: f64,
    pub(crate) op: f64,
    #[serde(deserialize_with = "whole_u32")]
    pub(crate) w: u32,
    #[serde(deserialize_with = "whole_u32")]
    pub(crate) h: u32,
    #[serde(default)]
    pub(crate) layers: Vec<LayerDef>,
}

impl DocumentDef {
    pub(crate) fn from_json(text: &str) -> ExportResult<Self> {
        if text.trim().is_empty() {
            return Err(ExportError::load("document payload is empty"));
        }
        serde_json::from_str(text)
            .map_err(|e| ExportError::load(format!("parse Lottie JSON: {e}")))
    }

    pub(crate) fn total_frames(&self) -> u32 {
        let span = (self.op - self.ip).floor();
        if span.is_finite() && span > 0.0 {
            span.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    pub(crate) fn duration_secs(&self) -> f64 {
        if self.fr > 0.0 {
            f64::from(self.total_frames()) / self.fr
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LayerDef {
    #[serde(deserialize_with = "whole_u32")]
    pub(crate) ty: u32,
    #[serde(default)]
    pub(crate) ind: Option<f64>,
    #[serde(default)]
    pub(crate) parent: Option<f64>,
    #[serde(default)]
    pub(crate) ip: Option<f64>,
    #[serde(default)]
    pub(crate) op: Option<f64>,
    #[serde(default)]
    pub(crate) st: f64,
    #[serde(default)]
    pub(crate) hd: bool,
    #[serde(default)]
    pub(crate) ks: TransformDef,
    #[serde(default)]
    pub(crate) shapes: Vec<ShapeDef>,
    #[serde(default)]
    pub(crate) sc: Option<String>,
    #[serde(default)]
    pub(crate) sw: f64,
    #[serde(default)]
    pub(crate) sh: f64,
}

/// Lottie writers emit integer fields as plain JSON numbers, sometimes with a fraction part.
fn whole_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = f64::deserialize(d)?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
        Ok(v as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {v}"
        )))
    }
}

pub(crate) const LAYER_SOLID: u32 = 1;
pub(crate) const LAYER_SHAPE: u32 = 4;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TransformDef {
    #[serde(default)]
    pub(crate) a: Option<Animated<Values>>,
    #[serde(default)]
    pub(crate) p: Option<PositionDef>,
    #[serde(default)]
    pub(crate) s: Option<Animated<Values>>,
    #[serde(default)]
    pub(crate) r: Option<Animated<Values>>,
    #[serde(default)]
    pub(crate) o: Option<Animated<Values>>,
}

impl TransformDef {
    /// `translate(p) * rotate(r) * scale(s) * translate(-a)` at local time `t`.
    pub(crate) fn affine(&self, t: f64) -> Affine {
        let anchor = sample_vec2(self.a.as_ref(), t, Vec2::ZERO);
        let position = self
            .p
            .as_ref()
            .map(|p| p.sample(t))
            .unwrap_or(Vec2::ZERO);
        let scale = sample_vec2(self.s.as_ref(), t, Vec2::new(100.0, 100.0)) / 100.0;
        let rotation_deg = self
            .r
            .as_ref()
            .map(|r| r.sample(t).scalar_or(0.0))
            .unwrap_or(0.0);

        Affine::translate(position)
            * Affine::rotate(rotation_deg.to_radians())
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-anchor)
    }

    /// Opacity in `[0, 1]` at local time `t`.
    pub(crate) fn opacity(&self, t: f64) -> f64 {
        self.o
            .as_ref()
            .map(|o| o.sample(t).scalar_or(100.0))
            .unwrap_or(100.0)
            .clamp(0.0, 100.0)
            / 100.0
    }
}

fn sample_vec2(prop: Option<&Animated<Values>>, t: f64, fallback: Vec2) -> Vec2 {
    prop.map(|p| p.sample(t).vec2_or(fallback))
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PositionDef {
    Split {
        x: Animated<Values>,
        y: Animated<Values>,
    },
    Combined(Animated<Values>),
}

impl PositionDef {
    pub(crate) fn sample(&self, t: f64) -> Vec2 {
        match self {
            Self::Split { x, y } => {
                Vec2::new(x.sample(t).scalar_or(0.0), y.sample(t).scalar_or(0.0))
            }
            Self::Combined(p) => p.sample(t).vec2_or(Vec2::ZERO),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "ty")]
pub(crate) enum ShapeDef {
    #[serde(rename = "gr")]
    Group {
        #[serde(default)]
        it: Vec<ShapeDef>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "rc")]
    Rect {
        p: Animated<Values>,
        s: Animated<Values>,
        #[serde(default)]
        r: Option<Animated<Values>>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "el")]
    Ellipse {
        p: Animated<Values>,
        s: Animated<Values>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "sh")]
    Path {
        ks: Animated<BezierShape>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "fl")]
    Fill {
        c: Animated<Values>,
        #[serde(default)]
        o: Option<Animated<Values>>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "tr")]
    Transform(TransformDef),
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
