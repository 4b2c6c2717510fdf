//! Animatable property values and keyframe sampling.

use serde::Deserialize;

use crate::foundation::core::{BezPath, Point, Vec2};

pub(crate) trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

/// Numeric property payload. Scalars may be written as bare numbers or arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Values(pub(crate) Vec<f64>);

impl Values {
    pub(crate) fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    pub(crate) fn scalar_or(&self, fallback: f64) -> f64 {
        self.get(0).unwrap_or(fallback)
    }

    pub(crate) fn vec2_or(&self, fallback: Vec2) -> Vec2 {
        match (self.get(0), self.get(1)) {
            (Some(x), Some(y)) => Vec2::new(x, y),
            (Some(x), None) => Vec2::new(x, x),
            _ => fallback,
        }
    }
}

impl<'de> Deserialize<'de> for Values {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Self(vec![v])),
            Repr::Arr(v) => Ok(Self(v)),
        }
    }
}

impl Lerp for Values {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let out = a
            .0
            .iter()
            .enumerate()
            .map(|(i, &av)| match b.get(i) {
                Some(bv) => av + (bv - av) * t,
                None => av,
            })
            .collect();
        Self(out)
    }
}

/// Cubic bezier path with tangents relative to their vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BezierShape {
    pub(crate) closed: bool,
    pub(crate) vertices: Vec<[f64; 2]>,
    pub(crate) in_tangents: Vec<[f64; 2]>,
    pub(crate) out_tangents: Vec<[f64; 2]>,
}

impl BezierShape {
    pub(crate) fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        let n = self.vertices.len();
        if n == 0 {
            return path;
        }

        let vertex = |i: usize| Point::new(self.vertices[i][0], self.vertices[i][1]);
        let tangent = |list: &[[f64; 2]], i: usize| {
            list.get(i)
                .map(|t| Vec2::new(t[0], t[1]))
                .unwrap_or(Vec2::ZERO)
        };

        path.move_to(vertex(0));
        for k in 1..n {
            path.curve_to(
                vertex(k - 1) + tangent(&self.out_tangents, k - 1),
                vertex(k) + tangent(&self.in_tangents, k),
                vertex(k),
            );
        }
        if self.closed {
            path.curve_to(
                vertex(n - 1) + tangent(&self.out_tangents, n - 1),
                vertex(0) + tangent(&self.in_tangents, 0),
                vertex(0),
            );
            path.close_path();
        }
        path
    }
}

impl<'de> Deserialize<'de> for BezierShape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            c: bool,
            #[serde(default)]
            v: Vec<[f64; 2]>,
            #[serde(default)]
            i: Vec<[f64; 2]>,
            #[serde(default)]
            o: Vec<[f64; 2]>,
        }

        // Keyframed paths wrap each shape in a one-element array.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(Raw),
            Wrapped(Vec<Raw>),
        }

        let raw = match Repr::deserialize(deserializer)? {
            Repr::One(r) => r,
            Repr::Wrapped(list) => list
                .into_iter()
                .next()
                .ok_or_else(|| serde::de::Error::custom("empty shape keyframe value"))?,
        };
        Ok(Self {
            closed: raw.c,
            vertices: raw.v,
            in_tangents: raw.i,
            out_tangents: raw.o,
        })
    }
}

impl Lerp for BezierShape {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if a.vertices.len() != b.vertices.len()
            || a.in_tangents.len() != b.in_tangents.len()
            || a.out_tangents.len() != b.out_tangents.len()
        {
            return a.clone();
        }
        let mix = |xs: &[[f64; 2]], ys: &[[f64; 2]]| -> Vec<[f64; 2]> {
            xs.iter()
                .zip(ys)
                .map(|(p, q)| [p[0] + (q[0] - p[0]) * t, p[1] + (q[1] - p[1]) * t])
                .collect()
        };
        Self {
            closed: a.closed,
            vertices: mix(&a.vertices, &b.vertices),
            in_tangents: mix(&a.in_tangents, &b.in_tangents),
            out_tangents: mix(&a.out_tangents, &b.out_tangents),
        }
    }
}

/// Bezier easing handle (`o` / `i` on a keyframe).
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct EaseHandle {
    pub(crate) x: Values,
    pub(crate) y: Values,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Keyframe<T> {
    pub(crate) t: f64,
    #[serde(default)]
    pub(crate) s: Option<T>,
    /// Legacy explicit end value.
    #[serde(default)]
    pub(crate) e: Option<T>,
    #[serde(default)]
    pub(crate) h: u8,
    #[serde(default)]
    pub(crate) o: Option<EaseHandle>,
    #[serde(default)]
    pub(crate) i: Option<EaseHandle>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AnimatedRepr<T> {
    Keyframes(Vec<Keyframe<T>>),
    Static(T),
}

/// A Lottie property: `{"a": 0, "k": value}` or `{"a": 1, "k": [keyframes]}`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Animated<T> {
    pub(crate) k: AnimatedRepr<T>,
}

impl<T> Animated<T>
where
    T: Lerp + Clone + Default,
{
    /// Sample at layer-local frame time `t`.
    pub(crate) fn sample(&self, t: f64) -> T {
        match &self.k {
            AnimatedRepr::Static(v) => v.clone(),
            AnimatedRepr::Keyframes(keys) => sample_keys(keys, t),
        }
    }
}

fn sample_keys<T>(keys: &[Keyframe<T>], t: f64) -> T
where
    T: Lerp + Clone + Default,
{
    let Some(first) = keys.first() else {
        return T::default();
    };

    let idx = keys.partition_point(|k| k.t <= t);
    if idx == 0 {
        return first.s.clone().unwrap_or_default();
    }
    if idx >= keys.len() {
        return settled_value(keys);
    }

    let a = &keys[idx - 1];
    let b = &keys[idx];
    let Some(from) = a.s.clone().or_else(|| keys[..idx - 1].iter().rev().find_map(|k| k.e.clone()))
    else {
        return T::default();
    };
    if a.h == 1 {
        return from;
    }
    let Some(to) = a.e.clone().or_else(|| b.s.clone()) else {
        return from;
    };

    let span = b.t - a.t;
    if span <= 0.0 {
        return from;
    }
    let u = ((t - a.t) / span).clamp(0.0, 1.0);
    let eased = match (&a.o, &a.i) {
        (Some(o), Some(i)) => cubic_bezier_ease(
            o.x.scalar_or(0.0),
            o.y.scalar_or(0.0),
            i.x.scalar_or(1.0),
            i.y.scalar_or(1.0),
            u,
        ),
        _ => u,
    };
    T::lerp(&from, &to, eased)
}

/// Value held after the last keyframe.
fn settled_value<T: Clone + Default>(keys: &[Keyframe<T>]) -> T {
    for k in keys.iter().rev() {
        if let Some(s) = &k.s
            && k.e.is_none()
        {
            return s.clone();
        }
        if let Some(e) = &k.e {
            return e.clone();
        }
    }
    T::default()
}

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` evaluated at progress `u`.
pub(crate) fn cubic_bezier_ease(x1: f64, y1: f64, x2: f64, y2: f64, u: f64) -> f64 {
    fn coord(p1: f64, p2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }
    fn slope(p1: f64, p2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    let u = u.clamp(0.0, 1.0);
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    let mut s = u;
    for _ in 0..8 {
        let err = coord(x1, x2, s) - u;
        if err.abs() < 1e-7 {
            return coord(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    // Newton stalled on a flat segment; bisect instead.
    let (mut lo, mut hi) = (0.0, 1.0);
    s = u;
    for _ in 0..40 {
        let x = coord(x1, x2, s);
        if (x - u).abs() < 1e-7 {
            break;
        }
        if x < u {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    coord(y1, y2, s)
}

#[cfg(test)]
#[path = "../../tests/unit/document/value.rs"]
mod tests;
