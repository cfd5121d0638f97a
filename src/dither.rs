//! Dither algorithm registry and dispatch.
//!
//! Every algorithm is a variant of [`DitherType`]; its [`Descriptor`] says
//! which of scale/angle it consumes. [`dither`] is the single entry point.

use crate::buffer::PixelBuffer;
use crate::{diffusion, halftone, ordered, stipple};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 32;
pub const MAX_ANGLE: f32 = 180.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Identity,
    Ordered,
    Diffusion,
    Halftone,
    Noise,
}

/// Which optional parameters an algorithm reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub category: Category,
    pub has_scale: bool,
    pub has_angle: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DitherType {
    #[default]
    None,
    Bayer2x2,
    Bayer4x4,
    Bayer8x8,
    FloydSteinberg,
    Atkinson,
    HalftoneCircle,
    HalftoneLine,
    HalftoneSquare,
    Noise,
}

impl DitherType {
    pub const ALL: [DitherType; 10] = [
        DitherType::None,
        DitherType::Bayer2x2,
        DitherType::Bayer4x4,
        DitherType::Bayer8x8,
        DitherType::FloydSteinberg,
        DitherType::Atkinson,
        DitherType::HalftoneCircle,
        DitherType::HalftoneLine,
        DitherType::HalftoneSquare,
        DitherType::Noise,
    ];

    pub const fn descriptor(self) -> Descriptor {
        use Category::*;
        let (category, has_scale, has_angle) = match self {
            DitherType::None => (Identity, false, false),
            DitherType::Bayer2x2 | DitherType::Bayer4x4 | DitherType::Bayer8x8 => {
                (Ordered, true, false)
            }
            DitherType::FloydSteinberg | DitherType::Atkinson => (Diffusion, true, false),
            DitherType::HalftoneCircle | DitherType::HalftoneLine | DitherType::HalftoneSquare => {
                (Halftone, true, true)
            }
            DitherType::Noise => (Noise, true, false),
        };
        Descriptor { category, has_scale, has_angle }
    }

    pub const fn key(self) -> &'static str {
        match self {
            DitherType::None => "none",
            DitherType::Bayer2x2 => "bayer2x2",
            DitherType::Bayer4x4 => "bayer4x4",
            DitherType::Bayer8x8 => "bayer8x8",
            DitherType::FloydSteinberg => "floyd-steinberg",
            DitherType::Atkinson => "atkinson",
            DitherType::HalftoneCircle => "halftone-circle",
            DitherType::HalftoneLine => "halftone-line",
            DitherType::HalftoneSquare => "halftone-square",
            DitherType::Noise => "noise",
        }
    }

    /// Parses a user-supplied key. Separators and case are ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        let norm: String = key
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let kind = match norm.as_str() {
            "none" | "" => DitherType::None,
            "bayer2x2" | "bayer2" => DitherType::Bayer2x2,
            "bayer4x4" | "bayer4" | "bayer" => DitherType::Bayer4x4,
            "bayer8x8" | "bayer8" => DitherType::Bayer8x8,
            "floydsteinberg" | "fs" => DitherType::FloydSteinberg,
            "atkinson" => DitherType::Atkinson,
            "halftonecircle" | "halftone" | "circle" => DitherType::HalftoneCircle,
            "halftoneline" | "halftonelines" | "lines" => DitherType::HalftoneLine,
            "halftonesquare" | "square" => DitherType::HalftoneSquare,
            "noise" | "stipple" => DitherType::Noise,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_identity(self) -> bool {
        self == DitherType::None
    }
}

impl From<&str> for DitherType {
    /// Unknown keys fall back to the identity passthrough.
    fn from(key: &str) -> Self {
        DitherType::from_key(key).unwrap_or_else(|| {
            log::warn!("unknown dither type {key:?}, falling back to none");
            DitherType::None
        })
    }
}

impl From<String> for DitherType {
    fn from(key: String) -> Self {
        DitherType::from(key.as_str())
    }
}

impl From<DitherType> for String {
    fn from(kind: DitherType) -> Self {
        kind.key().to_string()
    }
}

impl fmt::Display for DitherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Numeric inputs to a ditherer, always within their documented ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DitherParams {
    threshold: f32,
    scale: u32,
    angle: f32,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self { threshold: 0.5, scale: MIN_SCALE, angle: 0.0 }
    }
}

impl DitherParams {
    pub fn new(threshold: f32, scale: u32, angle: f32) -> Self {
        Self {
            threshold: clamp_finite(threshold, 0.0, 1.0, 0.5),
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            angle: clamp_finite(angle, 0.0, MAX_ANGLE, 0.0),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Drops the parameters the algorithm does not consume.
    pub fn for_descriptor(self, descriptor: Descriptor) -> Self {
        Self {
            threshold: self.threshold,
            scale: if descriptor.has_scale { self.scale } else { MIN_SCALE },
            angle: if descriptor.has_angle { self.angle } else { 0.0 },
        }
    }
}

/// Clamps `value` into `[lo, hi]`, replacing NaN/inf with `fallback`.
pub(crate) fn clamp_finite(value: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// Runs `kind` over `buffer`. Output has the same dimensions; alpha is kept.
pub fn dither(buffer: &PixelBuffer, kind: DitherType, params: DitherParams) -> PixelBuffer {
    if let Some(empty) = buffer.blank_if_empty() {
        return empty;
    }
    let params = params.for_descriptor(kind.descriptor());
    match kind {
        DitherType::None => buffer.clone(),
        DitherType::Bayer2x2 => ordered::bayer(buffer, &ordered::BAYER_2, params),
        DitherType::Bayer4x4 => ordered::bayer(buffer, &ordered::BAYER_4, params),
        DitherType::Bayer8x8 => ordered::bayer(buffer, &ordered::BAYER_8, params),
        DitherType::FloydSteinberg => {
            diffusion::diffuse(buffer, &diffusion::FLOYD_STEINBERG, params)
        }
        DitherType::Atkinson => diffusion::diffuse(buffer, &diffusion::ATKINSON, params),
        DitherType::HalftoneCircle => halftone::dots(buffer, halftone::DotShape::Circle, params),
        DitherType::HalftoneSquare => halftone::dots(buffer, halftone::DotShape::Square, params),
        DitherType::HalftoneLine => halftone::lines(buffer, params),
        DitherType::Noise => stipple::stipple(buffer, params),
    }
}
