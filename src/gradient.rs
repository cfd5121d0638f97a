//! Gradient map: luminance to a 2–4 stop color ramp.

use crate::buffer::PixelBuffer;
use crate::dither::{dither, DitherParams, DitherType};
use crate::palette::Rgb;
use crate::{Result, ScreenprintError};
use serde::{Deserialize, Serialize};

pub const MIN_STOPS: usize = 2;
pub const MAX_STOPS: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientSpec {
    /// Palette names or hex colors, darkest position first.
    pub stops: Vec<String>,
    pub dither_type: DitherType,
    pub threshold: f32,
    pub scale: u32,
    pub angle: f32,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            stops: vec!["navy".into(), "cream".into()],
            dither_type: DitherType::None,
            threshold: 0.5,
            scale: 1,
            angle: 0.0,
        }
    }
}

impl GradientSpec {
    pub fn dither_params(&self) -> DitherParams {
        DitherParams::new(self.threshold, self.scale, self.angle)
    }
}

pub fn validate_stops(count: usize) -> Result<()> {
    if (MIN_STOPS..=MAX_STOPS).contains(&count) {
        Ok(())
    } else {
        Err(ScreenprintError::InvalidGradient { stops: count })
    }
}

#[inline]
fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |i: usize| {
        let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    [mix(0), mix(1), mix(2)]
}

/// Piecewise-linear ramp lookup for `position` in [0, 1].
pub fn ramp(stops: &[Rgb], position: f32) -> Rgb {
    match stops {
        [] => return [0, 0, 0],
        [only] => return *only,
        _ => {}
    }
    let segments = stops.len() - 1;
    let scaled = position.clamp(0.0, 1.0) * segments as f32;
    let index = (scaled.floor() as usize).min(segments - 1);
    lerp(stops[index], stops[index + 1], scaled - index as f32)
}

/// Stop chosen for an already-dithered luminance.
fn quantized(stops: &[Rgb], value: f32) -> Rgb {
    if stops.len() == 2 {
        return if value > 0.5 { stops[1] } else { stops[0] };
    }
    let index = (value.clamp(0.0, 1.0) * (stops.len() - 1) as f32).round() as usize;
    stops[index.min(stops.len() - 1)]
}

/// Maps every pixel of `source` onto `stops`. With a ditherer selected, the
/// ramp position comes from the dithered luminance instead of the source.
pub fn map(
    source: &PixelBuffer,
    stops: &[Rgb],
    dither_type: DitherType,
    params: DitherParams,
) -> Result<PixelBuffer> {
    validate_stops(stops.len())?;
    if let Some(empty) = source.blank_if_empty() {
        return Ok(empty);
    }

    let dithered = (!dither_type.is_identity()).then(|| dither(source, dither_type, params));
    let (w, h) = source.dimensions();
    let mut output = PixelBuffer::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let rgb = match &dithered {
                Some(d) => quantized(stops, d.luminance_at(x, y) / 255.0),
                None => ramp(stops, source.luminance_at(x, y) / 255.0),
            };
            output.put(x, y, [rgb[0], rgb[1], rgb[2], source.get(x, y)[3]]);
        }
    }

    Ok(output)
}
