//! Rotated-screen halftones: circular dots, square dots and lines.
//!
//! Mark size follows `sqrt(darkness)` so that inked area, not radius, grows
//! linearly with darkness. Marks are anti-aliased over one pixel and combined
//! with `min()`, so a light mark never lightens ink already laid down.

use crate::buffer::PixelBuffer;
use crate::dither::DitherParams;
use std::f32::consts::FRAC_1_SQRT_2;

/// Smallest screen pitch in pixels.
pub const MIN_STEP: u32 = 3;

const BASE_FACTOR: f32 = 0.6;
const RANGE_FACTOR: f32 = 0.8;
const LINE_SOFT_EDGE: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotShape {
    Circle,
    Square,
}

#[inline]
fn extent_factor(threshold: f32) -> f32 {
    BASE_FACTOR + threshold * RANGE_FACTOR
}

/// Fades marks thinner than a pixel so paper stays clean instead of hazy.
#[inline]
fn coverage(edge: f32, extent: f32) -> f32 {
    edge.clamp(0.0, 1.0) * extent.min(1.0)
}

fn to_buffer(source: &PixelBuffer, ink: &[f32]) -> PixelBuffer {
    let (w, h) = source.dimensions();
    let mut output = PixelBuffer::from_gray(w, h, ink);
    for y in 0..h {
        for x in 0..w {
            let mut px = output.get(x, y);
            px[3] = source.get(x, y)[3];
            output.put(x, y, px);
        }
    }
    output
}

pub fn dots(buffer: &PixelBuffer, shape: DotShape, params: DitherParams) -> PixelBuffer {
    let (w, h) = buffer.dimensions();
    let (wf, hf) = (w as f32, h as f32);
    let step = params.scale().max(MIN_STEP) as f32;
    let (sin, cos) = params.angle().to_radians().sin_cos();
    let (cx, cy) = (wf / 2.0, hf / 2.0);

    // Enough grid rows/cols to cover the canvas under any rotation.
    let reach = (wf * wf + hf * hf).sqrt() / 2.0 + step;
    let n = (reach / step).ceil() as i64;

    let max_extent = match shape {
        DotShape::Circle => step * FRAC_1_SQRT_2,
        DotShape::Square => step / 2.0,
    };
    let factor = extent_factor(params.threshold());

    let mut ink = vec![255.0f32; w as usize * h as usize];

    for j in -n..=n {
        for i in -n..=n {
            let (u, v) = (i as f32 * step, j as f32 * step);
            let gx = cx + u * cos - v * sin;
            let gy = cy + u * sin + v * cos;
            if gx < -step || gy < -step || gx > wf + step || gy > hf + step {
                continue;
            }

            let lum = buffer.luminance_clamped(gx.floor() as i64, gy.floor() as i64) / 255.0;
            let darkness = (1.0 - lum).clamp(0.0, 1.0);
            let extent = darkness.sqrt() * max_extent * factor;
            if extent <= 0.0 {
                continue;
            }

            stamp(&mut ink, w, h, (gx, gy), extent, shape, (sin, cos));
        }
    }

    to_buffer(buffer, &ink)
}

fn stamp(
    ink: &mut [f32],
    w: u32,
    h: u32,
    (gx, gy): (f32, f32),
    extent: f32,
    shape: DotShape,
    (sin, cos): (f32, f32),
) {
    // Rotated squares reach out to their diagonal.
    let reach = extent * std::f32::consts::SQRT_2 + 1.0;
    let x0 = ((gx - reach).floor() as i64).max(0);
    let y0 = ((gy - reach).floor() as i64).max(0);
    let x1 = ((gx + reach).ceil() as i64).min(w as i64 - 1);
    let y1 = ((gy + reach).ceil() as i64).min(h as i64 - 1);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - gx;
            let dy = py as f32 + 0.5 - gy;
            let dist = match shape {
                DotShape::Circle => (dx * dx + dy * dy).sqrt(),
                DotShape::Square => {
                    let du = dx * cos + dy * sin;
                    let dv = -dx * sin + dy * cos;
                    du.abs().max(dv.abs())
                }
            };
            let cov = coverage(extent + 0.5 - dist, extent);
            if cov > 0.0 {
                let idx = py as usize * w as usize + px as usize;
                ink[idx] = ink[idx].min(255.0 * (1.0 - cov));
            }
        }
    }
}

pub fn lines(buffer: &PixelBuffer, params: DitherParams) -> PixelBuffer {
    let (w, h) = buffer.dimensions();
    let spacing = params.scale().max(MIN_STEP) as f32;
    let half = spacing / 2.0;
    let (sin, cos) = params.angle().to_radians().sin_cos();
    let factor = extent_factor(params.threshold());

    let mut ink = vec![255.0f32; w as usize * h as usize];
    for y in 0..h {
        for x in 0..w {
            let rx = x as f32 * cos + y as f32 * sin;
            let dist = (rx.rem_euclid(spacing) - half).abs();
            let darkness = (1.0 - buffer.luminance_at(x, y) / 255.0).clamp(0.0, 1.0);
            let half_width = darkness.sqrt() * half * factor;
            if half_width <= 0.0 {
                continue;
            }
            let edge = (half_width + LINE_SOFT_EDGE / 2.0 - dist) / LINE_SOFT_EDGE;
            let cov = coverage(edge, half_width);
            ink[y as usize * w as usize + x as usize] = 255.0 * (1.0 - cov);
        }
    }

    to_buffer(buffer, &ink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{dither, DitherType};

    const HALFTONES: [DitherType; 3] = [
        DitherType::HalftoneCircle,
        DitherType::HalftoneLine,
        DitherType::HalftoneSquare,
    ];

    fn ink_total(buf: &PixelBuffer) -> u64 {
        buf.as_raw().chunks(4).map(|p| 255 - p[0] as u64).sum()
    }

    #[test]
    fn white_stays_paper() {
        let white = PixelBuffer::filled(20, 20, [255, 255, 255, 255]);
        for kind in HALFTONES {
            let out = dither(&white, kind, DitherParams::new(1.0, 6, 15.0));
            assert_eq!(ink_total(&out), 0, "{kind}");
        }
    }

    #[test]
    fn black_is_fully_inked() {
        let black = PixelBuffer::filled(24, 24, [0, 0, 0, 255]);
        for kind in HALFTONES {
            let out = dither(&black, kind, DitherParams::new(1.0, 6, 0.0));
            // Full darkness at max threshold overlaps neighbors completely.
            let dark = out.as_raw().chunks(4).filter(|p| p[0] < 16).count();
            assert!(dark > 24 * 24 * 9 / 10, "{kind}: {dark}");
        }
    }

    #[test]
    fn coverage_grows_with_threshold() {
        let src = PixelBuffer::filled(32, 32, [150, 150, 150, 255]);
        for kind in HALFTONES {
            let mut last: Option<PixelBuffer> = None;
            for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let out = dither(&src, kind, DitherParams::new(t, 8, 30.0));
                if let Some(prev) = &last {
                    for (a, b) in prev.as_raw().chunks(4).zip(out.as_raw().chunks(4)) {
                        assert!(b[0] <= a[0], "{kind} at threshold {t}");
                    }
                }
                last = Some(out);
            }
        }
    }

    #[test]
    fn darker_source_means_more_ink() {
        let light = PixelBuffer::filled(30, 30, [200, 200, 200, 255]);
        let dark = PixelBuffer::filled(30, 30, [60, 60, 60, 255]);
        let params = DitherParams::new(0.5, 6, 45.0);
        for kind in HALFTONES {
            let (dark_ink, light_ink) = (dither(&dark, kind, params), dither(&light, kind, params));
            assert!(ink_total(&dark_ink) > ink_total(&light_ink), "{kind}");
        }
    }

    #[test]
    fn scale_below_minimum_uses_min_step() {
        let src = PixelBuffer::filled(12, 12, [128, 128, 128, 255]);
        let a = dither(&src, DitherType::HalftoneCircle, DitherParams::new(0.5, 1, 0.0));
        let b = dither(&src, DitherType::HalftoneCircle, DitherParams::new(0.5, MIN_STEP, 0.0));
        assert_eq!(a, b);
    }
}
