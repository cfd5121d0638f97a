//! Noise stipple: block-wise threshold jitter from a coordinate hash.

use crate::buffer::{PixelBuffer, BLACK, WHITE};
use crate::dither::DitherParams;

const NOISE_AMPLITUDE: f32 = 0.25;

/// Deterministic value in [-1, 1) for a block coordinate.
pub fn block_noise(bx: u32, by: u32) -> f32 {
    let mut h = (bx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (by as u64).wrapping_add(0x632B_E59B_D9B4_E019).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^= h >> 33;
    (h >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0
}

/// Cutoff a block's darkness must exceed to be inked.
#[inline]
pub fn cutoff(threshold: f32, noise: f32) -> f32 {
    0.3 + (1.0 - threshold) * 0.4 + noise * NOISE_AMPLITUDE
}

pub fn stipple(buffer: &PixelBuffer, params: DitherParams) -> PixelBuffer {
    let (w, h) = buffer.dimensions();
    let scale = params.scale().max(1);
    let mut output = PixelBuffer::new(w, h);

    for by in 0..h.div_ceil(scale) {
        for bx in 0..w.div_ceil(scale) {
            let (x0, y0) = (bx * scale, by * scale);
            let (x1, y1) = ((x0 + scale).min(w), (y0 + scale).min(h));

            let mut sum = 0.0;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += buffer.luminance_at(x, y);
                }
            }
            let count = ((x1 - x0) * (y1 - y0)) as f32;
            let darkness = 1.0 - sum / count / 255.0;
            let inked = darkness > cutoff(params.threshold(), block_noise(bx, by));

            for y in y0..y1 {
                for x in x0..x1 {
                    let mut px = if inked { BLACK } else { WHITE };
                    px[3] = buffer.get(x, y)[3];
                    output.put(x, y, px);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{dither, DitherType};

    #[test]
    fn noise_is_bounded_and_varied() {
        let samples: Vec<f32> =
            (0..64).flat_map(|y| (0..64).map(move |x| block_noise(x, y))).collect();
        assert!(samples.iter().all(|n| (-1.0..1.0).contains(n)));
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert_ne!(block_noise(1, 2), block_noise(2, 1));
    }

    #[test]
    fn extremes_are_solid() {
        let params = DitherParams::new(0.5, 2, 0.0);
        let white = PixelBuffer::filled(9, 9, WHITE);
        let black = PixelBuffer::filled(9, 9, BLACK);
        assert_eq!(dither(&white, DitherType::Noise, params), white);
        assert_eq!(dither(&black, DitherType::Noise, params), black);
    }

    #[test]
    fn blocks_are_uniform() {
        let src = PixelBuffer::filled(10, 10, [128, 128, 128, 255]);
        let out = dither(&src, DitherType::Noise, DitherParams::new(0.5, 3, 0.0));
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(out.get(x, y), out.get(x - x % 3, y - y % 3));
            }
        }
    }

    #[test]
    fn mid_gray_is_mixed() {
        let src = PixelBuffer::filled(32, 32, [128, 128, 128, 255]);
        let out = dither(&src, DitherType::Noise, DitherParams::new(0.5, 1, 0.0));
        let black = out.as_raw().chunks(4).filter(|p| p[0] == 0).count();
        assert!(black > 100 && black < 924, "{black}");
    }
}
