//! Ordered (Bayer) dithering.

use crate::buffer::{PixelBuffer, BLACK, WHITE};
use crate::dither::DitherParams;

pub const BAYER_2: [[u8; 2]; 2] = [[0, 2], [3, 1]];

pub const BAYER_4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

pub const BAYER_8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// How far the threshold control can push the matrix, either way.
const THRESHOLD_SWING: f32 = 0.8;

/// Normalized cell value in [0, 1).
#[inline]
pub fn cell<const N: usize>(matrix: &[[u8; N]; N], x: usize, y: usize) -> f32 {
    matrix[y % N][x % N] as f32 / (N * N) as f32
}

/// Binarizes against the tiled matrix; each cell covers a `scale`×`scale` block.
pub fn bayer<const N: usize>(
    buffer: &PixelBuffer,
    matrix: &[[u8; N]; N],
    params: DitherParams,
) -> PixelBuffer {
    let (w, h) = buffer.dimensions();
    let scale = params.scale().max(1);
    let bias = (params.threshold() - 0.5) * THRESHOLD_SWING;
    let mut output = PixelBuffer::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let lum = buffer.luminance_at(x, y) / 255.0;
            let m = cell(matrix, (x / scale) as usize, (y / scale) as usize);
            let mut px = if lum > m + bias { WHITE } else { BLACK };
            px[3] = buffer.get(x, y)[3];
            output.put(x, y, px);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{dither, DitherType};

    fn gray(width: u32, height: u32, v: u8) -> PixelBuffer {
        PixelBuffer::filled(width, height, [v, v, v, 255])
    }

    #[test]
    fn bayer2_matches_matrix_for_every_gray() {
        for v in (0..=255u32).step_by(5) {
            let params = DitherParams::new(0.5, 1, 0.0);
            let out = dither(&gray(2, 2, v as u8), DitherType::Bayer2x2, params);
            let g = v as f32 / 255.0;
            for y in 0..2 {
                for x in 0..2 {
                    let white = g > cell(&BAYER_2, x as usize, y as usize);
                    assert_eq!(out.get(x, y)[0] == 255, white, "gray {v} at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn mid_gray_bayer4_pattern() {
        let out = dither(&gray(4, 4, 128), DitherType::Bayer4x4, DitherParams::new(0.5, 1, 0.0));
        // 1 = white: matrix entries 0..=8 sit below 128/255.
        let expected = [
            [1, 1, 1, 0],
            [0, 1, 0, 1],
            [1, 0, 1, 0],
            [0, 1, 0, 1],
        ];
        for y in 0..4 {
            for x in 0..4 {
                let want = if expected[y][x] == 1 { WHITE } else { BLACK };
                assert_eq!(out.get(x as u32, y as u32), want, "({x},{y})");
            }
        }
    }

    #[test]
    fn scale_replicates_cells() {
        let out = dither(&gray(8, 8, 128), DitherType::Bayer2x2, DitherParams::new(0.5, 2, 0.0));
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(out.get(x, y), out.get(x - x % 2, y - y % 2));
            }
        }
    }

    #[test]
    fn higher_threshold_never_lightens() {
        let src = gray(8, 8, 100);
        let low = dither(&src, DitherType::Bayer8x8, DitherParams::new(0.2, 1, 0.0));
        let high = dither(&src, DitherType::Bayer8x8, DitherParams::new(0.8, 1, 0.0));
        let whites = |b: &PixelBuffer| b.as_raw().chunks(4).filter(|p| p[0] == 255).count();
        assert!(whites(&high) <= whites(&low));
    }

    #[test]
    fn alpha_is_preserved() {
        let src = PixelBuffer::filled(2, 2, [10, 10, 10, 77]);
        let out = dither(&src, DitherType::Bayer2x2, DitherParams::default());
        assert!(out.as_raw().chunks(4).all(|p| p[3] == 77));
    }
}
