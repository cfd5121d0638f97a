//! Error diffusion dithering (Floyd-Steinberg, Atkinson) at block resolution.

use crate::buffer::{PixelBuffer, BLACK, WHITE};
use crate::dither::DitherParams;

/// A diffusion kernel: `(dx, dy, weight)` taps relative to the current cell.
pub struct Kernel {
    pub taps: &'static [(i32, i32, f32)],
}

/// ```text
///     X 7
///   3 5 1   (/16)
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[
        (1, 0, 7.0 / 16.0),
        (-1, 1, 3.0 / 16.0),
        (0, 1, 5.0 / 16.0),
        (1, 1, 1.0 / 16.0),
    ],
};

/// Only 6/8 of the error is propagated, the rest is dropped for contrast.
pub const ATKINSON: Kernel = Kernel {
    taps: &[
        (1, 0, 1.0 / 8.0),
        (2, 0, 1.0 / 8.0),
        (-1, 1, 1.0 / 8.0),
        (0, 1, 1.0 / 8.0),
        (1, 1, 1.0 / 8.0),
        (0, 2, 1.0 / 8.0),
    ],
};

// Padding wide enough for every tap above, so the sweep needs no bounds checks.
const PAD_LEFT: usize = 1;
const PAD_RIGHT: usize = 2;
const PAD_BOTTOM: usize = 2;

/// Cutoff on the 0..=255 working grid: 80 at threshold 0, 180 at threshold 1.
pub fn cutoff(threshold: f32) -> f32 {
    80.0 + threshold * 100.0
}

/// Block-averaged luminance grid with error padding around it.
pub(crate) struct ErrorGrid {
    width: usize,
    height: usize,
    stride: usize,
    cells: Vec<f32>,
}

impl ErrorGrid {
    /// Averages `scale`×`scale` blocks into a `ceil(w/scale)` × `ceil(h/scale)` grid.
    pub(crate) fn downsample(image: &PixelBuffer, scale: u32) -> Self {
        let (orig_w, orig_h) = image.dimensions();
        let scale = scale.max(1);
        let work_w = orig_w.div_ceil(scale);
        let work_h = orig_h.div_ceil(scale);
        let stride = work_w as usize + PAD_LEFT + PAD_RIGHT;
        let mut cells = vec![0.0; stride * (work_h as usize + PAD_BOTTOM)];

        for by in 0..work_h {
            for bx in 0..work_w {
                let mut sum = 0.0;
                let mut count = 0;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = bx * scale + dx;
                        let y = by * scale + dy;
                        if x < orig_w && y < orig_h {
                            sum += image.luminance_at(x, y);
                            count += 1;
                        }
                    }
                }
                cells[by as usize * stride + bx as usize + PAD_LEFT] = sum / count as f32;
            }
        }

        Self { width: work_w as usize, height: work_h as usize, stride, cells }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x + PAD_LEFT
    }

    /// Row-major sweep: binarize each cell against `cutoff` and push the
    /// quantization error to not-yet-visited neighbors.
    pub(crate) fn sweep(&mut self, kernel: &Kernel, cutoff: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let old_val = self.cells[idx];
                let new_val = if old_val > cutoff { 255.0 } else { 0.0 };
                self.cells[idx] = new_val;

                let err = old_val - new_val;
                for &(dx, dy, weight) in kernel.taps {
                    let offset = dy as isize * self.stride as isize + dx as isize;
                    let target = (idx as isize + offset) as usize;
                    self.cells[target] += err * weight;
                }
            }
        }
    }

    #[inline]
    pub(crate) fn value(&self, x: usize, y: usize) -> f32 {
        self.cells[self.index(x, y)]
    }

    /// Sum over every cell, padding included.
    #[cfg(test)]
    pub(crate) fn total(&self) -> f64 {
        self.cells.iter().map(|&c| c as f64).sum()
    }
}

pub fn diffuse(image: &PixelBuffer, kernel: &Kernel, params: DitherParams) -> PixelBuffer {
    let (orig_w, orig_h) = image.dimensions();
    let scale = params.scale().max(1);

    let mut grid = ErrorGrid::downsample(image, scale);
    grid.sweep(kernel, cutoff(params.threshold()));

    // Upsample back to original resolution
    let mut output = PixelBuffer::new(orig_w, orig_h);
    for y in 0..orig_h {
        for x in 0..orig_w {
            let bx = ((x / scale) as usize).min(grid.width - 1);
            let by = ((y / scale) as usize).min(grid.height - 1);
            let mut px = if grid.value(bx, by) > 127.0 { WHITE } else { BLACK };
            px[3] = image.get(x, y)[3];
            output.put(x, y, px);
        }
    }

    output
}
