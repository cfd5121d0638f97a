//! Ink bleed: stochastic dilation of ink into neighboring paper pixels.

use crate::buffer::PixelBuffer;
use crate::dither::clamp_finite;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pixels below this luminance are ink.
pub const INK_LUMINANCE: f32 = 128.0;
pub const MAX_PASSES: u32 = 3;

/// Bled pixels carry the neighbor's ink at this opacity over white.
const BLEED_OPACITY: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkBleed {
    /// Spread strength in (0, 1].
    pub amount: f32,
    /// Variance of the per-pixel spread in [0, 1].
    pub roughness: f32,
}

impl Default for InkBleed {
    fn default() -> Self {
        Self { amount: 0.5, roughness: 0.5 }
    }
}

impl InkBleed {
    pub fn new(amount: f32, roughness: f32) -> Self {
        Self {
            amount: clamp_finite(amount, 0.0, 1.0, 0.0),
            roughness: clamp_finite(roughness, 0.0, 1.0, 0.0),
        }
    }

    pub fn passes(&self) -> u32 {
        ((self.amount * MAX_PASSES as f32).round() as u32).clamp(1, MAX_PASSES)
    }

    fn flip_probability(&self, roll: f32) -> f32 {
        (0.3 + self.amount * 0.5) * (1.0 - self.roughness * 0.5 + roll * self.roughness)
    }

    /// Runs every pass. A zero amount returns the buffer unchanged.
    pub fn apply<R: Rng + ?Sized>(&self, buffer: &PixelBuffer, rng: &mut R) -> PixelBuffer {
        let settings = InkBleed::new(self.amount, self.roughness);
        if settings.amount <= 0.0 || buffer.is_empty() {
            return buffer.clone();
        }
        let mut current = buffer.clone();
        for _ in 0..settings.passes() {
            current = settings.pass(&current, rng);
        }
        current
    }

    /// One dilation pass reading only from `input`.
    fn pass<R: Rng + ?Sized>(&self, input: &PixelBuffer, rng: &mut R) -> PixelBuffer {
        let (w, h) = input.dimensions();
        let is_ink = |x: u32, y: u32| input.luminance_at(x, y) < INK_LUMINANCE;
        let mut output = input.clone();

        for y in 0..h {
            for x in 0..w {
                if is_ink(x, y) {
                    continue;
                }
                let neighbors = [
                    (y > 0).then(|| (x, y - 1)),
                    (y + 1 < h).then(|| (x, y + 1)),
                    (x > 0).then(|| (x - 1, y)),
                    (x + 1 < w).then(|| (x + 1, y)),
                ];
                let hit = neighbors.into_iter().flatten().find(|&(nx, ny)| is_ink(nx, ny));
                let Some((nx, ny)) = hit else {
                    continue;
                };

                let p = self.flip_probability(rng.gen::<f32>());
                if rng.gen::<f32>() < p {
                    let ink = input.get(nx, ny);
                    let mut px = input.get(x, y);
                    for c in 0..3 {
                        let thinned = BLEED_OPACITY * ink[c] as f32 + (1.0 - BLEED_OPACITY) * 255.0;
                        px[c] = thinned.round() as u8;
                    }
                    output.put(x, y, px);
                }
            }
        }

        output
    }
}

/// Convenience wrapper over [`InkBleed::apply`].
pub fn bleed<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    amount: f32,
    roughness: f32,
    rng: &mut R,
) -> PixelBuffer {
    InkBleed::new(amount, roughness).apply(buffer, rng)
}
