//! Brightness/contrast and inversion, applied before any dithering.

use crate::buffer::PixelBuffer;
use crate::dither::clamp_finite;

pub const TONE_LIMIT: f32 = 0.5;

/// Classic contrast factor for `c` in [-0.5, 0.5].
pub fn contrast_factor(contrast: f32) -> f32 {
    let c = contrast * 255.0;
    259.0 * (c + 255.0) / (255.0 * (259.0 - c))
}

/// Adds `brightness * 255`, then stretches around 128. Alpha is untouched.
pub fn apply_brightness_contrast(
    buffer: &PixelBuffer,
    brightness: f32,
    contrast: f32,
) -> PixelBuffer {
    let brightness = clamp_finite(brightness, -TONE_LIMIT, TONE_LIMIT, 0.0);
    let contrast = clamp_finite(contrast, -TONE_LIMIT, TONE_LIMIT, 0.0);
    let offset = brightness * 255.0;
    let factor = contrast_factor(contrast);

    let mut output = buffer.clone();
    for px in output.as_raw_mut().chunks_exact_mut(4) {
        for channel in &mut px[..3] {
            let v = *channel as f32 + offset;
            *channel = (factor * (v - 128.0) + 128.0).round().clamp(0.0, 255.0) as u8;
        }
    }
    output
}

pub fn invert(buffer: &PixelBuffer) -> PixelBuffer {
    let mut output = buffer.clone();
    for px in output.as_raw_mut().chunks_exact_mut(4) {
        for channel in &mut px[..3] {
            *channel = 255 - *channel;
        }
    }
    output
}
