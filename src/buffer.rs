//! RGBA8 raster container shared by every pipeline stage.

use crate::{Result, ScreenprintError};
use image::RgbaImage;

/// Rec. 601 luma weights used everywhere a pixel is reduced to one value.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Luminance of an RGB triple in 0..=255.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Row-major RGBA8 pixels. `pixels.len() == width * height * 4` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize * 4] }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(ScreenprintError::InvalidBuffer {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Empty buffer of the same shape, used as the zero-size no-op result.
    fn empty_like(&self) -> Self {
        Self::new(self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    #[inline]
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Luminance at (x, y) in 0..=255.
    #[inline]
    pub fn luminance_at(&self, x: u32, y: u32) -> f32 {
        let i = self.index(x, y);
        luminance(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Luminance at a clamped position, for samplers that may step off-canvas.
    pub fn luminance_clamped(&self, x: i64, y: i64) -> f32 {
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        self.luminance_at(x, y)
    }

    /// Opaque gray buffer from per-pixel lightness values in 0..=255.
    pub fn from_gray(width: u32, height: u32, values: &[f32]) -> Self {
        let mut pixels = Vec::with_capacity(values.len() * 4);
        for &v in values {
            let g = v.round().clamp(0.0, 255.0) as u8;
            pixels.extend_from_slice(&[g, g, g, 255]);
        }
        Self { width, height, pixels }
    }

    /// Nearest-neighbor upscale for export. Never used inside the pipeline.
    pub fn upscale(&self, factor: u32) -> Self {
        let factor = factor.max(1);
        if factor == 1 || self.is_empty() {
            return self.clone();
        }
        let (w, h) = (self.width * factor, self.height * factor);
        let mut out = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                out.put(x, y, self.get(x / factor, y / factor));
            }
        }
        out
    }

    pub(crate) fn blank_if_empty(&self) -> Option<Self> {
        self.is_empty().then(|| self.empty_like())
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, pixels: image.into_raw() }
    }
}

impl From<&image::DynamicImage> for PixelBuffer {
    fn from(image: &image::DynamicImage) -> Self {
        image.to_rgba8().into()
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        // Length invariant is upheld by every constructor.
        RgbaImage::from_raw(buffer.width, buffer.height, buffer.pixels)
            .unwrap_or_else(|| RgbaImage::new(0, 0))
    }
}
