//! Layer stack: misregistered, dithered ink layers folded onto a base canvas.

use crate::blend::{ink_alpha, BlendMode};
use crate::bleed::InkBleed;
use crate::buffer::{PixelBuffer, WHITE};
use crate::dither::{clamp_finite, dither, DitherParams, DitherType};
use crate::palette::{Palette, Rgb};
use crate::{Result, ScreenprintError};
use rand::Rng;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const MAX_LAYERS: usize = 4;
pub const MAX_OFFSET: i32 = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layer {
    /// Palette name or hex color of the ink.
    pub color_key: String,
    pub dither_type: DitherType,
    pub threshold: f32,
    pub scale: u32,
    pub angle: f32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub blend_mode: BlendMode,
    pub opacity: f32,
    pub visible: bool,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            color_key: "black".into(),
            dither_type: DitherType::HalftoneCircle,
            threshold: 0.5,
            scale: 6,
            angle: 45.0,
            offset_x: 0,
            offset_y: 0,
            blend_mode: BlendMode::Multiply,
            opacity: 1.0,
            visible: true,
        }
    }
}

impl Layer {
    pub fn new(color_key: impl Into<String>, dither_type: DitherType) -> Self {
        Self { color_key: color_key.into(), dither_type, ..Self::default() }
    }

    pub fn dither_params(&self) -> DitherParams {
        DitherParams::new(self.threshold, self.scale, self.angle)
    }

    pub fn offset(&self) -> (i32, i32) {
        (
            self.offset_x.clamp(-MAX_OFFSET, MAX_OFFSET),
            self.offset_y.clamp(-MAX_OFFSET, MAX_OFFSET),
        )
    }

    pub fn opacity(&self) -> f32 {
        clamp_finite(self.opacity, 0.0, 1.0, 1.0)
    }
}

/// Output raster size and where its origin sits in source coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Canvas {
    pub fn for_source(source: &PixelBuffer) -> Self {
        Self { width: source.width(), height: source.height(), offset_x: 0, offset_y: 0 }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Canvas as requested by a preset. Missing sizes follow the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl CanvasSpec {
    pub fn resolve(&self, source: &PixelBuffer) -> Canvas {
        Canvas {
            width: self.width.unwrap_or(source.width()),
            height: self.height.unwrap_or(source.height()),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

/// Maps canvas pixels to source pixels for one layer.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    dx: i64,
    dy: i64,
    source_w: u32,
    source_h: u32,
}

impl Placement {
    pub fn new(source: &PixelBuffer, canvas: Canvas, (offset_x, offset_y): (i32, i32)) -> Self {
        Self {
            dx: canvas.offset_x as i64 - offset_x as i64,
            dy: canvas.offset_y as i64 - offset_y as i64,
            source_w: source.width(),
            source_h: source.height(),
        }
    }

    #[inline]
    pub fn source_xy(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let sx = x as i64 + self.dx;
        let sy = y as i64 + self.dy;
        let inside = (0..self.source_w as i64).contains(&sx)
            && (0..self.source_h as i64).contains(&sy);
        inside.then_some((sx as u32, sy as u32))
    }

    /// Canvas-sized copy of the source; uncovered pixels are paper.
    pub fn sample(&self, source: &PixelBuffer, canvas: Canvas) -> PixelBuffer {
        let mut out = PixelBuffer::filled(canvas.width, canvas.height, WHITE);
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                if let Some((sx, sy)) = self.source_xy(x, y) {
                    out.put(x, y, source.get(sx, sy));
                }
            }
        }
        out
    }
}

/// A validated layer with its ink color resolved.
struct Plate<'a> {
    layer: &'a Layer,
    color: Rgb,
    placement: Placement,
}

impl Plate<'_> {
    fn dither(&self, source: &PixelBuffer, canvas: Canvas) -> PixelBuffer {
        let shifted = self.placement.sample(source, canvas);
        dither(&shifted, self.layer.dither_type, self.layer.dither_params())
    }

    /// Composites the plate's ink over `base` using darkness-derived alpha.
    fn paint(&self, mut base: PixelBuffer, inked: &PixelBuffer) -> PixelBuffer {
        let (w, h) = base.dimensions();
        let opacity = self.layer.opacity();
        let mode = self.layer.blend_mode;
        for y in 0..h {
            for x in 0..w {
                if self.placement.source_xy(x, y).is_none() {
                    continue;
                }
                let Some(alpha) = ink_alpha(inked.luminance_at(x, y), opacity) else {
                    continue;
                };
                let mut px = base.get(x, y);
                for c in 0..3 {
                    let v = mode.apply(px[c] as f32, self.color[c] as f32, alpha);
                    px[c] = v.round().clamp(0.0, 255.0) as u8;
                }
                base.put(x, y, px);
            }
        }
        base
    }
}

pub fn validate_layers(layers: &[Layer]) -> Result<()> {
    match layers.len() {
        0 => Err(ScreenprintError::EmptyLayerStack),
        n if n > MAX_LAYERS => Err(ScreenprintError::TooManyLayers(n)),
        _ => Ok(()),
    }
}

/// Everything a stack render needs besides the layers themselves.
#[derive(Clone, Copy, Debug)]
pub struct StackContext<'a> {
    pub palette: &'a Palette,
    pub canvas: Canvas,
    pub background: Rgb,
    pub ink_bleed: Option<InkBleed>,
}

/// Dithers each visible layer and folds them in order onto the background.
pub fn composite<R: Rng + ?Sized>(
    source: &PixelBuffer,
    layers: &[Layer],
    ctx: StackContext<'_>,
    rng: &mut R,
) -> Result<PixelBuffer> {
    validate_layers(layers)?;
    let canvas = ctx.canvas;
    let [r, g, b] = ctx.background;
    let base = PixelBuffer::filled(canvas.width, canvas.height, [r, g, b, 255]);
    if base.is_empty() {
        return Ok(base);
    }

    let plates = layers
        .iter()
        .filter(|layer| layer.visible)
        .map(|layer| {
            ctx.palette.resolve(&layer.color_key).map(|color| Plate {
                layer,
                color,
                placement: Placement::new(source, canvas, layer.offset()),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("compositing {} of {} layers", plates.len(), layers.len());

    // Plates are independent until compositing, which must stay in order.
    #[cfg(not(target_arch = "wasm32"))]
    let inked: Vec<PixelBuffer> = plates.par_iter().map(|p| p.dither(source, canvas)).collect();
    #[cfg(target_arch = "wasm32")]
    let inked: Vec<PixelBuffer> = plates.iter().map(|p| p.dither(source, canvas)).collect();

    let result = plates.iter().zip(inked).fold(base, |acc, (plate, inked)| {
        let inked = match ctx.ink_bleed {
            Some(bleed) => bleed.apply(&inked, &mut *rng),
            None => inked,
        };
        plate.paint(acc, &inked)
    });

    Ok(result)
}
