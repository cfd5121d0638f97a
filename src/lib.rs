//! Screen-print stylizer: tone adjustment, dithering, halftones and layered
//! ink compositing over RGBA rasters.

pub mod blend;
pub mod bleed;
pub mod buffer;
pub mod config;
pub mod diffusion;
pub mod dither;
pub mod gradient;
pub mod halftone;
pub mod layer;
pub mod ordered;
pub mod palette;
pub mod stipple;
pub mod tone;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use blend::BlendMode;
pub use bleed::InkBleed;
pub use buffer::PixelBuffer;
pub use config::{Mode, RenderParams};
pub use dither::{dither, DitherParams, DitherType};
pub use gradient::GradientSpec;
pub use layer::{Canvas, CanvasSpec, Layer};
pub use palette::{Palette, PaletteEntry};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenprintError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Gradient needs 2 to 4 stops, got {stops}")]
    InvalidGradient { stops: usize },
    #[error("Layer stack is empty")]
    EmptyLayerStack,
    #[error("At most 4 layers are supported, got {0}")]
    TooManyLayers(usize),
    #[error("Unknown color: {0}")]
    UnknownColor(String),
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Pixel data of {len} bytes does not fit {width}x{height} RGBA")]
    InvalidBuffer { width: u32, height: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, ScreenprintError>;

/// Renders `source` with a random source seeded from `params.seed`.
pub fn render(
    source: &PixelBuffer,
    params: &RenderParams,
    palette: &Palette,
) -> Result<PixelBuffer> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    render_with_rng(source, params, palette, &mut rng)
}

/// Full pipeline: tone adjustment, then either the gradient map or the
/// layer stack. `rng` is only consumed by ink bleed.
pub fn render_with_rng<R: Rng + ?Sized>(
    source: &PixelBuffer,
    params: &RenderParams,
    palette: &Palette,
    rng: &mut R,
) -> Result<PixelBuffer> {
    let background = palette.resolve(&params.background)?;
    let canvas = params.canvas.unwrap_or_default().resolve(source);
    match &params.mode {
        Mode::Layers { layers } => layer::validate_layers(layers)?,
        Mode::Gradient(spec) => gradient::validate_stops(spec.stops.len())?,
    }

    let mut toned = tone::apply_brightness_contrast(source, params.brightness, params.contrast);
    if params.invert {
        toned = tone::invert(&toned);
    }

    match &params.mode {
        Mode::Layers { layers } => {
            log::debug!("layer render {}x{}", canvas.width, canvas.height);
            let ctx = layer::StackContext {
                palette,
                canvas,
                background,
                ink_bleed: params.ink_bleed,
            };
            layer::composite(&toned, layers, ctx, rng)
        }
        Mode::Gradient(spec) => {
            log::debug!(
                "gradient render with {} stops, dither {}",
                spec.stops.len(),
                spec.dither_type
            );
            let stops = spec
                .stops
                .iter()
                .map(|key| palette.resolve(key))
                .collect::<Result<Vec<_>>>()?;
            let placement = layer::Placement::new(&toned, canvas, (0, 0));
            let sampled = placement.sample(&toned, canvas);
            let mapped = gradient::map(&sampled, &stops, spec.dither_type, spec.dither_params())?;
            Ok(fill_uncovered(mapped, &placement, background))
        }
    }
}

/// Paints canvas pixels that fall outside the source with the background.
fn fill_uncovered(
    mut buffer: PixelBuffer,
    placement: &layer::Placement,
    [r, g, b]: palette::Rgb,
) -> PixelBuffer {
    let (w, h) = buffer.dimensions();
    for y in 0..h {
        for x in 0..w {
            if placement.source_xy(x, y).is_none() {
                buffer.put(x, y, [r, g, b, 255]);
            }
        }
    }
    buffer
}

/// Main renderer, holding a palette and the current parameter set
pub struct Renderer {
    palette: Palette,
    params: RenderParams,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { palette: Palette::default(), params: RenderParams::default() }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_params(mut self, params: RenderParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn render(&self, source: &PixelBuffer) -> Result<PixelBuffer> {
        render(source, &self.params, &self.palette)
    }

    pub fn render_image(&self, image: &image::DynamicImage) -> Result<image::RgbaImage> {
        Ok(self.render(&PixelBuffer::from(image))?.into())
    }
}
