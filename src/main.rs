//! screenprint CLI - Stylize an image as a limited-palette screen print

use clap::Parser;
use screenprint::{
    DitherType, InkBleed, Layer, Mode, Palette, PixelBuffer, RenderParams, Renderer,
    ScreenprintError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screenprint", about = "Render an image as a screen print")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Output image file (format from extension)
    output: PathBuf,
    /// JSON preset with the full parameter set
    #[arg(short, long)]
    params: Option<PathBuf>,
    /// JSON palette: [{"name": "...", "hex": "#rrggbb"}, ...]
    #[arg(long)]
    palette: Option<PathBuf>,
    /// Seed for reproducible ink bleed
    #[arg(long)]
    seed: Option<u64>,
    /// Export upscale factor (1, 2 or 4)
    #[arg(short, long, default_value_t = 1, value_parser = export_scale)]
    scale: u32,
    /// Dither algorithm for the quick single-ink mode
    #[arg(short, long, default_value = "halftone-circle")]
    dither: String,
    /// Ink color (palette name or hex) for the quick mode
    #[arg(short, long, default_value = "black")]
    color: String,
    /// Dither threshold (0.0-1.0)
    #[arg(short, long, default_value = "0.5")]
    threshold: f32,
    /// Dot/cell size in pixels
    #[arg(long, default_value = "6")]
    cell: u32,
    /// Screen angle in degrees
    #[arg(short, long, default_value = "45")]
    angle: f32,
    /// Invert the image
    #[arg(short, long)]
    invert: bool,
    /// Ink bleed amount (0.0-1.0), disabled when absent
    #[arg(short, long)]
    bleed: Option<f32>,
}

fn export_scale(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(factor @ (1 | 2 | 4)) => Ok(factor),
        Ok(factor) => Err(format!("{factor} is not one of 1, 2, 4")),
        Err(err) => Err(err.to_string()),
    }
}

impl Args {
    fn quick_params(&self) -> RenderParams {
        let layer = Layer {
            threshold: self.threshold,
            scale: self.cell,
            angle: self.angle,
            ..Layer::new(self.color.clone(), DitherType::from(self.dither.as_str()))
        };
        RenderParams {
            invert: self.invert,
            mode: Mode::Layers { layers: vec![layer] },
            ink_bleed: self.bleed.map(|amount| InkBleed::new(amount, 0.5)),
            ..RenderParams::default()
        }
    }
}

fn main() -> Result<(), ScreenprintError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut params = match &args.params {
        Some(path) => RenderParams::load(path)?,
        None => args.quick_params(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }

    let palette = match &args.palette {
        Some(path) => Palette::from_json(&std::fs::read_to_string(path)?)?,
        None => Palette::default(),
    };

    let image = image::open(&args.input)?;
    log::info!("loaded {} ({}x{})", args.input.display(), image.width(), image.height());

    let renderer = Renderer::new().with_palette(palette).with_params(params);
    let rendered = renderer.render(&PixelBuffer::from(&image))?;

    let output: image::RgbaImage = rendered.upscale(args.scale).into();
    output.save(&args.output)?;
    log::info!("wrote {} ({}x{})", args.output.display(), output.width(), output.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_parsed_as_a_factor() {
        let args = Args::try_parse_from(["screenprint", "in.png", "out.png", "--scale", "4"]);
        assert_eq!(args.unwrap().scale, 4);
        let args = Args::try_parse_from(["screenprint", "in.png", "out.png"]).unwrap();
        assert_eq!(args.scale, 1);
    }

    #[test]
    fn unsupported_scale_is_rejected() {
        for bad in ["3", "8", "0", "x"] {
            let args = Args::try_parse_from(["screenprint", "in.png", "out.png", "-s", bad]);
            assert!(args.is_err(), "{bad}");
        }
    }
}
