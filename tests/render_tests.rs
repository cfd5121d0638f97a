//! End-to-end renders through the public API.

use pretty_assertions::assert_eq;
use screenprint::{
    render, BlendMode, CanvasSpec, DitherType, GradientSpec, InkBleed, Layer, Mode, Palette,
    PixelBuffer, RenderParams, Renderer, ScreenprintError,
};

fn gray(width: u32, height: u32, v: u8) -> PixelBuffer {
    PixelBuffer::filled(width, height, [v, v, v, 255])
}

fn portrait(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255 / width.max(1)) ^ (y * 3)) as u8;
            buf.put(x, y, [v, v / 2, 255 - v, 255]);
        }
    }
    buf
}

#[test_log::test]
fn mid_gray_bayer4_single_layer() {
    let layer = Layer {
        threshold: 0.5,
        scale: 1,
        blend_mode: BlendMode::Normal,
        ..Layer::new("#000000", DitherType::Bayer4x4)
    };
    let params = RenderParams::layers(vec![layer]);
    let out = render(&gray(4, 4, 128), &params, &Palette::default()).unwrap();
    let rows: Vec<String> = (0..4)
        .map(|y| (0..4).map(|x| if out.get(x, y)[0] == 255 { 'W' } else { 'B' }).collect())
        .collect();
    assert_eq!(rows, vec!["WWWB", "BWBW", "WBWB", "BWBW"]);
}

#[test_log::test]
fn black_mask_black_ink_is_all_black() {
    let layer = Layer { blend_mode: BlendMode::Normal, ..Layer::new("#000000", DitherType::None) };
    let params = RenderParams::layers(vec![layer]);
    let out = render(&gray(6, 5, 0), &params, &Palette::default()).unwrap();
    assert_eq!(out, PixelBuffer::filled(6, 5, [0, 0, 0, 255]));
}

#[test_log::test]
fn two_stop_gradient_endpoints() {
    let mut src = PixelBuffer::new(2, 1);
    src.put(0, 0, [0, 0, 0, 255]);
    src.put(1, 0, [255, 255, 255, 255]);
    let stops = vec!["#102030".into(), "#f0e0d0".into()];
    let spec = GradientSpec { stops, ..GradientSpec::default() };
    let out = render(&src, &RenderParams::gradient(spec), &Palette::default()).unwrap();
    assert_eq!(out.get(0, 0), [0x10, 0x20, 0x30, 255]);
    assert_eq!(out.get(1, 0), [0xf0, 0xe0, 0xd0, 255]);
}

#[test_log::test]
fn gradient_with_one_stop_is_rejected() {
    let spec = GradientSpec { stops: vec!["navy".into()], ..GradientSpec::default() };
    let params = RenderParams::gradient(spec);
    let err = render(&gray(2, 2, 9), &params, &Palette::default()).unwrap_err();
    assert!(matches!(err, ScreenprintError::InvalidGradient { stops: 1 }));
}

#[test_log::test]
fn empty_stack_is_rejected() {
    let params = RenderParams::layers(vec![]);
    let err = render(&gray(2, 2, 9), &params, &Palette::default()).unwrap_err();
    assert!(matches!(err, ScreenprintError::EmptyLayerStack));
}

#[test_log::test]
fn seeded_bleed_is_reproducible() {
    let layers = vec![
        Layer { offset_x: -3, ..Layer::new("cyan", DitherType::HalftoneCircle) },
        Layer { angle: 75.0, offset_y: 2, ..Layer::new("magenta", DitherType::HalftoneCircle) },
        Layer::new("yellow", DitherType::FloydSteinberg),
        Layer { scale: 2, ..Layer::new("black", DitherType::Noise) },
    ];
    let params = RenderParams {
        ink_bleed: Some(InkBleed::new(0.8, 0.7)),
        seed: Some(42),
        ..RenderParams::layers(layers)
    };
    let src = portrait(40, 30);
    let a = render(&src, &params, &Palette::default()).unwrap();
    let b = render(&src, &params, &Palette::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.dimensions(), (40, 30));
}

#[test_log::test]
fn unseeded_render_without_bleed_is_deterministic() {
    let params = RenderParams::layers(vec![Layer::new("red", DitherType::HalftoneSquare)]);
    let src = portrait(17, 13);
    let a = render(&src, &params, &Palette::default()).unwrap();
    let b = render(&src, &params, &Palette::default()).unwrap();
    assert_eq!(a, b);
}

#[test_log::test]
fn invert_swaps_ink_and_paper() {
    let layer = Layer { blend_mode: BlendMode::Normal, ..Layer::new("#000000", DitherType::None) };
    let params = RenderParams { invert: true, ..RenderParams::layers(vec![layer]) };
    let out = render(&gray(3, 3, 255), &params, &Palette::default()).unwrap();
    assert_eq!(out, PixelBuffer::filled(3, 3, [0, 0, 0, 255]));
}

#[test_log::test]
fn background_fills_paper() {
    let params = RenderParams {
        background: "#336699".into(),
        ..RenderParams::layers(vec![Layer::new("black", DitherType::Bayer2x2)])
    };
    let out = render(&gray(4, 4, 255), &params, &Palette::default()).unwrap();
    assert_eq!(out, PixelBuffer::filled(4, 4, [0x33, 0x66, 0x99, 255]));
}

#[test_log::test]
fn larger_canvas_uses_background_outside_source() {
    let stops = vec!["#000000".into(), "#ffffff".into()];
    let spec = GradientSpec { stops, ..GradientSpec::default() };
    let params = RenderParams {
        background: "#ff0000".into(),
        canvas: Some(CanvasSpec { width: Some(4), height: Some(2), offset_x: -2, offset_y: 0 }),
        ..RenderParams::gradient(spec)
    };
    let out = render(&gray(2, 2, 0), &params, &Palette::default()).unwrap();
    assert_eq!(out.get(0, 0), [255, 0, 0, 255]);
    assert_eq!(out.get(3, 1), [0, 0, 0, 255]);
}

#[test_log::test]
fn zero_sized_source_is_noop() {
    let empty = PixelBuffer::new(0, 0);
    let out = render(&empty, &RenderParams::default(), &Palette::default()).unwrap();
    assert!(out.is_empty());
}

#[test_log::test]
fn canvas_offset_alone_keeps_source_size() {
    let json = r##"{
        "background": "#ff0000",
        "canvas": { "offsetX": 3 },
        "mode": {
            "type": "layers",
            "layers": [ { "colorKey": "#000000", "ditherType": "none", "blendMode": "normal" } ]
        }
    }"##;
    let params = RenderParams::from_json(json).unwrap();
    let out = render(&gray(8, 8, 0), &params, &Palette::default()).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    // Canvas column x samples source column x + 3.
    assert_eq!(out.get(4, 7), [0, 0, 0, 255]);
    assert_eq!(out.get(5, 0), [255, 0, 0, 255]);
}

#[test_log::test]
fn renderer_from_preset() {
    let json = r##"{
        "brightness": 0.1,
        "mode": {
            "type": "layers",
            "layers": [ { "colorKey": "navy", "ditherType": "atkinson", "scale": 3 } ]
        },
        "seed": 1
    }"##;
    let renderer = Renderer::new().with_params(RenderParams::from_json(json).unwrap());
    assert!(matches!(renderer.params().mode, Mode::Layers { .. }));
    let img = image::DynamicImage::ImageRgba8(portrait(12, 9).into());
    let out = renderer.render_image(&img).unwrap();
    assert_eq!(out.dimensions(), (12, 9));
}
