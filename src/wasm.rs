//! WebAssembly bindings for screenprint

use crate::{render, Palette, PixelBuffer, RenderParams};
use wasm_bindgen::prelude::*;

fn to_js(err: crate::ScreenprintError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WasmRenderer {
    palette: Palette,
    params: RenderParams,
}

#[wasm_bindgen]
impl WasmRenderer {
    /// Create a renderer, optionally with a JSON palette
    /// (`[{"name": "...", "hex": "#rrggbb"}, ...]`); the built-in inks otherwise.
    #[wasm_bindgen(constructor)]
    pub fn new(palette_json: Option<String>) -> Result<WasmRenderer, JsValue> {
        let palette = match palette_json {
            Some(json) => Palette::from_json(&json).map_err(to_js)?,
            None => Palette::default(),
        };
        Ok(WasmRenderer { palette, params: RenderParams::default() })
    }

    /// Replace the parameter set from a JSON preset.
    #[wasm_bindgen]
    pub fn set_params(&mut self, json: &str) -> Result<(), JsValue> {
        self.params = RenderParams::from_json(json).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.params.seed = seed;
    }

    /// Render RGBA pixel data, returning RGBA bytes of the canvas
    /// (ready for `ImageData`).
    #[wasm_bindgen]
    pub fn render(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<js_sys::Uint8ClampedArray, JsValue> {
        let source = PixelBuffer::from_raw(width, height, image_data.to_vec()).map_err(to_js)?;
        let output = render(&source, &self.params, &self.palette).map_err(|err| {
            web_sys::console::warn_1(&JsValue::from_str(&format!("render failed: {err}")));
            to_js(err)
        })?;
        Ok(js_sys::Uint8ClampedArray::from(output.as_raw()))
    }
}
