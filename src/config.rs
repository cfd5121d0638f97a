//! Render parameters as loaded from presets or built by callers.

use crate::bleed::InkBleed;
use crate::gradient::GradientSpec;
use crate::layer::{CanvasSpec, Layer};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which branch of the pipeline runs after tone adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mode {
    Layers { layers: Vec<Layer> },
    Gradient(GradientSpec),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Layers { layers: vec![Layer::default()] }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderParams {
    /// Additive brightness in [-0.5, 0.5].
    pub brightness: f32,
    /// Contrast in [-0.5, 0.5].
    pub contrast: f32,
    pub invert: bool,
    pub mode: Mode,
    /// Layer mode only; `None` disables bleeding.
    pub ink_bleed: Option<InkBleed>,
    /// Palette name or hex color painted before the first layer.
    pub background: String,
    /// Defaults to the source dimensions; unset sizes do too.
    pub canvas: Option<CanvasSpec>,
    /// Seeds the random source; renders with the same seed are identical.
    pub seed: Option<u64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            invert: false,
            mode: Mode::default(),
            ink_bleed: None,
            background: "white".into(),
            canvas: None,
            seed: None,
        }
    }
}

impl RenderParams {
    pub fn layers(layers: Vec<Layer>) -> Self {
        Self { mode: Mode::Layers { layers }, ..Self::default() }
    }

    pub fn gradient(spec: GradientSpec) -> Self {
        Self { mode: Mode::Gradient(spec), ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
