//! Per-channel blend modes, all alpha-composited over the base.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dithered pixels at or below this darkness leave the canvas untouched.
pub const TRANSPARENT_DARKNESS: f32 = 0.02;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlendMode {
    Normal,
    #[default]
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl BlendMode {
    pub const ALL: [BlendMode; 6] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        BlendMode::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Raw blend result before alpha compositing.
    #[inline]
    fn mix(self, base: f32, blend: f32) -> f32 {
        match self {
            BlendMode::Normal => blend,
            BlendMode::Multiply => base * blend / 255.0,
            BlendMode::Screen => 255.0 - (255.0 - base) * (255.0 - blend) / 255.0,
            BlendMode::Overlay => {
                if base < 128.0 {
                    2.0 * base * blend / 255.0
                } else {
                    255.0 - 2.0 * (255.0 - base) * (255.0 - blend) / 255.0
                }
            }
            BlendMode::Darken => base.min(blend),
            BlendMode::Lighten => base.max(blend),
        }
    }

    /// Blends one channel: `mix * alpha + base * (1 - alpha)`.
    #[inline]
    pub fn apply(self, base: f32, blend: f32, alpha: f32) -> f32 {
        self.mix(base, blend) * alpha + base * (1.0 - alpha)
    }
}

impl From<&str> for BlendMode {
    /// Unknown keys fall back to multiply.
    fn from(key: &str) -> Self {
        BlendMode::from_key(key).unwrap_or_else(|| {
            log::warn!("unknown blend mode {key:?}, falling back to multiply");
            BlendMode::Multiply
        })
    }
}

impl From<String> for BlendMode {
    fn from(key: String) -> Self {
        BlendMode::from(key.as_str())
    }
}

impl From<BlendMode> for String {
    fn from(mode: BlendMode) -> Self {
        mode.key().to_string()
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Layer alpha for a dithered pixel, or `None` when it is paper.
#[inline]
pub fn ink_alpha(dithered_luminance: f32, opacity: f32) -> Option<f32> {
    let darkness = 1.0 - dithered_luminance / 255.0;
    (darkness > TRANSPARENT_DARKNESS).then(|| opacity * darkness)
}
