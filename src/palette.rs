//! Named ink colors.

use crate::{Result, ScreenprintError};
use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

const DEFAULT_INKS: [(&str, &str); 12] = [
    ("black", "#1a1a1a"),
    ("white", "#ffffff"),
    ("cream", "#f4efe1"),
    ("cyan", "#00a5d9"),
    ("magenta", "#e4007c"),
    ("yellow", "#ffe600"),
    ("red", "#e53935"),
    ("orange", "#ff7a00"),
    ("pink", "#ff8fb8"),
    ("green", "#00a95c"),
    ("blue", "#3255a4"),
    ("navy", "#1b2a4a"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub hex: String,
    pub rgb: Rgb,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Result<Self> {
        let hex = hex.into();
        let rgb = parse_hex(&hex)?;
        Ok(Self { name: name.into(), hex, rgb })
    }
}

/// `{ "name": .., "hex": .. }` as stored in palette files.
#[derive(Deserialize)]
struct RawEntry {
    name: String,
    hex: String,
}

/// Parses `#rrggbb`, `rrggbb` or `#rgb`.
pub fn parse_hex(hex: &str) -> Result<Rgb> {
    let invalid = || ScreenprintError::InvalidHex(hex.to_string());
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        let entries = DEFAULT_INKS
            .iter()
            .map(|&(name, hex)| PaletteEntry::new(name, hex))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_default();
        Self { entries }
    }
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let entries = pairs
            .into_iter()
            .map(|(name, hex)| PaletteEntry::new(name, hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Loads `[{"name": "...", "hex": "#rrggbb"}, ...]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|e| PaletteEntry::new(e.name, e.hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a palette name, or a literal hex color.
    pub fn resolve(&self, key: &str) -> Result<Rgb> {
        if let Some(entry) = self.get(key) {
            return Ok(entry.rgb);
        }
        if key.trim_start().starts_with('#') {
            return parse_hex(key);
        }
        Err(ScreenprintError::UnknownColor(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_hex("#ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(parse_hex("00A5D9").unwrap(), [0, 165, 217]);
        assert_eq!(parse_hex("#fff").unwrap(), [255, 255, 255]);
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#gg0000").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn default_palette_is_complete() {
        let palette = Palette::default();
        assert_eq!(palette.entries().len(), DEFAULT_INKS.len());
        assert_eq!(palette.resolve("White").unwrap(), [255, 255, 255]);
    }

    #[test]
    fn resolve_falls_back_to_hex() {
        let palette = Palette::default();
        assert_eq!(palette.resolve("#000000").unwrap(), [0, 0, 0]);
        assert!(matches!(palette.resolve("chartreuse"), Err(ScreenprintError::UnknownColor(_))));
    }

    #[test]
    fn json_palette() {
        let palette = Palette::from_json(r##"[{"name":"ink","hex":"#102030"}]"##).unwrap();
        assert_eq!(palette.resolve("ink").unwrap(), [16, 32, 48]);
        assert!(Palette::from_json(r##"[{"name":"bad","hex":"#1"}]"##).is_err());
    }
}
