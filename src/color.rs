use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Dashboard series colours, in order of use.
pub const CHART_COLORS: [&str; 8] = [
    "#4a90e2", "#7b68ee", "#ff6b6b", "#51cf66", "#ffd43b", "#ff8cc8", "#06d6a0", "#f72585",
];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb: Srgb<u8> = hex.parse().ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// ChartPalette – fixed colours first, generated hues after
// ---------------------------------------------------------------------------

/// Colour source handed to the presentation layer at construction.
#[derive(Debug, Clone)]
pub struct ChartPalette {
    fixed: Vec<Color32>,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self::from_hex(&CHART_COLORS)
    }
}

impl ChartPalette {
    /// Build from `#rrggbb` strings; unparsable entries are skipped.
    pub fn from_hex(colors: &[&str]) -> Self {
        let fixed = colors
            .iter()
            .filter_map(|hex| {
                let parsed = parse_hex(hex);
                if parsed.is_none() {
                    log::warn!("Ignoring invalid palette colour {hex}");
                }
                parsed
            })
            .collect();
        ChartPalette { fixed }
    }

    /// `n` colours: the fixed ones first, evenly spaced hues for the rest.
    pub fn colors(&self, n: usize) -> Vec<Color32> {
        let mut out: Vec<Color32> = self.fixed.iter().take(n).copied().collect();
        if out.len() < n {
            out.extend(generate_palette(n - out.len()));
        }
        out
    }

    pub fn primary(&self) -> Color32 {
        self.fixed.first().copied().unwrap_or(Color32::LIGHT_BLUE)
    }

    /// The `i`-th fixed colour, wrapping around.
    pub fn nth(&self, i: usize) -> Color32 {
        if self.fixed.is_empty() {
            return Color32::LIGHT_BLUE;
        }
        self.fixed[i % self.fixed.len()]
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series key → Color32
// ---------------------------------------------------------------------------

/// Maps the series keys of one chart to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign palette colours to `keys` in the order given.
    pub fn new(keys: &[&str], palette: &ChartPalette) -> Self {
        let mapping = keys
            .iter()
            .zip(palette.colors(keys.len()))
            .map(|(k, c)| (k.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }
}
