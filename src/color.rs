use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use rusty_dashboards::data::Value;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous blue scale
// ---------------------------------------------------------------------------

/// Sequential blue scale from `#DEEBF7` (t = 0) to `#08306B` (t = 1).
pub fn blues(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 1.0 };
    let light: LinSrgb = Srgb::<u8>::new(0xDE, 0xEB, 0xF7)
        .into_format::<f32>()
        .into_linear();
    let dark: LinSrgb = Srgb::<u8>::new(0x08, 0x30, 0x6B)
        .into_format::<f32>()
        .into_linear();
    let rgb: Srgb = Srgb::from_linear(light.mix(dark, t));
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Colour each value by its position between the smallest and largest one.
pub fn blues_by_value(values: &[f64]) -> Vec<Color32> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|v| {
            if max > min {
                blues((v - min) / (max - min))
            } else {
                blues(1.0)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps category values to distinct colours.
///
/// Built once from the widget options, so a category keeps its colour while
/// filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::LIGHT_BLUE,
        }
    }
}

impl ColorMap {
    /// Assign palette colours to `values` in the given order.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let values: Vec<&Value> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<Value, Color32> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            ..Default::default()
        }
    }

    /// Pin a value to a specific colour.
    pub fn with(mut self, value: impl Into<Value>, color: Color32) -> Self {
        self.mapping.insert(value.into(), color);
        self
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
