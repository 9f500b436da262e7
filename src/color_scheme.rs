//! Colors: sensor series palette, the thermal lookup table and UI visuals.

use eframe::egui::{Color32, Context, Visuals};
use once_cell::sync::Lazy;

use crate::config::ColormapSettings;

/// Series colors, indexed by creation order.
pub const SENSOR_PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

/// Color of the `creation_index`-th chart series.
pub fn sensor_color(creation_index: usize) -> Color32 {
    SENSOR_PALETTE[creation_index % SENSOR_PALETTE.len()]
}

/// Number of entries in the thermal lookup table.
pub const LUT_SIZE: usize = 256;

/// HSV (all in [0, 1]) to 8-bit RGB, no gamma applied.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to8(r), to8(g), to8(b)]
}

/// Blue-to-red lookup table over a temperature range.
///
/// Hue ramps linearly from 0.67 to 0, value from 0.7 to 1, saturation is 1
/// and alpha 0.8. The first and last entries are fully transparent, so
/// temperatures at or below the minimum and at or above the maximum are not
/// drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalLut {
    min: f64,
    max: f64,
    table: Vec<Color32>,
}

impl ThermalLut {
    pub fn new(min: f64, max: f64) -> Self {
        let last = (LUT_SIZE - 1) as f64;
        let alpha = (0.8_f64 * 255.0).round() as u8;
        let mut table: Vec<Color32> = (0..LUT_SIZE)
            .map(|i| {
                let f = i as f64 / last;
                let h = 0.67 + (0.0 - 0.67) * f;
                let v = 0.7 + (1.0 - 0.7) * f;
                let [r, g, b] = hsv_to_rgb(h, 1.0, v);
                Color32::from_rgba_unmultiplied(r, g, b, alpha)
            })
            .collect();
        table[0] = Color32::TRANSPARENT;
        table[LUT_SIZE - 1] = Color32::TRANSPARENT;
        Self { min, max, table }
    }

    pub fn from_settings(settings: &ColormapSettings) -> Self {
        Self::new(settings.min_temperature, settings.max_temperature)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn entries(&self) -> &[Color32] {
        &self.table
    }

    /// Table index for a temperature, clamped to the table.
    pub fn index_for(&self, temperature: f64) -> usize {
        if !temperature.is_finite() || self.max <= self.min {
            return 0;
        }
        let scaled = (temperature - self.min) * (LUT_SIZE as f64 / (self.max - self.min));
        scaled.floor().clamp(0.0, (LUT_SIZE - 1) as f64) as usize
    }

    pub fn color_for(&self, temperature: f64) -> Color32 {
        self.table[self.index_for(temperature)]
    }
}

static DEFAULT_LUT: Lazy<ThermalLut> =
    Lazy::new(|| ThermalLut::from_settings(&ColormapSettings::default()));

/// The lookup table for the default 25–90 °C range.
pub fn default_lut() -> &'static ThermalLut {
    &DEFAULT_LUT
}

/// Visual theme for the viewer window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Dark,
    Light,
}

impl ColorScheme {
    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Dark => "Dark",
            ColorScheme::Light => "Light",
        }
    }

    pub fn apply(&self, ctx: &Context) {
        match self {
            ColorScheme::Dark => ctx.set_visuals(Visuals::dark()),
            ColorScheme::Light => ctx.set_visuals(Visuals::light()),
        }
    }
}
