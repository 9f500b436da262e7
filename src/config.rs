//! Configuration: calibration parameters, display settings and the demo source.
//!
//! Files are YAML (`.yaml`/`.yml`) or JSON (anything else).

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThermometryError};

/// PRF-shift calibration snapshot taken by "set baseline".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    /// Echo time in seconds.
    pub echo_time: f64,
    /// Main field strength in tesla.
    pub magnetic_field: f64,
    /// Gyromagnetic ratio in MHz/T.
    pub gyromagnetic_ratio: f64,
    /// PRF thermal coefficient in ppm/°C.
    pub thermal_coefficient: f64,
    /// Raw phase units corresponding to π radians.
    pub scale_factor: f64,
    /// Temperature at the baseline, in °C.
    pub base_temperature: f64,
}

impl Default for CalibrationParams {
    /// Fixed-constant preset: 10 ms echo, 42.576 MHz/T, 3 T, 0.01 ppm/°C.
    fn default() -> Self {
        Self {
            echo_time: 0.010,
            magnetic_field: 3.0,
            gyromagnetic_ratio: 42.576,
            thermal_coefficient: 0.01,
            scale_factor: 4096.0,
            base_temperature: 37.0,
        }
    }
}

impl CalibrationParams {
    /// `1 / (TE * 2π * γ * B0 * α)`: °C per radian of accumulated phase.
    pub fn coefficient(&self) -> f64 {
        1.0 / (self.echo_time
            * 2.0
            * PI
            * self.gyromagnetic_ratio
            * self.magnetic_field
            * self.thermal_coefficient)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("echo_time", self.echo_time),
            ("magnetic_field", self.magnetic_field),
            ("gyromagnetic_ratio", self.gyromagnetic_ratio),
            ("thermal_coefficient", self.thermal_coefficient),
            ("scale_factor", self.scale_factor),
            ("base_temperature", self.base_temperature),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ThermometryError::InvalidCalibration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.scale_factor == 0.0 {
            return Err(ThermometryError::InvalidCalibration(
                "scale_factor must be non-zero".into(),
            ));
        }
        if !self.coefficient().is_finite() {
            return Err(ThermometryError::InvalidCalibration(
                "echo_time, gyromagnetic_ratio, magnetic_field and thermal_coefficient must be non-zero"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Temperature range mapped by the thermal colormap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapSettings {
    pub min_temperature: f64,
    pub max_temperature: f64,
}

impl Default for ColormapSettings {
    fn default() -> Self {
        Self {
            min_temperature: 25.0,
            max_temperature: 90.0,
        }
    }
}

/// Strip-chart labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub show_legend: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            x_axis_title: "Images".into(),
            y_axis_title: "Temperature (C)".into(),
            show_legend: true,
        }
    }
}

/// Synthetic heating phantom used by the demo binary in place of a scanner link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub dims: [usize; 3],
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    /// Delay between frames in milliseconds.
    pub frame_interval_ms: u64,
    /// Peak temperature rise at the focus in °C.
    pub peak_rise: f64,
    /// Frames until the peak rise is reached.
    pub ramp_frames: u32,
    /// Gaussian width of the heated spot, in voxels.
    pub focus_sigma: f64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            dims: [64, 64, 3],
            spacing: [2.0, 2.0, 5.0],
            origin: [-64.0, -64.0, -5.0],
            frame_interval_ms: 500,
            peak_rise: 30.0,
            ramp_frames: 60,
            focus_sigma: 5.0,
        }
    }
}

/// Default cap on retained temperature fields (five minutes at 2 images/s).
pub const DEFAULT_MAX_RETAINED_FIELDS: usize = 600;

/// Top-level configuration for the engine and the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermometryConfig {
    pub title: String,
    pub calibration: CalibrationParams,
    pub colormap: ColormapSettings,
    pub chart: ChartSettings,
    /// Keep at most this many temperature fields; `None` (`null` in a file)
    /// keeps all.
    pub max_retained_fields: Option<usize>,
    pub source: SourceSettings,
}

impl Default for ThermometryConfig {
    fn default() -> Self {
        Self {
            title: "RT Thermometry".into(),
            calibration: CalibrationParams::default(),
            colormap: ColormapSettings::default(),
            chart: ChartSettings::default(),
            max_retained_fields: Some(DEFAULT_MAX_RETAINED_FIELDS),
            source: SourceSettings::default(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl ThermometryConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| ThermometryError::Config(format!("YAML: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ThermometryError::Config(format!("JSON: {e}")))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ThermometryError::Config(format!("YAML: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ThermometryError::Config(format!("{}: {e}", path.display())))?;
        let cfg = if is_yaml(path) {
            Self::from_yaml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        cfg.calibration.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = if is_yaml(path) {
            self.to_yaml_string()?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| ThermometryError::Config(format!("JSON: {e}")))?
        };
        fs::write(path, text)
            .map_err(|e| ThermometryError::Config(format!("{}: {e}", path.display())))
    }
}
