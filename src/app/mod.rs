//! Live viewer application.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`display_state`] | UI copy of chart series, table rows and the newest field |
//! | [`update`]        | Per-frame command intake and layout |
//! | [`run`]           | [`run_viewer()`] entry point |
//!
//! The app never touches the engine directly: it reads [`DisplayCommand`]s
//! from the display channel and posts [`crate::events::ThermometryEvent`]s
//! back through an [`EventSender`].

mod display_state;
mod run;
mod update;

pub use display_state::{
    ChartState, DisplayState, SensorPlacement, SensorRow, SensorSeries, SensorTable,
};
pub use run::run_viewer;

use std::sync::mpsc::Receiver;

use crate::color_scheme::{ColorScheme, ThermalLut};
use crate::config::ThermometryConfig;
use crate::events::EventSender;
use crate::panels::{CalibrationPanel, ChartPanel, ImagePanel, SensorsPanel};
use crate::sink::DisplayCommand;

/// eframe application showing the temperature image, the sensor table and
/// the strip chart.
pub struct ThermometryApp {
    pub display: DisplayState,
    rx: Receiver<DisplayCommand>,
    events: EventSender,
    config: ThermometryConfig,

    pub chart_panel: ChartPanel,
    pub image_panel: ImagePanel,
    pub sensors_panel: SensorsPanel,
    pub calibration_panel: CalibrationPanel,

    pub color_scheme: ColorScheme,
    scheme_applied: bool,
    status: Option<String>,
}

impl ThermometryApp {
    pub fn new(rx: Receiver<DisplayCommand>, events: EventSender, config: ThermometryConfig) -> Self {
        Self {
            display: DisplayState::new(),
            rx,
            events,
            chart_panel: ChartPanel::default(),
            image_panel: ImagePanel::new(ThermalLut::from_settings(&config.colormap)),
            sensors_panel: SensorsPanel::default(),
            calibration_panel: CalibrationPanel::new(config.calibration),
            config,
            color_scheme: ColorScheme::default(),
            scheme_applied: false,
            status: None,
        }
    }

    pub fn config(&self) -> &ThermometryConfig {
        &self.config
    }

    /// Apply every command queued since the last UI frame.
    pub fn update_data(&mut self) {
        while let Ok(cmd) = self.rx.try_recv() {
            self.display.apply(cmd);
        }
    }
}
