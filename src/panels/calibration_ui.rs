use eframe::egui;
use egui::Ui;

use crate::config::CalibrationParams;

use super::panel_trait::{Panel, PanelState, ViewerData};

/// Calibration inputs and the "Set baseline" action.
///
/// Edits here only take effect when the baseline is set; the engine keeps
/// using its last snapshot until then.
pub struct CalibrationPanel {
    pub state: PanelState,
    pub params: CalibrationParams,
    pub error: Option<String>,
}

impl CalibrationPanel {
    pub fn new(params: CalibrationParams) -> Self {
        Self {
            state: PanelState::new("Calibration", egui_phosphor::regular::SLIDERS),
            params,
            error: None,
        }
    }

    /// Validate the edited parameters and ask the engine to restart from them.
    pub fn set_baseline(&mut self, data: &ViewerData<'_>) {
        if let Err(e) = self.params.validate() {
            self.error = Some(e.to_string());
            return;
        }
        self.error = None;
        if data.events.set_baseline(self.params).is_err() {
            self.error = Some("engine is not running".into());
        }
    }
}

impl Default for CalibrationPanel {
    fn default() -> Self {
        Self::new(CalibrationParams::default())
    }
}

fn param_row(ui: &mut Ui, label: &str, value: &mut f64, speed: f64, suffix: &str) {
    ui.label(label);
    ui.add(egui::DragValue::new(value).speed(speed).suffix(suffix));
    ui.end_row();
}

impl Panel for CalibrationPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut ViewerData<'_>) {
        egui::Grid::new("calibration_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                let p = &mut self.params;
                param_row(ui, "Echo time", &mut p.echo_time, 0.0005, " s");
                param_row(ui, "Magnetic field", &mut p.magnetic_field, 0.1, " T");
                param_row(ui, "Gyromagnetic ratio", &mut p.gyromagnetic_ratio, 0.01, " MHz/T");
                param_row(ui, "Thermal coefficient", &mut p.thermal_coefficient, 0.0005, " ppm/°C");
                param_row(ui, "Scale factor", &mut p.scale_factor, 1.0, "");
                param_row(ui, "Base temperature", &mut p.base_temperature, 0.1, " °C");
            });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui
                .button("Set baseline")
                .on_hover_text("Discard accumulated temperatures and use the next frame as reference")
                .clicked()
            {
                self.set_baseline(data);
            }
            if ui.button("Defaults").clicked() {
                self.params = CalibrationParams::default();
            }
        });
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::from_rgb(214, 39, 40), err);
        }
    }
}
