//! Per-frame update: drain display commands, then lay out menu, sidebar,
//! chart and image.

use std::time::Duration;

use eframe::egui;

use crate::color_scheme::ColorScheme;
use crate::config::ThermometryConfig;
use crate::panels::{Panel, ViewerData};

use super::ThermometryApp;

impl ThermometryApp {
    fn render_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save configuration…").clicked() {
                        self.save_config();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    self.image_panel.render_menu(ui);
                    self.chart_panel.render_menu(ui);
                    self.sensors_panel.render_menu(ui);
                    self.calibration_panel.render_menu(ui);
                    ui.separator();
                    for scheme in [ColorScheme::Dark, ColorScheme::Light] {
                        if ui
                            .radio_value(&mut self.color_scheme, scheme, scheme.label())
                            .changed()
                        {
                            self.scheme_applied = false;
                        }
                    }
                });
                ui.separator();
                if ui
                    .button(format!("{} Set baseline", egui_phosphor::regular::CROSSHAIR))
                    .clicked()
                {
                    let data = ViewerData {
                        display: &mut self.display,
                        events: &self.events,
                        config: &self.config,
                    };
                    self.calibration_panel.set_baseline(&data);
                }
            });
        });
    }

    fn render_status(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Images: {}", self.display.fields_received));
                ui.separator();
                ui.label(format!("Sensors: {}", self.display.table.len()));
                ui.separator();
                match self.display.last_field_at {
                    Some(t) => ui.label(format!("Last image {}", t.format("%H:%M:%S"))),
                    None => ui.weak("Waiting for baseline reference"),
                };
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.weak(status);
                }
            });
        });
    }

    fn save_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("thermometry.yaml")
            .add_filter("YAML", &["yaml", "yml"])
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let cfg = ThermometryConfig {
            calibration: self.calibration_panel.params,
            ..self.config.clone()
        };
        self.status = Some(match cfg.save(&path) {
            Ok(()) => {
                log::info!("configuration saved to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(e) => {
                log::warn!("{e}");
                e.to_string()
            }
        });
    }
}

fn side_panel_section(ui: &mut egui::Ui, panel: &mut dyn Panel, data: &mut ViewerData<'_>) {
    let st = panel.state();
    if !st.visible || st.detached {
        return;
    }
    let title = st.menu_label();
    egui::CollapsingHeader::new(title)
        .default_open(true)
        .show(ui, |ui| {
            if ui
                .small_button("Detach")
                .on_hover_text("Show this panel in its own window")
                .clicked()
            {
                panel.state_mut().detached = true;
            }
            panel.render_panel(ui, data);
        });
}

impl eframe::App for ThermometryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.scheme_applied {
            self.color_scheme.apply(ctx);
            self.scheme_applied = true;
        }

        self.update_data();
        self.render_menu(ctx);
        self.render_status(ctx);

        let mut data = ViewerData {
            display: &mut self.display,
            events: &self.events,
            config: &self.config,
        };

        let side_visible = [self.sensors_panel.state(), self.calibration_panel.state()]
            .iter()
            .any(|s| s.visible && !s.detached);
        if side_visible {
            egui::SidePanel::right("side_panels")
                .resizable(true)
                .default_width(380.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        side_panel_section(ui, &mut self.sensors_panel, &mut data);
                        side_panel_section(ui, &mut self.calibration_panel, &mut data);
                    });
                });
        }

        for panel in [
            &mut self.sensors_panel as &mut dyn Panel,
            &mut self.calibration_panel,
        ] {
            let st = panel.state();
            if st.visible && st.detached {
                panel.show_detached(ctx, &mut data);
            }
        }

        if self.chart_panel.state.visible {
            egui::TopBottomPanel::bottom("chart_panel")
                .resizable(true)
                .default_height(320.0)
                .show(ctx, |ui| {
                    self.chart_panel.render_panel(ui, &mut data);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.image_panel.state.visible {
                self.image_panel.render_panel(ui, &mut data);
            }
        });

        // Frames arrive on another thread; keep polling the channel.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
