use eframe::egui;
use egui::Ui;
use egui_plot::{Legend, Line, Plot, Points};

use super::panel_trait::{Panel, PanelState, ViewerData};

/// Strip chart of every sensor's temperature against image number.
pub struct ChartPanel {
    pub state: PanelState,
    pub show_points: bool,
    /// Follow the newest samples instead of keeping the user's zoom.
    pub auto_bounds: bool,
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Chart", egui_phosphor::regular::CHART_LINE),
            show_points: false,
            auto_bounds: true,
        }
    }
}

impl Panel for ChartPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut ViewerData<'_>) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.show_points, "Markers");
            ui.checkbox(&mut self.auto_bounds, "Auto-fit");
            if data.display.chart.is_empty() {
                ui.weak("Click the image to place a sensor.");
            }
        });

        let chart = &data.config.chart;
        let mut plot = Plot::new("temperature_chart")
            .x_axis_label(chart.x_axis_title.clone())
            .y_axis_label(chart.y_axis_title.clone())
            .x_axis_formatter(|x, _range| format!("{:.0}", x.value))
            .allow_scroll(false);
        if chart.show_legend {
            plot = plot.legend(Legend::default());
        }
        if self.auto_bounds {
            plot = plot.auto_bounds(egui::Vec2b::new(true, true));
        }

        let series = data.display.chart.series();
        let show_points = self.show_points;
        plot.show(ui, |plot_ui| {
            for s in series {
                plot_ui.line(
                    Line::new(s.label.clone(), s.points.clone())
                        .color(s.color)
                        .width(1.5),
                );
                if show_points && !s.points.is_empty() {
                    plot_ui.points(
                        Points::new(s.label.clone(), s.points.clone())
                            .radius(2.0)
                            .color(s.color),
                    );
                }
            }
        });
    }
}
