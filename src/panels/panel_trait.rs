use eframe::egui;
use egui::Ui;

use crate::app::DisplayState;
use crate::config::ThermometryConfig;
use crate::events::EventSender;

/// Visibility and docking state shared by all side panels.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub title: &'static str,
    pub icon: &'static str,
    pub visible: bool,
    /// Shown as a floating window instead of in the sidebar.
    pub detached: bool,
}

impl PanelState {
    pub fn new(title: &'static str, icon: &'static str) -> Self {
        Self {
            title,
            icon,
            visible: true,
            detached: false,
        }
    }

    pub fn menu_label(&self) -> String {
        format!("{} {}", self.icon, self.title)
    }
}

/// Everything a panel may read or change during one UI frame.
pub struct ViewerData<'a> {
    pub display: &'a mut DisplayState,
    pub events: &'a EventSender,
    pub config: &'a ThermometryConfig,
}

pub trait Panel {
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    fn render_panel(&mut self, ui: &mut Ui, data: &mut ViewerData<'_>);

    /// Entry in the "View" menu.
    fn render_menu(&mut self, ui: &mut Ui) {
        let label = self.state().menu_label();
        let st = self.state_mut();
        ui.checkbox(&mut st.visible, label);
    }

    /// Floating window for a detached panel. Closing it hides the panel;
    /// "Dock" moves it back to the sidebar.
    fn show_detached(&mut self, ctx: &egui::Context, data: &mut ViewerData<'_>) {
        let title = self.state().title;
        let mut open = self.state().visible;
        let mut dock_clicked = false;
        egui::Window::new(title).open(&mut open).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button("Dock")
                        .on_hover_text("Attach this panel to the right sidebar")
                        .clicked()
                    {
                        dock_clicked = true;
                    }
                });
            });
            ui.separator();
            self.render_panel(ui, data);
        });
        let st = self.state_mut();
        st.visible = open;
        if dock_clicked {
            st.detached = false;
        }
    }
}
