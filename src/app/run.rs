use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::config::ThermometryConfig;
use crate::events::EventSender;
use crate::sink::DisplayCommand;

use super::ThermometryApp;

/// Open the viewer window and block until it is closed.
///
/// `rx` is the display channel fed by the engine's `ChartSink`; `events`
/// posts sensor edits and baseline requests back to the engine.
pub fn run_viewer(
    rx: Receiver<DisplayCommand>,
    events: EventSender,
    cfg: ThermometryConfig,
) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let app = ThermometryApp::new(rx, events, cfg);

    let mut opts = eframe::NativeOptions::default();
    opts.viewport = opts
        .viewport
        .clone()
        .with_inner_size(egui::vec2(1400.0, 900.0));

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
