use eframe::egui;
use egui::Ui;
use egui_table::{HeaderRow as EgHeaderRow, Table, TableDelegate};

use crate::app::SensorRow;
use crate::data::sensors::SensorId;

use super::panel_trait::{Panel, PanelState, ViewerData};

/// Table of sensors: id, editable description, read-only temperature, a
/// "move on next click" toggle and a remove button per row.
pub struct SensorsPanel {
    pub state: PanelState,
}

impl Default for SensorsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Sensors", egui_phosphor::regular::THERMOMETER),
        }
    }
}

enum RowAction {
    Relabel(SensorId, String),
    Move(SensorId),
    CancelMove,
    Remove(SensorId),
}

struct SensorsDelegate<'a> {
    rows: &'a mut [SensorRow],
    moving: Option<&'a SensorId>,
    actions: Vec<RowAction>,
}

impl TableDelegate for SensorsDelegate<'_> {
    fn header_cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::HeaderCellInfo) {
        let text = match cell.col_range.start {
            0 => "ID",
            1 => "Description",
            2 => "Temperature",
            _ => "",
        };
        ui.add_space(4.0);
        ui.strong(text);
    }

    fn cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::CellInfo) {
        let Some(row) = self.rows.get_mut(cell.row_nr as usize) else {
            return;
        };
        ui.add_space(4.0);
        match cell.col_nr {
            0 => {
                ui.monospace(row.id.as_str());
            }
            1 => {
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut row.edit).desired_width(f32::INFINITY),
                );
                row.editing = resp.has_focus();
                if resp.lost_focus() && row.edit != row.description {
                    self.actions
                        .push(RowAction::Relabel(row.id.clone(), row.edit.clone()));
                }
            }
            2 => {
                ui.label(&row.temperature);
            }
            3 => {
                let moving = self.moving == Some(&row.id);
                let resp = ui
                    .selectable_label(moving, egui_phosphor::regular::CROSSHAIR)
                    .on_hover_text(if moving {
                        "Click the image to move this sensor, or click here to cancel"
                    } else {
                        "Move this sensor to the next clicked voxel"
                    });
                if resp.clicked() {
                    self.actions.push(if moving {
                        RowAction::CancelMove
                    } else {
                        RowAction::Move(row.id.clone())
                    });
                }
            }
            4 => {
                if ui
                    .small_button(egui_phosphor::regular::TRASH)
                    .on_hover_text("Remove this sensor")
                    .clicked()
                {
                    self.actions.push(RowAction::Remove(row.id.clone()));
                }
            }
            _ => {}
        }
    }
}

impl Panel for SensorsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut ViewerData<'_>) {
        ui.label("Click the temperature image to add a sensor. Edit a description and press Enter to rename it.");
        if let Some(id) = data.display.pending_move() {
            ui.colored_label(
                ui.visuals().warn_fg_color,
                format!("Next click on the image moves {id}"),
            );
        }
        ui.separator();

        let moving = data.display.pending_move().cloned();
        let rows = data.display.table.rows_mut();
        let num_rows = rows.len() as u64;
        let mut delegate = SensorsDelegate {
            rows,
            moving: moving.as_ref(),
            actions: Vec::new(),
        };
        Table::new()
            .id_salt("sensors_table")
            .num_rows(num_rows)
            .columns(vec![
                egui_table::Column::new(56.0),
                egui_table::Column::new(160.0),
                egui_table::Column::new(90.0),
                egui_table::Column::new(32.0),
                egui_table::Column::new(32.0),
            ])
            .headers(vec![EgHeaderRow::new(24.0)])
            .show(ui, &mut delegate);

        // Edits go through the engine; the table updates when it answers.
        for action in delegate.actions {
            let sent = match action {
                RowAction::Relabel(id, description) => {
                    data.events.relabel_sensor(id, description)
                }
                RowAction::Move(id) => {
                    data.display.begin_move(id);
                    Ok(())
                }
                RowAction::CancelMove => {
                    data.display.cancel_move();
                    Ok(())
                }
                RowAction::Remove(id) => data.events.remove_sensor(id),
            };
            if sent.is_err() {
                log::warn!("engine is not running, sensor edit dropped");
            }
        }
    }
}
