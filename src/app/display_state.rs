//! UI-side copy of what the engine publishes: chart series, table rows and
//! the newest temperature field.
//!
//! Everything here is rebuilt from [`DisplayCommand`]s only; the UI never
//! reads engine state directly.

use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::egui::Color32;

use crate::color_scheme::sensor_color;
use crate::data::sensors::SensorId;
use crate::data::stack::TemperatureField;
use crate::sink::{DisplayCommand, SensorColumn};

/// One chart line.
#[derive(Debug, Clone)]
pub struct SensorSeries {
    pub key: SensorId,
    /// Legend name; follows the sensor description.
    pub label: String,
    pub color: Color32,
    /// `[sample_index, temperature]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Series keyed by sensor id, in creation order.
#[derive(Debug, Default)]
pub struct ChartState {
    series: Vec<SensorSeries>,
    created: usize,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point, creating the series on first use.
    ///
    /// A series created at sample index `n > 1` starts with zero points at
    /// `0..n-1` so all lines share one x axis.
    pub fn push_point(&mut self, key: &SensorId, label: &str, sample_index: u64, value: f64) {
        let pos = match self.series.iter().position(|s| &s.key == key) {
            Some(pos) => pos,
            None => {
                let prefill = sample_index.saturating_sub(1);
                let points = (0..prefill).map(|i| [i as f64, 0.0]).collect();
                self.series.push(SensorSeries {
                    key: key.clone(),
                    label: label.to_string(),
                    color: sensor_color(self.created),
                    points,
                });
                self.created += 1;
                self.series.len() - 1
            }
        };
        let s = &mut self.series[pos];
        if s.label != label {
            s.label = label.to_string();
        }
        s.points.push([sample_index as f64, value]);
    }

    pub fn remove(&mut self, key: &SensorId) {
        self.series.retain(|s| &s.key != key);
    }

    /// Drop every series; colors start over from the first palette entry.
    pub fn clear(&mut self) {
        self.series.clear();
        self.created = 0;
    }

    pub fn series(&self) -> &[SensorSeries] {
        &self.series
    }

    pub fn get(&self, key: &SensorId) -> Option<&SensorSeries> {
        self.series.iter().find(|s| &s.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One row of the sensor table.
#[derive(Debug, Clone)]
pub struct SensorRow {
    pub id: SensorId,
    pub description: String,
    pub temperature: String,
    /// Text edit buffer for the description cell.
    pub edit: String,
    /// The description cell has keyboard focus.
    pub editing: bool,
}

impl SensorRow {
    fn new(id: SensorId) -> Self {
        Self {
            id,
            description: String::new(),
            temperature: String::new(),
            edit: String::new(),
            editing: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SensorTable {
    rows: Vec<SensorRow>,
}

impl SensorTable {
    /// Set one cell, appending a row for an unknown sensor.
    pub fn set_cell(&mut self, id: &SensorId, column: SensorColumn, text: String) {
        let pos = match self.rows.iter().position(|r| &r.id == id) {
            Some(pos) => pos,
            None => {
                self.rows.push(SensorRow::new(id.clone()));
                self.rows.len() - 1
            }
        };
        let row = &mut self.rows[pos];
        match column {
            // rows are keyed by id; the cell only makes sure the row exists
            SensorColumn::Id => {}
            SensorColumn::Description => {
                if !row.editing {
                    row.edit = text.clone();
                }
                row.description = text;
            }
            SensorColumn::Temperature => row.temperature = text,
        }
    }

    pub fn remove(&mut self, id: &SensorId) {
        self.rows.retain(|r| &r.id != id);
    }

    pub fn rows(&self) -> &[SensorRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [SensorRow] {
        &mut self.rows
    }

    pub fn get(&self, id: &SensorId) -> Option<&SensorRow> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a click on the temperature image should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorPlacement {
    /// Place a new sensor.
    Add { id: SensorId, description: String },
    /// Move a sensor picked in the table.
    Move(SensorId),
}

#[derive(Debug, Default)]
pub struct DisplayState {
    pub chart: ChartState,
    pub table: SensorTable,
    /// Newest temperature field, `None` after a baseline reset.
    pub field: Option<Arc<TemperatureField>>,
    /// Bumped on every new field so views know to re-render.
    pub field_generation: u64,
    pub fields_received: u64,
    pub last_field_at: Option<DateTime<Local>>,
    next_sensor: u64,
    pending_move: Option<SensorId>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, cmd: DisplayCommand) {
        match cmd {
            DisplayCommand::ChartPoint {
                key,
                label,
                sample_index,
                value,
            } => self.chart.push_point(&key, &label, sample_index, value),
            DisplayCommand::ViewerImage(field) => {
                self.field = Some(field);
                self.field_generation += 1;
                self.fields_received += 1;
                self.last_field_at = Some(Local::now());
            }
            DisplayCommand::SensorCell {
                sensor,
                column,
                text,
            } => self.table.set_cell(&sensor, column, text),
            DisplayCommand::SensorRemoved(id) => {
                self.table.remove(&id);
                self.chart.remove(&id);
                if self.pending_move.as_ref() == Some(&id) {
                    self.pending_move = None;
                }
            }
            DisplayCommand::BaselineReset => {
                self.chart.clear();
                self.field = None;
                self.field_generation += 1;
                self.fields_received = 0;
                self.last_field_at = None;
            }
        }
    }

    /// Fresh id and default label for a sensor placed from the UI.
    pub fn next_sensor(&mut self) -> (SensorId, String) {
        self.next_sensor += 1;
        let n = self.next_sensor;
        (SensorId::new(format!("S-{n}")), format!("Sensor {n}"))
    }

    /// The next image click moves `id` instead of adding a sensor.
    pub fn begin_move(&mut self, id: SensorId) {
        self.pending_move = Some(id);
    }

    pub fn cancel_move(&mut self) {
        self.pending_move = None;
    }

    pub fn pending_move(&self) -> Option<&SensorId> {
        self.pending_move.as_ref()
    }

    /// Consume the pending move, or hand out a fresh sensor id.
    pub fn placement(&mut self) -> SensorPlacement {
        match self.pending_move.take() {
            Some(id) => SensorPlacement::Move(id),
            None => {
                let (id, description) = self.next_sensor();
                SensorPlacement::Add { id, description }
            }
        }
    }
}
