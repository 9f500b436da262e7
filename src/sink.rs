//! Outbound interface to the display collaborators (chart, sensor table, viewer).
//!
//! The engine talks to collaborators through [`DisplaySink`]. The usual
//! implementation is [`ChartSink`], which forwards [`DisplayCommand`]s over a
//! channel to the UI thread. A `Vec<DisplayCommand>` also implements the
//! trait and simply records the commands.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use crate::data::sensors::SensorId;
use crate::data::stack::TemperatureField;

/// Columns of the sensor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorColumn {
    Id,
    Description,
    Temperature,
}

/// Messages sent to the UI.
#[derive(Debug, Clone)]
pub enum DisplayCommand {
    /// Append a point to the sensor's chart series, creating the series on first use.
    ChartPoint {
        key: SensorId,
        label: String,
        sample_index: u64,
        value: f64,
    },
    /// Show a new temperature field.
    ViewerImage(Arc<TemperatureField>),
    /// Set the text of one table cell, adding the row if needed.
    SensorCell {
        sensor: SensorId,
        column: SensorColumn,
        text: String,
    },
    /// The sensor is gone: drop its table row and chart series.
    SensorRemoved(SensorId),
    /// Baseline was reset: clear all plot buffers and the viewer.
    BaselineReset,
}

/// Receiver side of the collaborator interface.
///
/// Collaborators get copies of computed values; fields are shared as
/// immutable `Arc`s and never change after being produced.
pub trait DisplaySink {
    fn add_chart_point(&mut self, key: &SensorId, label: &str, sample_index: u64, value: f64);
    fn set_viewer_image(&mut self, field: Arc<TemperatureField>);
    fn set_sensor_table_cell(&mut self, sensor: &SensorId, column: SensorColumn, text: String);
    fn remove_sensor(&mut self, sensor: &SensorId);
    fn on_baseline_reset(&mut self);
}

impl DisplaySink for Vec<DisplayCommand> {
    fn add_chart_point(&mut self, key: &SensorId, label: &str, sample_index: u64, value: f64) {
        self.push(DisplayCommand::ChartPoint {
            key: key.clone(),
            label: label.to_string(),
            sample_index,
            value,
        });
    }

    fn set_viewer_image(&mut self, field: Arc<TemperatureField>) {
        self.push(DisplayCommand::ViewerImage(field));
    }

    fn set_sensor_table_cell(&mut self, sensor: &SensorId, column: SensorColumn, text: String) {
        self.push(DisplayCommand::SensorCell {
            sensor: sensor.clone(),
            column,
            text,
        });
    }

    fn remove_sensor(&mut self, sensor: &SensorId) {
        self.push(DisplayCommand::SensorRemoved(sensor.clone()));
    }

    fn on_baseline_reset(&mut self) {
        self.push(DisplayCommand::BaselineReset);
    }
}

/// Sink that discards everything, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn add_chart_point(&mut self, _: &SensorId, _: &str, _: u64, _: f64) {}
    fn set_viewer_image(&mut self, _: Arc<TemperatureField>) {}
    fn set_sensor_table_cell(&mut self, _: &SensorId, _: SensorColumn, _: String) {}
    fn remove_sensor(&mut self, _: &SensorId) {}
    fn on_baseline_reset(&mut self) {}
}

/// Channel-backed sink feeding the viewer UI.
#[derive(Clone)]
pub struct ChartSink {
    tx: Sender<DisplayCommand>,
    disconnected: bool,
}

impl ChartSink {
    fn send(&mut self, cmd: DisplayCommand) {
        if self.tx.send(cmd).is_err() && !self.disconnected {
            // UI closed; the engine keeps running headless.
            log::warn!("display channel closed, dropping further display updates");
            self.disconnected = true;
        }
    }
}

impl DisplaySink for ChartSink {
    fn add_chart_point(&mut self, key: &SensorId, label: &str, sample_index: u64, value: f64) {
        self.send(DisplayCommand::ChartPoint {
            key: key.clone(),
            label: label.to_string(),
            sample_index,
            value,
        });
    }

    fn set_viewer_image(&mut self, field: Arc<TemperatureField>) {
        self.send(DisplayCommand::ViewerImage(field));
    }

    fn set_sensor_table_cell(&mut self, sensor: &SensorId, column: SensorColumn, text: String) {
        self.send(DisplayCommand::SensorCell {
            sensor: sensor.clone(),
            column,
            text,
        });
    }

    fn remove_sensor(&mut self, sensor: &SensorId) {
        self.send(DisplayCommand::SensorRemoved(sensor.clone()));
    }

    fn on_baseline_reset(&mut self) {
        self.send(DisplayCommand::BaselineReset);
    }
}

/// Create a new display channel pair: `(ChartSink, Receiver<DisplayCommand>)`.
pub fn channel_display() -> (ChartSink, Receiver<DisplayCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (
        ChartSink {
            tx,
            disconnected: false,
        },
        rx,
    )
}
