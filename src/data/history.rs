//! Per-sensor time series with a shared sample index.

use std::collections::HashMap;

use serde::Serialize;

use crate::sink::DisplaySink;

use super::sampler::SensorSampler;
use super::sensors::{SensorId, SensorRegistry};

/// One recorded reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorHistorySample {
    pub sensor_id: SensorId,
    pub sample_index: u64,
    pub value: f64,
}

/// A point of one sensor's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub sample_index: u64,
    pub value: f64,
}

/// Owns every sensor's series and the sample counter they share.
///
/// The counter advances once per recorded frame in which at least one sensor
/// exists, so an index denotes the same instant in all series.
#[derive(Debug, Default)]
pub struct SensorHistoryRecorder {
    sample_index: u64,
    series: HashMap<SensorId, Vec<HistoryPoint>>,
}

impl SensorHistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the last recorded frame; 0 before the first one.
    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    pub fn history(&self, id: &SensorId) -> &[HistoryPoint] {
        self.series.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sample every sensor against the current field, store the readings and
    /// forward them to the chart.
    pub fn record_frame(
        &mut self,
        sensors: &mut SensorRegistry,
        sampler: &SensorSampler<'_>,
        sink: &mut dyn DisplaySink,
    ) -> Vec<SensorHistorySample> {
        if sensors.is_empty() {
            return Vec::new();
        }
        self.sample_index += 1;
        let index = self.sample_index;

        let mut recorded = Vec::with_capacity(sensors.len());
        for sensor in sensors.iter_mut() {
            let value = sampler.sample(sensor);
            sensor.set_reading(value);
            self.series
                .entry(sensor.id.clone())
                .or_default()
                .push(HistoryPoint {
                    sample_index: index,
                    value,
                });
            sink.add_chart_point(&sensor.id, &sensor.description, index, value);
            recorded.push(SensorHistorySample {
                sensor_id: sensor.id.clone(),
                sample_index: index,
                value,
            });
        }
        recorded
    }

    /// Forget one sensor's series.
    pub fn remove(&mut self, id: &SensorId) {
        self.series.remove(id);
    }

    /// Clear all series and restart the sample index.
    pub fn reset(&mut self) {
        self.sample_index = 0;
        self.series.clear();
    }
}
