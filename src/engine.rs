//! Thermometry engine: frame ingestion, sensor sampling and the baseline
//! state machine.
//!
//! The engine owns every piece of mutable state (accumulator, temperature
//! stack, sensors, histories) and handles one event at a time. A frame is
//! processed as a unit: either a new field is appended and every sensor is
//! sampled against it, or nothing changes.

use std::sync::Arc;

use log::{debug, info};

use crate::config::{CalibrationParams, ThermometryConfig};
use crate::data::accumulator::{Accumulated, PhaseAccumulator};
use crate::data::frame::PhaseFrame;
use crate::data::history::SensorHistoryRecorder;
use crate::data::mapper::CoordinateMapper;
use crate::data::sampler::SensorSampler;
use crate::data::sensors::{format_temperature, Sensor, SensorId, SensorRegistry};
use crate::data::stack::TemperatureStack;
use crate::error::{Result, ThermometryError};
use crate::sink::{DisplaySink, SensorColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No reference geometry and no accumulated data.
    Idle,
    /// Reference frame seen; every further frame yields a field.
    Accumulating,
}

/// What happened to an ingested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    ReferenceEstablished,
    Duplicate,
    FieldProduced {
        /// Arrival index in the temperature stack.
        field_index: usize,
        /// Shared sample index, `None` when no sensor was present.
        sample_index: Option<u64>,
    },
}

pub struct ThermometryEngine<S: DisplaySink> {
    accumulator: PhaseAccumulator,
    stack: TemperatureStack,
    mapper: CoordinateMapper,
    sensors: SensorRegistry,
    recorder: SensorHistoryRecorder,
    sink: S,
}

impl<S: DisplaySink> ThermometryEngine<S> {
    pub fn new(calibration: CalibrationParams, sink: S) -> Result<Self> {
        Ok(Self {
            accumulator: PhaseAccumulator::new(calibration)?,
            stack: TemperatureStack::new(),
            mapper: CoordinateMapper::new(),
            sensors: SensorRegistry::new(),
            recorder: SensorHistoryRecorder::new(),
            sink,
        })
    }

    pub fn from_config(cfg: &ThermometryConfig, sink: S) -> Result<Self> {
        let mut engine = Self::new(cfg.calibration, sink)?;
        engine.stack = TemperatureStack::with_retention(cfg.max_retained_fields);
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        if self.accumulator.is_seeded() {
            EngineState::Accumulating
        } else {
            EngineState::Idle
        }
    }

    pub fn calibration(&self) -> &CalibrationParams {
        self.accumulator.calibration()
    }

    pub fn accumulator(&self) -> &PhaseAccumulator {
        &self.accumulator
    }

    pub fn stack(&self) -> &TemperatureStack {
        &self.stack
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn sensors(&self) -> &SensorRegistry {
        &self.sensors
    }

    pub fn recorder(&self) -> &SensorHistoryRecorder {
        &self.recorder
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Snapshot new calibration parameters and discard all accumulated state.
    ///
    /// Sensors keep their identity, description and position; their readings and
    /// histories go back to neutral. Invalid parameters are rejected before
    /// anything is reset.
    pub fn set_baseline(&mut self, params: CalibrationParams) -> Result<()> {
        self.accumulator.recalibrate(params)?;
        self.stack.reset();
        self.mapper.clear();
        self.recorder.reset();
        self.sensors.reset_readings();
        self.sink.on_baseline_reset();
        for sensor in self.sensors.iter() {
            publish_sensor(&mut self.sink, sensor);
        }
        info!(
            "baseline set: TE={}s B0={}T gamma={}MHz/T alpha={}ppm/C scale={} base={}C",
            params.echo_time,
            params.magnetic_field,
            params.gyromagnetic_ratio,
            params.thermal_coefficient,
            params.scale_factor,
            params.base_temperature
        );
        Ok(())
    }

    /// Fold one phase frame into the running estimate.
    ///
    /// A [`ThermometryError::GeometryMismatch`] leaves every piece of state as
    /// it was; the next consistent frame continues the accumulation.
    pub fn ingest(&mut self, frame: Arc<PhaseFrame>) -> Result<IngestOutcome> {
        let accumulated = self.accumulator.ingest(&frame)?;

        match accumulated {
            Accumulated::ReferenceEstablished => {
                let g = frame.geometry();
                self.mapper.set_reference(g);
                info!(
                    "reference established: dims={:?} spacing={:?} origin={:?}",
                    g.dims, g.spacing, g.origin
                );
                Ok(IngestOutcome::ReferenceEstablished)
            }
            Accumulated::Duplicate => {
                debug!("duplicate frame skipped");
                Ok(IngestOutcome::Duplicate)
            }
            Accumulated::Field(field) => {
                let field = Arc::new(field);
                let field_index = self.stack.append(Arc::clone(&field));
                self.sink.set_viewer_image(field);

                let sampler = SensorSampler::new(&self.mapper, &self.stack);
                let recorded = self
                    .recorder
                    .record_frame(&mut self.sensors, &sampler, &mut self.sink);
                for sensor in self.sensors.iter() {
                    publish_sensor(&mut self.sink, sensor);
                }

                let sample_index = (!recorded.is_empty()).then(|| self.recorder.sample_index());
                debug!("field {field_index} produced, sample index {sample_index:?}");
                Ok(IngestOutcome::FieldProduced {
                    field_index,
                    sample_index,
                })
            }
        }
    }

    /// Reading at a sensor's current position against the newest field.
    pub fn sample_sensor(&self, id: &SensorId) -> Result<f64> {
        let sensor = self
            .sensors
            .get(id)
            .ok_or_else(|| ThermometryError::UnknownSensor(id.to_string()))?;
        Ok(SensorSampler::new(&self.mapper, &self.stack).sample(sensor))
    }

    /// Add a sensor (or move an existing one with the same id).
    pub fn add_sensor(&mut self, id: SensorId, description: impl Into<String>, position: [f64; 3]) {
        if self.sensors.add(id.clone(), description, position) {
            info!("sensor {id} added at {position:?}");
        }
        self.refresh_sensor(&id);
    }

    pub fn move_sensor(&mut self, id: &SensorId, position: [f64; 3]) -> Result<()> {
        self.sensors.move_to(id, position)?;
        self.refresh_sensor(id);
        Ok(())
    }

    /// Change the user-facing description; the chart series stays keyed by id.
    pub fn relabel_sensor(&mut self, id: &SensorId, description: impl Into<String>) -> Result<()> {
        self.sensors.set_description(id, description)?;
        self.refresh_sensor(id);
        Ok(())
    }

    pub fn remove_sensor(&mut self, id: &SensorId) -> Result<Sensor> {
        let removed = self
            .sensors
            .remove(id)
            .ok_or_else(|| ThermometryError::UnknownSensor(id.to_string()))?;
        self.recorder.remove(id);
        self.sink.remove_sensor(id);
        info!("sensor {id} removed");
        Ok(removed)
    }

    /// Re-read one sensor against the current field without advancing the
    /// sample index, then push its table cells.
    fn refresh_sensor(&mut self, id: &SensorId) {
        let sampler = SensorSampler::new(&self.mapper, &self.stack);
        if let Some(sensor) = self.sensors.get_mut(id) {
            let value = sampler.sample(sensor);
            sensor.set_reading(value);
            publish_sensor(&mut self.sink, sensor);
        }
    }
}

fn publish_sensor<S: DisplaySink>(sink: &mut S, sensor: &Sensor) {
    sink.set_sensor_table_cell(&sensor.id, SensorColumn::Id, sensor.id.to_string());
    sink.set_sensor_table_cell(
        &sensor.id,
        SensorColumn::Description,
        sensor.description.clone(),
    );
    sink.set_sensor_table_cell(
        &sensor.id,
        SensorColumn::Temperature,
        format_temperature(sensor.temperature),
    );
}
