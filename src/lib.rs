//! RT Thermometry crate root: re-exports and module wiring.
//!
//! Real-time MR thermometry by PRF phase-shift: a stream of phase volumes is
//! turned into temperature fields, and user-placed point sensors are sampled
//! against every new field and plotted live.
//!
//! Modules:
//! - `data`: frames and geometry, phase accumulation, the temperature stack,
//!   coordinate mapping, sensors and their histories
//! - `engine`: ties the data containers together and owns the baseline state
//! - `events`: inbound event queue and the engine thread
//! - `sink`: outbound interface to chart, table and image display
//! - `config`: calibration and display settings (YAML/JSON)
//! - `simulate`: synthetic heating phantom used by the demo binary
//! - `app`, `panels`: the egui/eframe live viewer

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod panels;
pub mod simulate;
pub mod sink;

// Public re-exports for a compact external API
pub use app::{run_viewer, ThermometryApp};
pub use config::{CalibrationParams, ThermometryConfig};
pub use data::frame::{Affine3, Geometry, PhaseFrame, PhaseSamples, SampleFormat};
pub use data::sensors::{Sensor, SensorId};
pub use data::stack::{TemperatureField, TemperatureStack};
pub use engine::{EngineState, IngestOutcome, ThermometryEngine};
pub use error::{Result, ThermometryError};
pub use events::{channel_events, spawn_engine, EventSender, ThermometryEvent};
pub use sink::{channel_display, ChartSink, DisplayCommand, DisplaySink, NullSink};
