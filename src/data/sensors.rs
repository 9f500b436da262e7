//! Sensors: user-placed point probes and their typed registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThermometryError};

/// Opaque identifier assigned by the point-set collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(String);

impl SensorId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SensorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A point probe.
///
/// `description` is the user-editable name and the only stored label. The
/// glyph text shown next to the point comes from [`Sensor::display_label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub description: String,
    /// Physical-space position.
    pub position: [f64; 3],
    /// Latest reading in °C; 0 until a field has been sampled.
    pub temperature: f64,
}

/// One-decimal temperature text used by the table and the glyph label.
pub fn format_temperature(t: f64) -> String {
    format!("{t:.1}")
}

impl Sensor {
    pub fn new(id: SensorId, description: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            id,
            description: description.into(),
            position,
            temperature: 0.0,
        }
    }

    /// `"<description> (<temp>)"`, derived from the current reading.
    pub fn display_label(&self) -> String {
        format!(
            "{} ({})",
            self.description,
            format_temperature(self.temperature)
        )
    }

    pub(crate) fn set_reading(&mut self, temperature: f64) {
        self.temperature = temperature;
    }
}

/// Insertion-ordered sensor collection keyed by [`SensorId`].
#[derive(Debug, Default, Clone)]
pub struct SensorRegistry {
    sensors: Vec<Sensor>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_of(&self, id: &SensorId) -> Option<usize> {
        self.sensors.iter().position(|s| &s.id == id)
    }

    /// Add a sensor. An already known id only has its position updated.
    ///
    /// Returns `true` when a new sensor was inserted.
    pub fn add(&mut self, id: SensorId, description: impl Into<String>, position: [f64; 3]) -> bool {
        if let Some(existing) = self.get_mut(&id) {
            existing.position = position;
            return false;
        }
        self.sensors.push(Sensor::new(id, description, position));
        true
    }

    pub fn remove(&mut self, id: &SensorId) -> Option<Sensor> {
        self.position_of(id).map(|i| self.sensors.remove(i))
    }

    pub fn move_to(&mut self, id: &SensorId, position: [f64; 3]) -> Result<()> {
        let sensor = self
            .get_mut(id)
            .ok_or_else(|| ThermometryError::UnknownSensor(id.to_string()))?;
        sensor.position = position;
        Ok(())
    }

    pub fn set_description(&mut self, id: &SensorId, description: impl Into<String>) -> Result<()> {
        let sensor = self
            .get_mut(id)
            .ok_or_else(|| ThermometryError::UnknownSensor(id.to_string()))?;
        sensor.description = description.into();
        Ok(())
    }

    pub fn get(&self, id: &SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &SensorId) -> Option<&mut Sensor> {
        self.sensors.iter_mut().find(|s| &s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sensor> {
        self.sensors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Reset every reading to the neutral 0 without touching identity or position.
    pub fn reset_readings(&mut self) {
        for s in &mut self.sensors {
            s.set_reading(0.0);
        }
    }
}
