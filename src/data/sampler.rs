//! Nearest-voxel temperature readout at a sensor position.

use super::mapper::CoordinateMapper;
use super::sensors::Sensor;
use super::stack::TemperatureStack;

/// Rounds continuous voxel coordinates to the nearest voxel.
#[inline]
pub fn nearest_voxel(ijk: [f64; 3]) -> [i64; 3] {
    [
        ijk[0].round() as i64,
        ijk[1].round() as i64,
        ijk[2].round() as i64,
    ]
}

/// Reads the current field of a stack at sensor positions.
pub struct SensorSampler<'a> {
    mapper: &'a CoordinateMapper,
    stack: &'a TemperatureStack,
}

impl<'a> SensorSampler<'a> {
    pub fn new(mapper: &'a CoordinateMapper, stack: &'a TemperatureStack) -> Self {
        Self { mapper, stack }
    }

    pub fn sample(&self, sensor: &Sensor) -> f64 {
        self.sample_at(sensor.position)
    }

    /// Temperature at a physical position.
    ///
    /// Reads 0 when no field exists yet, when no reference geometry is set,
    /// or when the position maps outside the grid (including non-finite
    /// coordinates).
    pub fn sample_at(&self, position: [f64; 3]) -> f64 {
        let Some(field) = self.stack.current() else {
            return 0.0;
        };
        let Ok(ijk) = self.mapper.map(position) else {
            return 0.0;
        };
        if ijk.iter().any(|c| !c.is_finite()) {
            return 0.0;
        }
        let [i, j, k] = nearest_voxel(ijk);
        field.checked_value(i, j, k).unwrap_or(0.0)
    }
}
