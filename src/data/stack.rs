//! Temperature fields and their arrival-ordered history.

use std::collections::VecDeque;
use std::sync::Arc;

use super::frame::{idx3d, Geometry};

/// Per-voxel temperature in °C at the reference geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField {
    geometry: Geometry,
    values: Vec<f64>,
}

impl TemperatureField {
    pub(crate) fn from_values(geometry: Geometry, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), geometry.voxel_count());
        Self { geometry, values }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at voxel `(i, j, k)`.
    ///
    /// # Panics
    ///
    /// Panics if the voxel lies outside the grid. Use [`Self::checked_value`]
    /// for indices that are not known to be in range.
    pub fn value_at(&self, i: usize, j: usize, k: usize) -> f64 {
        let [nx, ny, nz] = self.geometry.dims;
        assert!(
            i < nx && j < ny && k < nz,
            "voxel ({i}, {j}, {k}) outside grid {:?}",
            self.geometry.dims
        );
        self.values[idx3d(i, j, k, self.geometry.dims)]
    }

    /// Value at signed voxel indices, `None` outside the grid.
    pub fn checked_value(&self, i: i64, j: i64, k: i64) -> Option<f64> {
        self.geometry
            .checked_index(i, j, k)
            .map(|idx| self.values[idx])
    }

    /// Smallest and largest temperature in the field.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Append-only history of produced fields; the last entry is the current one.
///
/// With a retention limit, the oldest fields are dropped but arrival indices
/// keep counting from the first field after the last reset.
#[derive(Debug, Default)]
pub struct TemperatureStack {
    fields: VecDeque<Arc<TemperatureField>>,
    dropped: usize,
    retention: Option<usize>,
}

impl TemperatureStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(max_fields: Option<usize>) -> Self {
        Self {
            retention: max_fields.map(|n| n.max(1)),
            ..Self::default()
        }
    }

    /// Append a field and return its arrival index.
    pub fn append(&mut self, field: Arc<TemperatureField>) -> usize {
        let index = self.len();
        self.fields.push_back(field);
        if let Some(max) = self.retention {
            while self.fields.len() > max {
                self.fields.pop_front();
                self.dropped += 1;
            }
        }
        index
    }

    pub fn current(&self) -> Option<&Arc<TemperatureField>> {
        self.fields.back()
    }

    /// Field by arrival index, if still retained.
    pub fn get(&self, index: usize) -> Option<&Arc<TemperatureField>> {
        index
            .checked_sub(self.dropped)
            .and_then(|i| self.fields.get(i))
    }

    /// Number of fields appended since the last reset.
    pub fn len(&self) -> usize {
        self.dropped + self.fields.len()
    }

    pub fn retained(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn reset(&mut self) {
        self.fields.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> TemperatureField {
        let g = Geometry::new([2, 2, 1], [1.0; 3], [0.0; 3]);
        TemperatureField::from_values(g, vec![1.0, 2.0, 3.0, 4.0])
    }

    #[test]
    fn value_at_and_checked_value_agree_inside() {
        let f = field();
        assert_eq!(f.value_at(1, 1, 0), 4.0);
        assert_eq!(f.checked_value(1, 1, 0), Some(4.0));
        assert_eq!(f.checked_value(2, 0, 0), None);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn value_at_panics_outside_grid() {
        // flat index 2 exists, but i = 2 is past nx
        field().value_at(2, 0, 0);
    }
}
