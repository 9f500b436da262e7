//! Physical (scanner) coordinates to voxel indices.

use crate::error::{Result, ThermometryError};

use super::frame::{Affine3, Geometry};

/// Maps physical points through the reference geometry's transform.
///
/// Indices are returned unrounded; choosing a voxel is the sampler's job.
#[derive(Debug, Default, Clone)]
pub struct CoordinateMapper {
    physical_to_voxel: Option<Affine3>,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reference(&mut self, geometry: &Geometry) {
        self.physical_to_voxel = Some(geometry.physical_to_voxel);
    }

    pub fn clear(&mut self) {
        self.physical_to_voxel = None;
    }

    pub fn has_reference(&self) -> bool {
        self.physical_to_voxel.is_some()
    }

    /// Continuous voxel coordinates `(i, j, k)` of a physical point.
    pub fn map(&self, point: [f64; 3]) -> Result<[f64; 3]> {
        self.physical_to_voxel
            .as_ref()
            .map(|t| t.transform_point(point))
            .ok_or(ThermometryError::NoReferenceGeometry)
    }

    /// Physical position of continuous voxel coordinates.
    pub fn voxel_to_physical(&self, ijk: [f64; 3]) -> Result<[f64; 3]> {
        let t = self
            .physical_to_voxel
            .as_ref()
            .ok_or(ThermometryError::NoReferenceGeometry)?;
        Ok(t.inverse()?.transform_point(ijk))
    }
}
