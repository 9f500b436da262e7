//! Phase frames and the volumetric geometry they carry.
//!
//! Voxel data is stored flat in column-major order (`i` varies fastest), i.e.
//! `index = i + j * nx + k * nx * ny`.

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThermometryError};

/// Grid dimensions `(nx, ny, nz)`.
pub type Dims = [usize; 3];

/// Flat index of voxel `(i, j, k)` in a grid of `dims`.
#[inline(always)]
pub fn idx3d(i: usize, j: usize, k: usize, dims: Dims) -> usize {
    i + j * dims[0] + k * dims[0] * dims[1]
}

/// 4x4 homogeneous transform. Serialized as 16 row-major values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 16]", into = "[f64; 16]")]
pub struct Affine3 {
    m: Matrix4<f64>,
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 16]> for Affine3 {
    fn from(m: [f64; 16]) -> Self {
        Self::from_row_major(m)
    }
}

impl From<Affine3> for [f64; 16] {
    fn from(t: Affine3) -> Self {
        t.to_row_major()
    }
}

impl Affine3 {
    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    pub fn from_row_major(m: [f64; 16]) -> Self {
        Self {
            m: Matrix4::from_row_slice(&m),
        }
    }

    /// Physical-to-voxel transform of an axis-aligned grid: `(p - origin) / spacing`.
    pub fn from_origin_spacing(origin: [f64; 3], spacing: [f64; 3]) -> Self {
        let mut m = Matrix4::identity();
        for axis in 0..3 {
            let s = spacing[axis];
            m[(axis, axis)] = 1.0 / s;
            m[(axis, 3)] = -origin[axis] / s;
        }
        Self { m }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.m
    }

    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (r, row) in self.m.row_iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out[r * 4 + c] = *v;
            }
        }
        out
    }

    /// `M * [x, y, z, 1]^T`, divided by the output `w` when the matrix is
    /// projective.
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let out = self.m * Vector4::new(p[0], p[1], p[2], 1.0);
        let w = out[3];
        if w != 0.0 && w != 1.0 {
            [out[0] / w, out[1] / w, out[2] / w]
        } else {
            [out[0], out[1], out[2]]
        }
    }

    pub fn inverse(&self) -> Result<Self> {
        let m = self
            .m
            .try_inverse()
            .ok_or(ThermometryError::SingularTransform)?;
        Ok(Self { m })
    }
}

/// Geometry of a volume: grid size, voxel spacing, origin and the
/// physical-to-voxel transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub dims: Dims,
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    pub physical_to_voxel: Affine3,
}

impl Geometry {
    /// Axis-aligned geometry; the transform is derived from origin and spacing.
    pub fn new(dims: Dims, spacing: [f64; 3], origin: [f64; 3]) -> Self {
        Self {
            dims,
            spacing,
            origin,
            physical_to_voxel: Affine3::from_origin_spacing(origin, spacing),
        }
    }

    /// Geometry with an explicit (possibly oblique) physical-to-voxel transform.
    pub fn with_transform(
        dims: Dims,
        spacing: [f64; 3],
        origin: [f64; 3],
        physical_to_voxel: Affine3,
    ) -> Self {
        Self {
            dims,
            spacing,
            origin,
            physical_to_voxel,
        }
    }

    pub fn voxel_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Flat index of `(i, j, k)` if it lies inside the grid.
    pub fn checked_index(&self, i: i64, j: i64, k: i64) -> Option<usize> {
        let [nx, ny, nz] = self.dims;
        let inside = |v: i64, n: usize| v >= 0 && (v as u64) < n as u64;
        if inside(i, nx) && inside(j, ny) && inside(k, nz) {
            Some(idx3d(i as usize, j as usize, k as usize, self.dims))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
    Int16,
    Float32,
}

/// Raw phase-encoded samples of one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseSamples {
    /// Signed 16-bit samples; differences wrap in two's complement.
    Int16(Vec<i16>),
    Float32(Vec<f32>),
}

impl PhaseSamples {
    pub fn len(&self) -> usize {
        match self {
            PhaseSamples::Int16(v) => v.len(),
            PhaseSamples::Float32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> SampleFormat {
        match self {
            PhaseSamples::Int16(_) => SampleFormat::Int16,
            PhaseSamples::Float32(_) => SampleFormat::Float32,
        }
    }
}

/// One phase image delivered by the transport layer.
///
/// Frames are immutable once built; the sample count always matches the
/// geometry's voxel count.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseFrame {
    geometry: Geometry,
    samples: PhaseSamples,
}

impl PhaseFrame {
    pub fn new(geometry: Geometry, samples: PhaseSamples) -> Result<Self> {
        let expected = geometry.voxel_count();
        if samples.len() != expected {
            return Err(ThermometryError::InvalidFrame {
                dims: geometry.dims,
                samples: samples.len(),
                expected,
            });
        }
        Ok(Self { geometry, samples })
    }

    pub fn int16(geometry: Geometry, samples: Vec<i16>) -> Result<Self> {
        Self::new(geometry, PhaseSamples::Int16(samples))
    }

    pub fn float32(geometry: Geometry, samples: Vec<f32>) -> Result<Self> {
        Self::new(geometry, PhaseSamples::Float32(samples))
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn dims(&self) -> Dims {
        self.geometry.dims
    }

    pub fn samples(&self) -> &PhaseSamples {
        &self.samples
    }
}
