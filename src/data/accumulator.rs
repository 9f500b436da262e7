//! Incremental phase-difference accumulation and PRF temperature conversion.
//!
//! Each frame is differenced against its immediate predecessor and the
//! difference is added to a per-voxel running sum. The running sum, not the
//! single-frame difference, drives the temperature:
//!
//! `T = base + (sum * π / scale) * 1 / (TE * 2π * γ * B0 * α)`
//!
//! 16-bit frames keep both the difference and the sum at 16-bit width with
//! two's-complement wraparound; this is what unwraps phase crossing ±π.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::config::CalibrationParams;
use crate::error::{Result, ThermometryError};

use super::frame::{Geometry, PhaseFrame, PhaseSamples};
use super::stack::TemperatureField;

/// Temperature for a running phase sum under `params`.
#[inline]
pub fn temperature_from_phase_sum(sum: f64, params: &CalibrationParams) -> f64 {
    params.base_temperature + (sum * PI / params.scale_factor) * params.coefficient()
}

#[derive(Debug, Clone)]
enum PhaseSum {
    Int16(Vec<i16>),
    Float(Vec<f64>),
}

impl PhaseSum {
    fn zeroed_like(samples: &PhaseSamples) -> Self {
        match samples {
            PhaseSamples::Int16(v) => PhaseSum::Int16(vec![0; v.len()]),
            PhaseSamples::Float32(v) => PhaseSum::Float(vec![0.0; v.len()]),
        }
    }

    fn value(&self, v: usize) -> f64 {
        match self {
            PhaseSum::Int16(s) => s[v] as f64,
            PhaseSum::Float(s) => s[v],
        }
    }
}

#[derive(Debug)]
struct Reference {
    geometry: Geometry,
    previous: Arc<PhaseFrame>,
    sum: PhaseSum,
}

/// Result of folding one frame into the accumulator.
#[derive(Debug)]
pub enum Accumulated {
    /// First frame since reset: geometry recorded, no field yet.
    ReferenceEstablished,
    /// Same buffer or identical content as the previous frame; nothing changed.
    Duplicate,
    Field(TemperatureField),
}

/// Running phase sum owner.
#[derive(Debug)]
pub struct PhaseAccumulator {
    calibration: CalibrationParams,
    reference: Option<Reference>,
}

impl PhaseAccumulator {
    pub fn new(calibration: CalibrationParams) -> Result<Self> {
        calibration.validate()?;
        Ok(Self {
            calibration,
            reference: None,
        })
    }

    pub fn calibration(&self) -> &CalibrationParams {
        &self.calibration
    }

    pub fn reference_geometry(&self) -> Option<&Geometry> {
        self.reference.as_ref().map(|r| &r.geometry)
    }

    pub fn is_seeded(&self) -> bool {
        self.reference.is_some()
    }

    /// Accumulated phase at flat voxel index `v`.
    pub fn running_sum(&self, v: usize) -> Option<f64> {
        let r = self.reference.as_ref()?;
        (v < r.geometry.voxel_count()).then(|| r.sum.value(v))
    }

    /// Drop the reference and running sum, keeping the calibration.
    pub fn reset(&mut self) {
        self.reference = None;
    }

    /// Drop accumulated state and switch to new calibration parameters.
    pub fn recalibrate(&mut self, calibration: CalibrationParams) -> Result<()> {
        calibration.validate()?;
        self.calibration = calibration;
        self.reference = None;
        Ok(())
    }

    /// Fold `frame` into the running sum.
    ///
    /// A frame that fails validation leaves the accumulator untouched.
    pub fn ingest(&mut self, frame: &Arc<PhaseFrame>) -> Result<Accumulated> {
        let Some(reference) = self.reference.as_mut() else {
            self.reference = Some(Reference {
                geometry: frame.geometry().clone(),
                previous: Arc::clone(frame),
                sum: PhaseSum::zeroed_like(frame.samples()),
            });
            return Ok(Accumulated::ReferenceEstablished);
        };

        if frame.dims() != reference.geometry.dims {
            return Err(ThermometryError::GeometryMismatch {
                expected: reference.geometry.dims,
                found: frame.dims(),
            });
        }
        let expected = reference.previous.samples().format();
        let found = frame.samples().format();
        if expected != found {
            return Err(ThermometryError::SampleFormatMismatch { expected, found });
        }
        if Arc::ptr_eq(frame, &reference.previous)
            || frame.samples() == reference.previous.samples()
        {
            return Ok(Accumulated::Duplicate);
        }

        match (frame.samples(), reference.previous.samples(), &mut reference.sum) {
            (PhaseSamples::Int16(cur), PhaseSamples::Int16(prev), PhaseSum::Int16(sum)) => {
                for ((s, &c), &p) in sum.iter_mut().zip(cur).zip(prev) {
                    *s = s.wrapping_add(c.wrapping_sub(p));
                }
            }
            (PhaseSamples::Float32(cur), PhaseSamples::Float32(prev), PhaseSum::Float(sum)) => {
                for ((s, &c), &p) in sum.iter_mut().zip(cur).zip(prev) {
                    *s += c as f64 - p as f64;
                }
            }
            // the sum is allocated from the seed frame, so this needs a format change
            _ => return Err(ThermometryError::SampleFormatMismatch { expected, found }),
        }
        reference.previous = Arc::clone(frame);

        let params = &self.calibration;
        let values = (0..reference.geometry.voxel_count())
            .map(|v| temperature_from_phase_sum(reference.sum.value(v), params))
            .collect();
        Ok(Accumulated::Field(TemperatureField::from_values(
            reference.geometry.clone(),
            values,
        )))
    }
}
