//! Error type shared by the thermometry engine and its data containers.

use thiserror::Error;

use crate::data::frame::{Dims, SampleFormat};

/// Errors surfaced by the thermometry core.
///
/// Out-of-volume sampling and sampling before a reference frame exist are not
/// represented here: both are ordinary situations and read as a 0 temperature.
#[derive(Debug, Error)]
pub enum ThermometryError {
    /// A frame's dimensions disagree with the reference geometry.
    #[error("frame dimensions {found:?} do not match reference geometry {expected:?}")]
    GeometryMismatch { expected: Dims, found: Dims },
    /// A frame's sample format differs from the reference frame's.
    #[error("frame sample format {found:?} does not match reference format {expected:?}")]
    SampleFormatMismatch {
        expected: SampleFormat,
        found: SampleFormat,
    },
    /// No reference frame has been ingested since the last baseline.
    #[error("no reference geometry established")]
    NoReferenceGeometry,
    /// The sample buffer length does not match the declared dimensions.
    #[error("frame holds {samples} samples but dimensions {dims:?} require {expected}")]
    InvalidFrame {
        dims: Dims,
        samples: usize,
        expected: usize,
    },
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
    /// The physical-to-voxel matrix cannot be inverted.
    #[error("transform matrix is singular")]
    SingularTransform,
    #[error("unknown sensor '{0}'")]
    UnknownSensor(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ThermometryError>;
