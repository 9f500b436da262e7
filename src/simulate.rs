//! Synthetic heating phantom standing in for the scanner link.
//!
//! Produces 16-bit phase frames of a volume with a Gaussian hot spot whose
//! temperature ramps up linearly and then holds. A static phase background
//! steep enough to wrap around ±π in places is added to every frame.

use std::f64::consts::PI;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info};

use crate::config::{CalibrationParams, SourceSettings};
use crate::data::frame::{idx3d, Geometry, PhaseFrame};
use crate::error::Result;
use crate::events::EventSender;

#[derive(Debug, Clone)]
pub struct HeatingPhantom {
    settings: SourceSettings,
    calibration: CalibrationParams,
    geometry: Geometry,
    frame_number: u32,
}

impl HeatingPhantom {
    pub fn new(settings: SourceSettings, calibration: CalibrationParams) -> Result<Self> {
        calibration.validate()?;
        let geometry = Geometry::new(settings.dims, settings.spacing, settings.origin);
        Ok(Self {
            settings,
            calibration,
            geometry,
            frame_number: 0,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of frames produced so far.
    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Voxel at the centre of the hot spot.
    pub fn focus(&self) -> [usize; 3] {
        let [nx, ny, nz] = self.settings.dims;
        [nx / 2, ny / 2, nz / 2]
    }

    /// Temperature rise above baseline at voxel `(i, j, k)` in frame `n`.
    pub fn expected_rise(&self, n: u32, i: usize, j: usize, k: usize) -> f64 {
        let ramp = self.settings.ramp_frames.max(1);
        let level = self.settings.peak_rise * (n.min(ramp) as f64 / ramp as f64);
        let [fi, fj, fk] = self.focus();
        let d2 = [(i, fi), (j, fj), (k, fk)]
            .iter()
            .map(|&(a, b)| (a as f64 - b as f64).powi(2))
            .sum::<f64>();
        let sigma = self.settings.focus_sigma.max(f64::EPSILON);
        level * (-d2 / (2.0 * sigma * sigma)).exp()
    }

    fn background(i: usize, j: usize, k: usize) -> i16 {
        (i as i32 * 1200 + j as i32 * 700 + k as i32 * 3100) as i16
    }

    /// Build the next frame. Frame 0 carries only the background and
    /// serves as the reference.
    pub fn next_frame(&mut self) -> Result<PhaseFrame> {
        let n = self.frame_number;
        let dims = self.settings.dims;
        let raw_per_degree =
            self.calibration.scale_factor / (PI * self.calibration.coefficient());
        let mut samples = vec![0i16; self.geometry.voxel_count()];
        for k in 0..dims[2] {
            for j in 0..dims[1] {
                for i in 0..dims[0] {
                    let shift = (self.expected_rise(n, i, j, k) * raw_per_degree).round() as i64;
                    samples[idx3d(i, j, k, dims)] =
                        Self::background(i, j, k).wrapping_add(shift as i16);
                }
            }
        }
        self.frame_number += 1;
        PhaseFrame::int16(self.geometry.clone(), samples)
    }
}

/// Post phantom frames to the engine every `interval` until the engine's
/// queue is gone.
pub fn spawn_source(
    events: EventSender,
    mut phantom: HeatingPhantom,
    interval: Duration,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("phase-source".into())
        .spawn(move || {
            info!("phase source started, {:?} per frame", interval);
            loop {
                let frame = match phantom.next_frame() {
                    Ok(f) => Arc::new(f),
                    Err(e) => {
                        log::error!("phase source stopped: {e}");
                        return;
                    }
                };
                debug!("posting frame {}", phantom.frame_number());
                if events.send_frame(frame).is_err() {
                    info!("engine gone, phase source exiting");
                    return;
                }
                std::thread::sleep(interval);
            }
        })
}
