use std::f64::consts::PI;
use std::sync::Arc;

use rtthermometry::data::accumulator::{temperature_from_phase_sum, Accumulated, PhaseAccumulator};
use rtthermometry::{CalibrationParams, Geometry, PhaseFrame, ThermometryError};

fn geom_2x2() -> Geometry {
    Geometry::new([2, 2, 1], [1.0; 3], [0.0; 3])
}

fn frame(values: Vec<i16>) -> Arc<PhaseFrame> {
    Arc::new(PhaseFrame::int16(geom_2x2(), values).unwrap())
}

fn field_of(acc: Accumulated) -> rtthermometry::TemperatureField {
    match acc {
        Accumulated::Field(f) => f,
        other => panic!("expected a field, got {other:?}"),
    }
}

#[test]
fn two_by_two_scenario_matches_closed_form() {
    let params = CalibrationParams::default();
    let mut acc = PhaseAccumulator::new(params).unwrap();

    assert!(matches!(
        acc.ingest(&frame(vec![10, 10, 10, 10])).unwrap(),
        Accumulated::ReferenceEstablished
    ));
    let field = field_of(acc.ingest(&frame(vec![12, 10, 9, 10])).unwrap());
    let t = field.values();

    assert!(t[0] > 37.0);
    assert_eq!(t[1], 37.0);
    assert!(t[2] < 37.0);
    assert_eq!(t[3], 37.0);

    let coef = 1.0 / (0.01 * 2.0 * PI * 42.576 * 3.0 * 0.01);
    let expected0 = 37.0 + (2.0 * PI / 4096.0) * coef;
    let expected2 = 37.0 + (-1.0 * PI / 4096.0) * coef;
    assert!((t[0] - expected0).abs() < 1e-9, "{} vs {}", t[0], expected0);
    assert!((t[2] - expected2).abs() < 1e-9, "{} vs {}", t[2], expected2);
    assert_eq!(acc.running_sum(0), Some(2.0));
    assert_eq!(acc.running_sum(2), Some(-1.0));
}

#[test]
fn zero_sum_gives_base_temperature_exactly() {
    let params = CalibrationParams {
        base_temperature: 21.5,
        ..CalibrationParams::default()
    };
    assert_eq!(temperature_from_phase_sum(0.0, &params), 21.5);

    let mut acc = PhaseAccumulator::new(params).unwrap();
    acc.ingest(&frame(vec![5, -5, 100, 0])).unwrap();
    // Phase goes up then back down: the sum is zero again.
    field_of(acc.ingest(&frame(vec![7, -4, 90, 1])).unwrap());
    let field = field_of(acc.ingest(&frame(vec![5, -5, 100, 0])).unwrap());
    assert!(field.values().iter().all(|&t| t == 21.5));
}

#[test]
fn same_frame_twice_is_skipped() {
    let mut acc = PhaseAccumulator::new(CalibrationParams::default()).unwrap();
    acc.ingest(&frame(vec![0; 4])).unwrap();
    let f = frame(vec![3, 3, 3, 3]);
    assert!(matches!(acc.ingest(&f).unwrap(), Accumulated::Field(_)));
    assert!(matches!(acc.ingest(&f).unwrap(), Accumulated::Duplicate));
    // A distinct buffer with the same content is a duplicate as well.
    assert!(matches!(
        acc.ingest(&frame(vec![3, 3, 3, 3])).unwrap(),
        Accumulated::Duplicate
    ));
    assert_eq!(acc.running_sum(0), Some(3.0));
}

#[test]
fn geometry_mismatch_keeps_previous_state() {
    let mut acc = PhaseAccumulator::new(CalibrationParams::default()).unwrap();
    acc.ingest(&frame(vec![0; 4])).unwrap();
    acc.ingest(&frame(vec![4, 0, 0, 0])).unwrap();

    let wrong = Arc::new(
        PhaseFrame::int16(Geometry::new([3, 1, 1], [1.0; 3], [0.0; 3]), vec![100; 3]).unwrap(),
    );
    let err = acc.ingest(&wrong).unwrap_err();
    assert!(matches!(
        err,
        ThermometryError::GeometryMismatch {
            expected: [2, 2, 1],
            found: [3, 1, 1]
        }
    ));
    assert_eq!(acc.running_sum(0), Some(4.0));

    // Accumulation resumes against the last accepted frame.
    acc.ingest(&frame(vec![6, 0, 0, 0])).unwrap();
    assert_eq!(acc.running_sum(0), Some(6.0));
}

#[test]
fn float_frames_accumulate_without_wrapping() {
    let mut acc = PhaseAccumulator::new(CalibrationParams::default()).unwrap();
    let f = |v: Vec<f32>| Arc::new(PhaseFrame::float32(geom_2x2(), v).unwrap());
    acc.ingest(&f(vec![0.0; 4])).unwrap();
    acc.ingest(&f(vec![30000.0, 0.5, 0.0, 0.0])).unwrap();
    acc.ingest(&f(vec![60000.0, 1.0, 0.0, 0.0])).unwrap();
    assert_eq!(acc.running_sum(0), Some(60000.0));
    assert_eq!(acc.running_sum(1), Some(1.0));
}

#[test]
fn invalid_calibration_is_rejected() {
    let bad = CalibrationParams {
        echo_time: 0.0,
        ..CalibrationParams::default()
    };
    assert!(matches!(
        PhaseAccumulator::new(bad),
        Err(ThermometryError::InvalidCalibration(_))
    ));

    let mut acc = PhaseAccumulator::new(CalibrationParams::default()).unwrap();
    acc.ingest(&frame(vec![0; 4])).unwrap();
    let nan = CalibrationParams {
        scale_factor: f64::NAN,
        ..CalibrationParams::default()
    };
    assert!(acc.recalibrate(nan).is_err());
    assert!(acc.is_seeded(), "rejected calibration must not reset state");
}
