use std::sync::Arc;

use rtthermometry::sink::SensorColumn;
use rtthermometry::{
    CalibrationParams, DisplayCommand, EngineState, Geometry, IngestOutcome, NullSink, PhaseFrame,
    Sensor, SensorId, ThermometryEngine, ThermometryError,
};

fn geom() -> Geometry {
    // origin (10, 20, 0), 2 mm in-plane spacing
    Geometry::new([3, 2, 1], [2.0, 2.0, 1.0], [10.0, 20.0, 0.0])
}

fn frame(values: Vec<i16>) -> Arc<PhaseFrame> {
    Arc::new(PhaseFrame::int16(geom(), values).unwrap())
}

fn engine() -> ThermometryEngine<Vec<DisplayCommand>> {
    ThermometryEngine::new(CalibrationParams::default(), Vec::new()).unwrap()
}

#[test]
fn first_frame_establishes_reference_only() {
    let mut e = engine();
    assert_eq!(e.state(), EngineState::Idle);
    assert_eq!(
        e.ingest(frame(vec![0; 6])).unwrap(),
        IngestOutcome::ReferenceEstablished
    );
    assert_eq!(e.state(), EngineState::Accumulating);
    assert!(e.stack().current().is_none());
    assert!(e.mapper().has_reference());

    let out = e.ingest(frame(vec![1; 6])).unwrap();
    assert_eq!(
        out,
        IngestOutcome::FieldProduced {
            field_index: 0,
            sample_index: None
        }
    );
    assert_eq!(e.stack().len(), 1);
}

#[test]
fn duplicate_frame_appends_one_field() {
    let mut e = engine();
    e.ingest(frame(vec![0; 6])).unwrap();
    let f = frame(vec![2; 6]);
    e.ingest(Arc::clone(&f)).unwrap();
    assert_eq!(e.ingest(f).unwrap(), IngestOutcome::Duplicate);
    assert_eq!(e.stack().len(), 1);
}

#[test]
fn sensor_at_first_voxel_reads_current_field() {
    let mut e = engine();
    let id = SensorId::from("probe");
    e.add_sensor(id.clone(), "Probe", [10.0, 20.0, 0.0]);
    assert_eq!(e.sample_sensor(&id).unwrap(), 0.0, "no field yet");

    e.ingest(frame(vec![0; 6])).unwrap();
    assert_eq!(e.sample_sensor(&id).unwrap(), 0.0, "reference only");

    for step in 1..=3i16 {
        e.ingest(frame(vec![step * 7, 1, 2, 3, 4, step])).unwrap();
        let current = e.stack().current().unwrap().value_at(0, 0, 0);
        assert_eq!(e.sample_sensor(&id).unwrap(), current);
        assert_eq!(e.sensors().get(&id).unwrap().temperature, current);
    }
}

#[test]
fn two_sensors_share_sample_indices() {
    let mut e = engine();
    let a = SensorId::from("a");
    let b = SensorId::from("b");
    e.add_sensor(a.clone(), "A", [10.0, 20.0, 0.0]);
    e.add_sensor(b.clone(), "B", [14.0, 22.0, 0.0]);

    e.ingest(frame(vec![0; 6])).unwrap();
    for n in 1..=3i16 {
        let out = e.ingest(frame(vec![n; 6])).unwrap();
        assert!(matches!(
            out,
            IngestOutcome::FieldProduced { sample_index: Some(i), .. } if i == n as u64
        ));
    }

    let ha: Vec<u64> = e.recorder().history(&a).iter().map(|p| p.sample_index).collect();
    let hb: Vec<u64> = e.recorder().history(&b).iter().map(|p| p.sample_index).collect();
    assert_eq!(ha, vec![1, 2, 3]);
    assert_eq!(hb, vec![1, 2, 3]);
}

#[test]
fn set_baseline_clears_data_but_keeps_sensors() {
    let mut e = engine();
    let id = SensorId::from("s1");
    e.add_sensor(id.clone(), "Tip", [12.0, 22.0, 0.0]);
    e.ingest(frame(vec![0; 6])).unwrap();
    e.ingest(frame(vec![50; 6])).unwrap();
    assert_eq!(e.recorder().history(&id).len(), 1);
    let before = e.sensors().get(&id).unwrap().clone();
    assert_ne!(before.temperature, 0.0);

    e.set_baseline(CalibrationParams::default()).unwrap();

    assert_eq!(e.state(), EngineState::Idle);
    assert!(e.stack().current().is_none());
    assert!(e.stack().is_empty());
    assert_eq!(e.recorder().history(&id).len(), 0);
    assert_eq!(e.recorder().sample_index(), 0);
    let s = e.sensors().get(&id).unwrap();
    assert_eq!(s.description, "Tip");
    assert_eq!(s.position, [12.0, 22.0, 0.0]);
    assert_eq!(s.temperature, 0.0);
    assert_eq!(
        *s,
        Sensor {
            temperature: 0.0,
            ..before
        },
        "only the reading changes"
    );
    assert!(e.sink().iter().any(|c| matches!(c, DisplayCommand::BaselineReset)));
}

#[test]
fn invalid_baseline_leaves_state_alone() {
    let mut e = engine();
    e.ingest(frame(vec![0; 6])).unwrap();
    e.ingest(frame(vec![5; 6])).unwrap();
    let bad = CalibrationParams {
        magnetic_field: 0.0,
        ..CalibrationParams::default()
    };
    assert!(e.set_baseline(bad).is_err());
    assert_eq!(e.stack().len(), 1);
    assert_eq!(e.state(), EngineState::Accumulating);
}

#[test]
fn fields_are_deterministic_across_resets() {
    let frames: Vec<Vec<i16>> = vec![
        vec![100, -200, 3000, 32000, -32000, 0],
        vec![140, -180, 2900, -32000, 32000, 10],
        vec![200, -150, 2800, -31000, 31000, 25],
    ];
    let run = |e: &mut ThermometryEngine<NullSink>| -> Vec<Vec<f64>> {
        let mut out = Vec::new();
        for f in &frames {
            e.ingest(frame(f.clone())).unwrap();
            if let Some(field) = e.stack().current() {
                out.push(field.values().to_vec());
            }
        }
        out
    };

    let mut e = ThermometryEngine::new(CalibrationParams::default(), NullSink).unwrap();
    let first = run(&mut e);
    e.set_baseline(CalibrationParams::default()).unwrap();
    let second = run(&mut e);
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn geometry_mismatch_is_reported_and_ignored() {
    let mut e = engine();
    e.ingest(frame(vec![0; 6])).unwrap();
    let other = Arc::new(
        PhaseFrame::int16(Geometry::new([2, 2, 1], [1.0; 3], [0.0; 3]), vec![9; 4]).unwrap(),
    );
    assert!(matches!(
        e.ingest(other),
        Err(ThermometryError::GeometryMismatch { .. })
    ));
    assert!(e.stack().is_empty());
    assert!(matches!(
        e.ingest(frame(vec![1; 6])).unwrap(),
        IngestOutcome::FieldProduced { field_index: 0, .. }
    ));
}

#[test]
fn sensor_edits_refresh_cells_without_new_samples() {
    let mut e = engine();
    let id = SensorId::from("s");
    e.ingest(frame(vec![0; 6])).unwrap();
    e.ingest(frame(vec![0, 0, 0, 0, 0, 40])).unwrap();

    e.add_sensor(id.clone(), "Edge", [10.0, 20.0, 0.0]);
    e.move_sensor(&id, [14.0, 22.0, 0.0]).unwrap();
    let hot = e.stack().current().unwrap().value_at(2, 1, 0);
    assert_eq!(e.sensors().get(&id).unwrap().temperature, hot);
    assert_eq!(e.recorder().sample_index(), 0);
    assert!(e.recorder().history(&id).is_empty());

    e.relabel_sensor(&id, "Hot spot").unwrap();
    let s = e.sensors().get(&id).unwrap();
    assert_eq!(s.display_label(), format!("Hot spot ({hot:.1})"));

    let last_desc = e.sink().iter().rev().find_map(|c| match c {
        DisplayCommand::SensorCell {
            column: SensorColumn::Description,
            text,
            ..
        } => Some(text.clone()),
        _ => None,
    });
    assert_eq!(last_desc.as_deref(), Some("Hot spot"));
}

#[test]
fn table_cells_start_with_the_sensor_id() {
    let mut e = engine();
    e.add_sensor(SensorId::from("s1"), "Same", [10.0, 20.0, 0.0]);
    e.add_sensor(SensorId::from("s2"), "Same", [12.0, 20.0, 0.0]);

    let cells: Vec<(&str, SensorColumn, &str)> = e
        .sink()
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::SensorCell {
                sensor,
                column,
                text,
            } => Some((sensor.as_str(), *column, text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        cells,
        vec![
            ("s1", SensorColumn::Id, "s1"),
            ("s1", SensorColumn::Description, "Same"),
            ("s1", SensorColumn::Temperature, "0.0"),
            ("s2", SensorColumn::Id, "s2"),
            ("s2", SensorColumn::Description, "Same"),
            ("s2", SensorColumn::Temperature, "0.0"),
        ]
    );
}

#[test]
fn removing_a_sensor_drops_history_and_notifies() {
    let mut e = engine();
    let id = SensorId::from("gone");
    e.add_sensor(id.clone(), "Gone", [10.0, 20.0, 0.0]);
    e.ingest(frame(vec![0; 6])).unwrap();
    e.ingest(frame(vec![3; 6])).unwrap();

    let removed = e.remove_sensor(&id).unwrap();
    assert_eq!(removed.id, id);
    assert!(e.recorder().history(&id).is_empty());
    assert!(e.sensors().is_empty());
    assert!(matches!(
        e.sink().last(),
        Some(DisplayCommand::SensorRemoved(r)) if r == &id
    ));
    assert!(matches!(
        e.remove_sensor(&id),
        Err(ThermometryError::UnknownSensor(_))
    ));
}

#[test]
fn chart_points_use_description_and_id() {
    let mut e = engine();
    let id = SensorId::from("k1");
    e.add_sensor(id.clone(), "Needle", [10.0, 20.0, 0.0]);
    e.ingest(frame(vec![0; 6])).unwrap();
    e.ingest(frame(vec![8; 6])).unwrap();
    let point = e.sink().iter().find_map(|c| match c {
        DisplayCommand::ChartPoint {
            key,
            label,
            sample_index,
            ..
        } => Some((key.clone(), label.clone(), *sample_index)),
        _ => None,
    });
    assert_eq!(point, Some((id, "Needle".to_string(), 1)));
}
