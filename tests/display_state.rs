use rtthermometry::app::{ChartState, DisplayState, SensorPlacement};
use rtthermometry::color_scheme::sensor_color;
use rtthermometry::sink::SensorColumn;
use rtthermometry::{DisplayCommand, SensorId};

fn point(key: &str, label: &str, sample_index: u64, value: f64) -> DisplayCommand {
    DisplayCommand::ChartPoint {
        key: SensorId::from(key),
        label: label.into(),
        sample_index,
        value,
    }
}

#[test]
fn late_series_is_zero_prefilled() {
    let mut chart = ChartState::new();
    let a = SensorId::from("a");
    let b = SensorId::from("b");
    chart.push_point(&a, "A", 1, 40.0);
    chart.push_point(&a, "A", 2, 41.0);
    chart.push_point(&a, "A", 3, 42.0);
    chart.push_point(&b, "B", 3, 38.0);

    assert_eq!(chart.get(&a).unwrap().points, vec![[1.0, 40.0], [2.0, 41.0], [3.0, 42.0]]);
    assert_eq!(
        chart.get(&b).unwrap().points,
        vec![[0.0, 0.0], [1.0, 0.0], [3.0, 38.0]]
    );
}

#[test]
fn colors_follow_creation_order_and_labels_follow_description() {
    let mut chart = ChartState::new();
    let a = SensorId::from("a");
    let b = SensorId::from("b");
    chart.push_point(&a, "A", 1, 1.0);
    chart.push_point(&b, "B", 1, 1.0);
    chart.remove(&a);
    let c = SensorId::from("c");
    chart.push_point(&c, "C", 2, 1.0);

    assert_eq!(chart.get(&b).unwrap().color, sensor_color(1));
    assert_eq!(chart.get(&c).unwrap().color, sensor_color(2));

    chart.push_point(&b, "Renamed", 2, 2.0);
    assert_eq!(chart.get(&b).unwrap().label, "Renamed");
    assert_eq!(chart.series().len(), 2);

    chart.clear();
    assert!(chart.is_empty());
    chart.push_point(&a, "A", 1, 1.0);
    assert_eq!(chart.get(&a).unwrap().color, sensor_color(0));
}

#[test]
fn commands_update_table_and_chart() {
    let mut state = DisplayState::new();
    let id = SensorId::from("s1");
    state.apply(DisplayCommand::SensorCell {
        sensor: id.clone(),
        column: SensorColumn::Description,
        text: "Tip".into(),
    });
    state.apply(DisplayCommand::SensorCell {
        sensor: id.clone(),
        column: SensorColumn::Temperature,
        text: "42.3".into(),
    });
    state.apply(point("s1", "Tip", 1, 42.3));

    let row = state.table.get(&id).unwrap();
    assert_eq!(row.description, "Tip");
    assert_eq!(row.edit, "Tip");
    assert_eq!(row.temperature, "42.3");
    assert_eq!(state.chart.series().len(), 1);

    state.apply(DisplayCommand::BaselineReset);
    assert!(state.chart.is_empty());
    assert!(state.field.is_none());
    assert_eq!(state.table.len(), 1, "rows survive a baseline reset");

    state.apply(DisplayCommand::SensorRemoved(id.clone()));
    assert!(state.table.is_empty());
}

#[test]
fn focused_description_is_not_overwritten() {
    let mut state = DisplayState::new();
    let id = SensorId::from("s1");
    state.table.set_cell(&id, SensorColumn::Description, "Old".into());
    {
        let row = &mut state.table.rows_mut()[0];
        row.editing = true;
        row.edit = "Typing".into();
    }
    state.table.set_cell(&id, SensorColumn::Description, "Server".into());
    let row = state.table.get(&id).unwrap();
    assert_eq!(row.description, "Server");
    assert_eq!(row.edit, "Typing");
}

#[test]
fn ui_sensor_ids_are_unique() {
    let mut state = DisplayState::new();
    let (a, la) = state.next_sensor();
    let (b, _) = state.next_sensor();
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "S-1");
    assert_eq!(la, "Sensor 1");
}

#[test]
fn picked_sensor_is_moved_by_next_click_only() {
    let mut state = DisplayState::new();
    let SensorPlacement::Add { id, description } = state.placement() else {
        panic!("nothing picked, click adds");
    };
    assert_eq!(id.as_str(), "S-1");
    assert_eq!(description, "Sensor 1");

    state.begin_move(id.clone());
    assert_eq!(state.pending_move(), Some(&id));
    assert_eq!(state.placement(), SensorPlacement::Move(id.clone()));
    assert_eq!(state.pending_move(), None);
    assert!(matches!(state.placement(), SensorPlacement::Add { .. }));

    state.begin_move(id.clone());
    state.cancel_move();
    assert!(matches!(state.placement(), SensorPlacement::Add { .. }));

    state.begin_move(id.clone());
    state.apply(DisplayCommand::SensorRemoved(id));
    assert_eq!(state.pending_move(), None, "removed sensor cannot be moved");
}

#[test]
fn id_cell_creates_row_in_order() {
    let mut state = DisplayState::new();
    for key in ["b", "a"] {
        state.apply(DisplayCommand::SensorCell {
            sensor: SensorId::from(key),
            column: SensorColumn::Id,
            text: key.into(),
        });
    }
    let ids: Vec<&str> = state.table.rows().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert!(state.table.rows().iter().all(|r| r.description.is_empty()));
}
