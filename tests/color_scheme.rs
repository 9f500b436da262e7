use eframe::egui::Color32;
use rtthermometry::color_scheme::{default_lut, sensor_color, ThermalLut, LUT_SIZE, SENSOR_PALETTE};

#[test]
fn palette_cycles_in_creation_order() {
    assert_eq!(sensor_color(0), Color32::from_rgb(31, 119, 180));
    assert_eq!(sensor_color(1), Color32::from_rgb(255, 127, 14));
    assert_eq!(sensor_color(10), sensor_color(0));
    let distinct: std::collections::HashSet<_> = SENSOR_PALETTE.iter().collect();
    assert_eq!(distinct.len(), SENSOR_PALETTE.len());
}

#[test]
fn lut_ends_are_transparent() {
    let lut = ThermalLut::new(25.0, 90.0);
    assert_eq!(lut.entries().len(), LUT_SIZE);
    assert_eq!(lut.color_for(10.0), Color32::TRANSPARENT);
    assert_eq!(lut.color_for(25.0), Color32::TRANSPARENT);
    assert_eq!(lut.color_for(90.0), Color32::TRANSPARENT);
    assert_eq!(lut.color_for(200.0), Color32::TRANSPARENT);
    assert_eq!(lut.color_for(f64::NAN), Color32::TRANSPARENT);
    assert_eq!(lut.color_for(60.0).a(), 204);
}

#[test]
fn lut_ramps_from_blue_to_red() {
    let lut = ThermalLut::new(0.0, 256.0);
    assert_eq!(lut.index_for(1.0), 1);
    assert_eq!(lut.index_for(254.5), 254);

    let cold = lut.entries()[1].to_srgba_unmultiplied();
    let hot = lut.entries()[254].to_srgba_unmultiplied();
    assert!(cold[2] > cold[0], "low end is blue: {cold:?}");
    assert!(hot[0] > hot[2], "high end is red: {hot:?}");
}

#[test]
fn default_lut_uses_default_range() {
    assert_eq!(default_lut().range(), (25.0, 90.0));
}
