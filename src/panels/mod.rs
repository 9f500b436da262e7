pub mod calibration_ui;
pub mod chart_ui;
pub mod image_ui;
pub mod panel_trait;
pub mod sensors_ui;

pub use calibration_ui::CalibrationPanel;
pub use chart_ui::ChartPanel;
pub use image_ui::ImagePanel;
pub use panel_trait::{Panel, PanelState, ViewerData};
pub use sensors_ui::SensorsPanel;
