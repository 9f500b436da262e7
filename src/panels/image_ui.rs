use eframe::egui;
use egui::Ui;
use image::RgbaImage;

use crate::app::SensorPlacement;
use crate::color_scheme::ThermalLut;
use crate::data::mapper::CoordinateMapper;
use crate::data::slice::{pixel_to_voxel, render_slice, save_png, to_color_image};

use super::panel_trait::{Panel, PanelState, ViewerData};

/// Newest temperature field as a colored axial slice.
///
/// Clicking a voxel places a new sensor at that voxel's physical position, or
/// moves the sensor picked for moving in the sensor table.
pub struct ImagePanel {
    pub state: PanelState,
    pub slice: usize,
    lut: ThermalLut,
    texture: Option<egui::TextureHandle>,
    image: Option<RgbaImage>,
    /// `(field_generation, slice)` the texture was rendered for.
    rendered: Option<(u64, usize)>,
    status: Option<String>,
}

impl ImagePanel {
    pub fn new(lut: ThermalLut) -> Self {
        Self {
            state: PanelState::new("Temperature", egui_phosphor::regular::IMAGE),
            slice: 0,
            lut,
            texture: None,
            image: None,
            rendered: None,
            status: None,
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context, data: &ViewerData<'_>) {
        let key = (data.display.field_generation, self.slice);
        if self.rendered == Some(key) {
            return;
        }
        self.rendered = Some(key);
        self.image = data
            .display
            .field
            .as_ref()
            .and_then(|f| render_slice(f, self.slice, &self.lut));
        self.texture = self.image.as_ref().map(|img| {
            ctx.load_texture(
                "temperature_slice",
                to_color_image(img),
                egui::TextureOptions::NEAREST,
            )
        });
    }

    fn export_png(&mut self) {
        let Some(img) = &self.image else {
            return;
        };
        let default_name = format!(
            "temperature_slice{}_{}.png",
            self.slice,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&default_name)
            .add_filter("PNG", &["png"])
            .save_file()
        {
            self.status = Some(match save_png(img, &path) {
                Ok(()) => {
                    log::info!("saved slice to {}", path.display());
                    format!("Saved {}", path.display())
                }
                Err(e) => {
                    log::warn!("failed to save slice: {e}");
                    format!("Save failed: {e}")
                }
            });
        }
    }

    fn place_sensor(&mut self, ijk: [f64; 3], data: &mut ViewerData<'_>) {
        let Some(field) = data.display.field.as_ref() else {
            return;
        };
        let mut mapper = CoordinateMapper::new();
        mapper.set_reference(field.geometry());
        let position = match mapper.voxel_to_physical(ijk) {
            Ok(position) => position,
            Err(e) => {
                log::warn!("cannot place sensor: {e}");
                return;
            }
        };
        let sent = match data.display.placement() {
            SensorPlacement::Add { id, description } => {
                data.events.add_sensor(id, description, position)
            }
            SensorPlacement::Move(id) => data.events.move_sensor(id, position),
        };
        if sent.is_err() {
            log::warn!("engine is not running, sensor not placed");
        }
    }
}

impl Panel for ImagePanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut ViewerData<'_>) {
        let dims = data.display.field.as_ref().map(|f| f.geometry().dims);
        let nz = dims.map_or(1, |d| d[2].max(1));
        self.slice = self.slice.min(nz - 1);

        ui.horizontal(|ui| {
            ui.label("Slice");
            ui.add_enabled(
                nz > 1,
                egui::Slider::new(&mut self.slice, 0..=nz - 1).integer(),
            );
            let (lo, hi) = self.lut.range();
            ui.separator();
            ui.label(format!("Range {lo:.0} – {hi:.0} °C"));
            if let Some((fmin, fmax)) = data.display.field.as_ref().and_then(|f| f.min_max()) {
                ui.separator();
                ui.label(format!("Field {fmin:.1} – {fmax:.1} °C"));
            }
            ui.separator();
            if ui
                .add_enabled(self.image.is_some(), egui::Button::new("Export PNG"))
                .clicked()
            {
                self.export_png();
            }
        });
        if let Some(status) = &self.status {
            ui.weak(status);
        }

        self.refresh_texture(ui.ctx(), data);
        let (Some(texture), Some(dims)) = (self.texture.as_ref(), dims) else {
            ui.centered_and_justified(|ui| {
                ui.weak("Waiting for reference and first phase frames…");
            });
            return;
        };

        // Keep the voxel aspect ratio of the slice.
        let [sx, sy, _] = data
            .display
            .field
            .as_ref()
            .map_or([1.0; 3], |f| f.geometry().spacing);
        let aspect = (dims[0] as f64 * sx.abs()) / (dims[1] as f64 * sy.abs()).max(f64::EPSILON);
        let avail = ui.available_size();
        let mut size = egui::vec2(avail.x, avail.x / aspect as f32);
        if size.y > avail.y {
            size = egui::vec2(avail.y * aspect as f32, avail.y);
        }

        let resp = ui.add(
            egui::Image::new((texture.id(), size)).sense(egui::Sense::click()),
        );
        if resp.clicked() {
            if let Some(pos) = resp.interact_pointer_pos() {
                let rel = (pos - resp.rect.min) / resp.rect.size();
                let ijk = pixel_to_voxel(rel.x, rel.y, self.slice, dims);
                self.place_sensor(ijk, data);
            }
        }
        resp.on_hover_text(match data.display.pending_move() {
            Some(id) => format!("Click to move {id} here"),
            None => "Click to add a sensor here".to_owned(),
        });
    }
}
