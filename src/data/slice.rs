//! Axial slices of a temperature field as RGBA images.
//!
//! Image columns follow voxel `i`, image rows follow voxel `j` with the row
//! order flipped so that increasing `j` points up on screen.

use std::path::Path;

use eframe::egui;
use image::{Rgba, RgbaImage};

use crate::color_scheme::ThermalLut;

use super::stack::TemperatureField;

/// Render slice `k` through the lookup table. `None` if `k` is outside the field.
pub fn render_slice(field: &TemperatureField, k: usize, lut: &ThermalLut) -> Option<RgbaImage> {
    let [nx, ny, nz] = field.geometry().dims;
    if k >= nz || nx == 0 || ny == 0 {
        return None;
    }
    let mut out = RgbaImage::new(nx as u32, ny as u32);
    for j in 0..ny {
        let row = (ny - 1 - j) as u32;
        for i in 0..nx {
            let c = lut.color_for(field.value_at(i, j, k));
            let [r, g, b, a] = c.to_srgba_unmultiplied();
            out.put_pixel(i as u32, row, Rgba([r, g, b, a]));
        }
    }
    Some(out)
}

/// Continuous voxel coordinates of a position inside a rendered slice,
/// given as fractions `[0, 1]` of the image width and height.
pub fn pixel_to_voxel(u: f32, v: f32, k: usize, dims: [usize; 3]) -> [f64; 3] {
    let [nx, ny, _] = dims;
    let x = (u as f64 * nx as f64).floor().clamp(0.0, nx.saturating_sub(1) as f64);
    let y = (v as f64 * ny as f64).floor().clamp(0.0, ny.saturating_sub(1) as f64);
    let j = ny.saturating_sub(1) as f64 - y;
    [x, j, k as f64]
}

pub fn to_color_image(img: &RgbaImage) -> egui::ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}

/// Write a slice to a PNG file.
pub fn save_png(img: &RgbaImage, path: &Path) -> image::ImageResult<()> {
    img.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frame::Geometry;

    fn field(values: Vec<f64>, dims: [usize; 3]) -> TemperatureField {
        TemperatureField::from_values(Geometry::new(dims, [1.0; 3], [0.0; 3]), values)
    }

    #[test]
    fn slice_rows_are_flipped() {
        // 2x2x1: j = 0 row at the bottom of the image
        let f = field(vec![50.0, 50.0, 10.0, 10.0], [2, 2, 1]);
        let lut = ThermalLut::new(25.0, 90.0);
        let img = render_slice(&f, 0, &lut).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        // below range -> transparent
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(0, 1)[3], 204);
        assert!(render_slice(&f, 1, &lut).is_none());
    }

    #[test]
    fn pixel_mapping_inverts_row_flip() {
        let dims = [4, 4, 2];
        assert_eq!(pixel_to_voxel(0.0, 0.0, 1, dims), [0.0, 3.0, 1.0]);
        assert_eq!(pixel_to_voxel(0.99, 0.99, 0, dims), [3.0, 0.0, 0.0]);
        assert_eq!(pixel_to_voxel(1.0, 1.0, 0, dims), [3.0, 0.0, 0.0]);
    }
}
