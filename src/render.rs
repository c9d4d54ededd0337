use crate::enums::Orientation;
use crate::probe::GuideLines;

use image::{DynamicImage, GrayImage, Rgb, RgbImage, imageops};

const HORIZONTAL_GUIDE: Rgb<u8> = Rgb([0, 0, 255]);
const VERTICAL_GUIDE: Rgb<u8> = Rgb([0, 255, 0]);
const DASH: u32 = 4;

/// Display-ready output for one plane.
#[derive(Clone, Debug)]
pub struct PlaneView {
    pub orientation: Orientation,
    pub index: usize,
    pub image: GrayImage,
    pub label: String,
    pub guides: Option<GuideLines>,
}

impl PlaneView {
    /// The plane as RGB with its guide lines drawn in.
    pub fn to_rgb(&self) -> RgbImage {
        let mut rgb = DynamicImage::ImageLuma8(self.image.clone()).to_rgb8();
        if let Some(guides) = self.guides {
            draw_guides(&mut rgb, guides);
        }
        rgb
    }
}

/// One redraw of all three planes, rendered from a single viewport state.
#[derive(Clone, Debug)]
pub struct Frame {
    views: [PlaneView; 3],
}

impl Frame {
    pub(crate) fn new(views: [PlaneView; 3]) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &[PlaneView; 3] {
        &self.views
    }

    pub fn view(&self, orientation: Orientation) -> &PlaneView {
        &self.views[orientation.position()]
    }

    /// Lay the planes out in a 2×2 grid: sagittal top left, coronal top
    /// right, axial bottom left. The bottom right cell stays black.
    pub fn compose(&self) -> RgbImage {
        let [sagittal, coronal, axial] = &self.views;
        let cell_width = sagittal.image.width().max(axial.image.width());
        let cell_height = sagittal.image.height().max(coronal.image.height());
        let width = cell_width + coronal.image.width();
        let height = cell_height + axial.image.height();

        let mut canvas = RgbImage::new(width, height);
        imageops::overlay(&mut canvas, &sagittal.to_rgb(), 0, 0);
        imageops::overlay(&mut canvas, &coronal.to_rgb(), i64::from(cell_width), 0);
        imageops::overlay(&mut canvas, &axial.to_rgb(), 0, i64::from(cell_height));
        canvas
    }
}

/// Dashed crosshair: blue horizontal line, green vertical line.
pub fn draw_guides(image: &mut RgbImage, guides: GuideLines) {
    let (width, height) = image.dimensions();
    let (row, col) = (guides.row as u32, guides.col as u32);

    if row < height {
        for x in (0..width).filter(|x| (x / DASH) % 2 == 0) {
            image.put_pixel(x, row, HORIZONTAL_GUIDE);
        }
    }
    if col < width {
        for y in (0..height).filter(|y| (y / DASH) % 2 == 0) {
            image.put_pixel(col, y, VERTICAL_GUIDE);
        }
    }
}
