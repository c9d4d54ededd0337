use crate::enums::Orientation;
use crate::window::IntensityWindow;

use image::GrayImage;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::s;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VolumeError {
    #[error("Volume has an empty extent: {0:?}")]
    EmptyExtent((usize, usize, usize)),

    #[error("Calibration slope {slope} and intercept {intercept} give non-finite values")]
    InvalidCalibration { slope: f32, intercept: f32 },

    #[error("Index {index} out of range for axis {axis} with extent {extent}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },
}

/// Modality calibration of the stored samples.
///
/// Window center and width are the nominal display window of the source
/// file. They are informational only, the viewer drives its own floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub rescale_slope: f32,
    pub rescale_intercept: f32,
    pub window_center: Option<f32>,
    pub window_width: Option<f32>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
            window_center: None,
            window_width: None,
        }
    }
}

impl Calibration {
    pub fn new(rescale_slope: f32, rescale_intercept: f32) -> Self {
        Self {
            rescale_slope,
            rescale_intercept,
            ..Default::default()
        }
    }
}

/// Raw samples indexed `(row, column, slice)` plus their calibration.
#[derive(Debug)]
pub struct Volume {
    data: Array3<i32>,
    calibration: Calibration,
    physical_range: (f32, f32),
}

impl Volume {
    pub fn new(data: Array3<i32>, calibration: Calibration) -> Result<Self, VolumeError> {
        let dim = data.dim();
        if dim.0 == 0 || dim.1 == 0 || dim.2 == 0 {
            return Err(VolumeError::EmptyExtent(dim));
        }

        let (min_raw, max_raw) = data
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let a = to_physical(&calibration, min_raw);
        let b = to_physical(&calibration, max_raw);
        if !(a.is_finite() && b.is_finite()) {
            return Err(VolumeError::InvalidCalibration {
                slope: calibration.rescale_slope,
                intercept: calibration.rescale_intercept,
            });
        }

        Ok(Self {
            data,
            calibration,
            physical_range: (a.min(b), a.max(b)),
        })
    }

    /// Get the dimensions of the volume (rows, columns, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn min_physical(&self) -> f32 {
        self.physical_range.0
    }

    pub fn max_physical(&self) -> f32 {
        self.physical_range.1
    }

    #[inline]
    pub fn to_physical(&self, raw: i32) -> f32 {
        to_physical(&self.calibration, raw)
    }

    pub fn raw_at(&self, row: usize, col: usize, slice: usize) -> Result<i32, VolumeError> {
        let dim = self.dim();
        for (axis, index, extent) in [(0, row, dim.0), (1, col, dim.1), (2, slice, dim.2)] {
            if index >= extent {
                return Err(VolumeError::IndexOutOfRange {
                    axis,
                    index,
                    extent,
                });
            }
        }
        Ok(self.data[[row, col, slice]])
    }

    pub fn physical_at(&self, row: usize, col: usize, slice: usize) -> Result<f32, VolumeError> {
        self.raw_at(row, col, slice).map(|raw| self.to_physical(raw))
    }

    /// Borrow a 2-D slice along the given plane without copying.
    ///
    /// Sagittal yields `[row, col]`, Coronal `[row, slice]` and Axial
    /// `[col, slice]`.
    pub fn get_slice_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
    ) -> Result<ArrayView2<'_, i32>, VolumeError> {
        self.check_index(index, orientation)?;
        let slice = match orientation {
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Axial => self.data.slice(s![index, .., ..]),
        };
        Ok(slice)
    }

    /// Render a slice through the display window as an 8-bit image.
    pub fn get_image_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
        window: &IntensityWindow,
    ) -> Result<Option<GrayImage>, VolumeError> {
        let slice = self.get_slice_from_axis(index, orientation)?;
        Ok(self.slice_to_image(&slice, window))
    }

    fn slice_to_image(
        &self,
        slice: &ArrayView2<'_, i32>,
        window: &IntensityWindow,
    ) -> Option<GrayImage> {
        let (height, width) = slice.dim();
        let calibration = &self.calibration;
        let pixel_data: Vec<u8> = slice
            .axis_iter(Axis(0))
            .into_par_iter()
            .flat_map_iter(|row| {
                row.into_iter()
                    .map(|&raw| window.to_luma(to_physical(calibration, raw)))
                    .collect::<Vec<u8>>()
            })
            .collect();
        GrayImage::from_raw(width as u32, height as u32, pixel_data)
    }

    fn check_index(&self, index: usize, orientation: Orientation) -> Result<(), VolumeError> {
        let extent = orientation.depth(self.dim());
        if index < extent {
            Ok(())
        } else {
            Err(VolumeError::IndexOutOfRange {
                axis: orientation.fixed_axis(),
                index,
                extent,
            })
        }
    }
}

#[inline]
fn to_physical(calibration: &Calibration, raw: i32) -> f32 {
    (raw as f32).mul_add(calibration.rescale_slope, calibration.rescale_intercept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(dim: (usize, usize, usize)) -> Volume {
        let data = Array3::from_shape_fn(dim, |(r, c, s)| (r * 100 + c * 10 + s) as i32);
        Volume::new(data, Calibration::new(1.0, -1000.0)).unwrap()
    }

    #[test]
    fn rejects_empty_extent() {
        let result = Volume::new(Array3::zeros((3, 0, 2)), Calibration::default());
        assert_eq!(result.unwrap_err(), VolumeError::EmptyExtent((3, 0, 2)));
    }

    #[test]
    fn rejects_non_finite_calibration() {
        let result = Volume::new(Array3::ones((1, 1, 1)), Calibration::new(f32::NAN, 0.0));
        assert!(matches!(result, Err(VolumeError::InvalidCalibration { .. })));
    }

    #[test]
    fn extracted_slices_follow_index_ordering() {
        let volume = ramp((3, 4, 5));
        let (rows, cols, slices) = volume.dim();

        for index in 0..slices {
            let view = volume.get_slice_from_axis(index, Orientation::Sagittal).unwrap();
            assert_eq!(view.dim(), (rows, cols));
            for ((r, c), &v) in view.indexed_iter() {
                assert_eq!(v, volume.raw_at(r, c, index).unwrap());
            }
        }
        for index in 0..cols {
            let view = volume.get_slice_from_axis(index, Orientation::Coronal).unwrap();
            assert_eq!(view.dim(), (rows, slices));
            for ((r, s), &v) in view.indexed_iter() {
                assert_eq!(v, volume.raw_at(r, index, s).unwrap());
            }
        }
        for index in 0..rows {
            let view = volume.get_slice_from_axis(index, Orientation::Axial).unwrap();
            assert_eq!(view.dim(), (cols, slices));
            for ((c, s), &v) in view.indexed_iter() {
                assert_eq!(v, volume.raw_at(index, c, s).unwrap());
            }
        }
    }

    #[test]
    fn extraction_past_fixed_axis_fails() {
        let volume = ramp((3, 4, 5));
        assert_eq!(
            volume.get_slice_from_axis(3, Orientation::Axial).unwrap_err(),
            VolumeError::IndexOutOfRange {
                axis: 0,
                index: 3,
                extent: 3
            }
        );
        assert!(volume.get_slice_from_axis(4, Orientation::Sagittal).is_ok());
        assert!(volume.get_slice_from_axis(5, Orientation::Sagittal).is_err());
    }

    #[test]
    fn raw_access_reports_first_bad_axis() {
        let volume = ramp((3, 4, 5));
        assert_eq!(volume.raw_at(2, 3, 4), Ok(234));
        assert_eq!(
            volume.raw_at(0, 4, 9),
            Err(VolumeError::IndexOutOfRange {
                axis: 1,
                index: 4,
                extent: 4
            })
        );
    }

    #[test]
    fn physical_range_uses_calibration() {
        let volume = ramp((2, 2, 2));
        assert_eq!(volume.to_physical(1000), 0.0);
        assert_eq!(volume.min_physical(), -1000.0);
        assert_eq!(volume.max_physical(), 111.0 - 1000.0);

        let data = Array3::from_shape_vec((1, 1, 2), vec![0, 10]).unwrap();
        let inverted = Volume::new(data, Calibration::new(-2.0, 0.0)).unwrap();
        assert_eq!(inverted.min_physical(), -20.0);
        assert_eq!(inverted.max_physical(), 0.0);
    }

    #[test]
    fn image_matches_slice_shape_and_window() {
        let volume = ramp((3, 4, 5));
        let window = IntensityWindow::new(volume.min_physical(), volume.max_physical());
        let image = volume
            .get_image_from_axis(1, Orientation::Coronal, &window)
            .unwrap()
            .unwrap();
        assert_eq!((image.width(), image.height()), (5, 3));

        let view = volume.get_slice_from_axis(1, Orientation::Coronal).unwrap();
        for ((r, s), &raw) in view.indexed_iter() {
            let expected = window.to_luma(volume.to_physical(raw));
            assert_eq!(image.get_pixel(s as u32, r as u32).0[0], expected);
        }
    }
}
