use crate::{
    enums::SortBy,
    volume::{Calibration, Volume, VolumeError},
};

use dicom::{
    core::Tag,
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use log::{info, warn};
use ndarray::{Array2, Array3, Axis, s};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a single, possibly multi-frame, DICOM file.
    ///
    /// Frames are stacked along the first axis.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let dicom_object = open_file(path.as_ref())?;
        let volume = Self::load_multi_frame(&dicom_object)?;
        info!("loaded {:?} from {}", volume.dim(), path.as_ref().display());
        Ok(volume)
    }

    /// Load a volume from DICOM objects
    ///
    /// # Arguments
    ///
    /// * `dicom_objects` - Slice of DICOM file objects, one image each
    /// * `sort_by` - Method to sort the slices
    ///
    /// A lone object contributes all of its frames, as with
    /// [`VolumeLoader::load_from_file`]. In a series only the first frame of
    /// each object is used. Objects without the sort key are kept and sort
    /// before the keyed ones.
    ///
    /// # Errors
    ///
    /// Returns error if no valid images found or dimensions are inconsistent
    pub fn load_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        if let [dicom_object] = dicom_objects {
            return Self::load_multi_frame(dicom_object);
        }

        let mut images_with_order: Vec<_> = dicom_objects
            .iter()
            .filter_map(|dicom_object| Self::extract_image_with_order(dicom_object, sort_by))
            .collect();

        if images_with_order.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }
        if images_with_order.len() < dicom_objects.len() {
            warn!(
                "skipped {} objects without decodable pixel data",
                dicom_objects.len() - images_with_order.len()
            );
        }
        let unordered = images_with_order
            .iter()
            .filter(|(order, _)| order.is_none())
            .count();
        if unordered > 0 && sort_by != SortBy::None {
            warn!("{unordered} images have no {sort_by:?}, they sort as unknown");
        }

        Self::sort_images(&mut images_with_order, sort_by);

        let images: Vec<_> = images_with_order
            .into_iter()
            .map(|(_, image)| image)
            .collect();

        Self::validate_dimensions(&images)?;

        let volume_array = Self::build_volume_array(&images);
        let calibration = Self::get_calibration(dicom_objects);
        info!("loaded {:?} from {} images", volume_array.dim(), images.len());

        Ok(Volume::new(volume_array, calibration)?)
    }

    /// Load a volume from file paths
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path>],
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> =
            paths.iter().map(|path| open_file(path.as_ref())).collect();

        Self::load_from_dicom_objects(&objects?, sort_by)
    }

    /// Load a volume from a directory containing .dcm files
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        Self::load_from_file_paths(&paths, sort_by)
    }

    fn load_multi_frame(
        dicom_object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Volume, VolumeLoaderError> {
        let data = Self::decode_frames(dicom_object).ok_or(VolumeLoaderError::NoValidImages)?;
        let calibration = Self::get_calibration(std::slice::from_ref(dicom_object));
        Ok(Volume::new(data, calibration)?)
    }

    fn extract_image_with_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
    ) -> Option<(Option<f32>, Array2<i32>)> {
        let frames = Self::decode_frames(dicom_object)?;
        if frames.dim().0 > 1 {
            warn!(
                "object with {} frames in a series, only the first is used",
                frames.dim().0
            );
        }
        let order = Self::get_sort_order(dicom_object, sort_by);
        Some((order, frames.index_axis_move(Axis(0), 0)))
    }

    fn get_sort_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
    ) -> Option<f32> {
        let floats = |tag: Tag| -> Option<Vec<f32>> {
            dicom_object.element(tag).ok()?.to_multi_float32().ok()
        };
        match sort_by {
            SortBy::ImagePositionPatient => floats(tags::IMAGE_POSITION_PATIENT)?.get(2).copied(),
            SortBy::TablePosition => floats(tags::TABLE_POSITION)?.first().copied(),
            SortBy::InstanceNumber => dicom_object
                .element(tags::INSTANCE_NUMBER)
                .ok()?
                .to_int::<i32>()
                .ok()
                .map(|n| n as f32),
            SortBy::None => Some(0.0),
        }
    }

    /// Stored sample values of every frame, without modality or VOI LUT.
    fn decode_frames(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<Array3<i32>> {
        let pixel_data = dicom_object.decode_pixel_data().ok()?;
        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::None)
            .with_voi_lut(VoiLutOption::Identity);
        pixel_data
            .to_ndarray_with_options::<i32>(&options)
            .ok()
            .map(|arr| arr.slice_move(s![.., .., .., 0]))
    }

    fn sort_images(images_with_order: &mut [(Option<f32>, Array2<i32>)], sort_by: SortBy) {
        if !matches!(sort_by, SortBy::None) {
            images_with_order
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }

        if matches!(sort_by, SortBy::ImagePositionPatient) {
            images_with_order.reverse();
        }
    }

    fn validate_dimensions(images: &[Array2<i32>]) -> Result<(), VolumeLoaderError> {
        let first_dim = images[0].dim();
        if images.iter().any(|img| img.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentDimensions);
        }
        Ok(())
    }

    fn build_volume_array(images: &[Array2<i32>]) -> Array3<i32> {
        let (height, width) = images[0].dim();
        let depth = images.len();
        let mut volume = Array3::<i32>::zeros((depth, height, width));

        for (i, image) in images.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(image);
        }

        volume
    }

    /// Rescale slope and intercept default to 1 and 0 when absent.
    fn get_calibration(dicom_objects: &[FileDicomObject<InMemDicomObject>]) -> Calibration {
        let first_float = |tag: Tag| {
            dicom_objects.iter().find_map(|dicom_object| {
                dicom_object
                    .element(tag)
                    .ok()?
                    .to_multi_float32()
                    .ok()?
                    .first()
                    .copied()
            })
        };

        let defaults = Calibration::default();
        Calibration {
            rescale_slope: first_float(tags::RESCALE_SLOPE).unwrap_or(defaults.rescale_slope),
            rescale_intercept: first_float(tags::RESCALE_INTERCEPT)
                .unwrap_or(defaults.rescale_intercept),
            window_center: first_float(tags::WINDOW_CENTER),
            window_width: first_float(tags::WINDOW_WIDTH),
        }
    }
}
