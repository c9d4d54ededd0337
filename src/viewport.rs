use crate::config::SliceLink;
use crate::enums::Orientation;
use crate::volume::Volume;
use crate::window::IntensityWindow;

/// Slice position and display threshold of one viewer session.
///
/// The state is a plain value. Setters clamp instead of failing, so any
/// slider input lands on the nearest valid position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    dim: (usize, usize, usize),
    link: SliceLink,
    current_index: usize,
    plane_indices: [usize; 3],
    display_floor: f32,
    min_physical: f32,
    max_physical: f32,
}

impl ViewportState {
    /// Starts at slice 0 with the floor at the volume minimum.
    pub fn new(volume: &Volume, link: SliceLink) -> Self {
        Self {
            dim: volume.dim(),
            link,
            current_index: 0,
            plane_indices: [0; 3],
            display_floor: volume.min_physical(),
            min_physical: volume.min_physical(),
            max_physical: volume.max_physical(),
        }
    }

    pub fn link(&self) -> SliceLink {
        self.link
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn display_floor(&self) -> f32 {
        self.display_floor
    }

    /// Slider bounds of the threshold control.
    pub fn physical_range(&self) -> (f32, f32) {
        (self.min_physical, self.max_physical)
    }

    /// Largest value of the shared slice slider.
    pub fn max_index(&self) -> usize {
        self.dim.2 - 1
    }

    pub fn set_slice_index(&mut self, index: i64) {
        self.current_index = clamp_index(index, self.dim.2);
        if self.link == SliceLink::Independent {
            let current = self.current_index;
            self.plane_indices = Orientation::ALL.map(|o| current.min(o.depth(self.dim) - 1));
        }
    }

    /// Moves a single plane. Without independent planes this is the shared
    /// slider.
    pub fn set_plane_index(&mut self, orientation: Orientation, index: i64) {
        match self.link {
            SliceLink::Shared => self.set_slice_index(index),
            SliceLink::Independent => {
                self.plane_indices[orientation.position()] =
                    clamp_index(index, orientation.depth(self.dim));
            }
        }
    }

    /// NaN leaves the floor where it is.
    pub fn set_display_floor(&mut self, floor: f32) {
        if floor.is_nan() {
            return;
        }
        self.display_floor = floor.clamp(self.min_physical, self.max_physical);
    }

    /// The slice shown on a plane, always within that plane's fixed axis.
    pub fn index_for(&self, orientation: Orientation) -> usize {
        match self.link {
            SliceLink::Shared => self.current_index.min(orientation.depth(self.dim) - 1),
            SliceLink::Independent => self.plane_indices[orientation.position()],
        }
    }

    pub fn window(&self) -> IntensityWindow {
        IntensityWindow::new(self.display_floor, self.max_physical)
    }
}

fn clamp_index(index: i64, extent: usize) -> usize {
    let last = extent.saturating_sub(1);
    if index < 0 {
        return 0;
    }
    // wider than usize on 32-bit targets
    usize::try_from(index).unwrap_or(usize::MAX).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Calibration;
    use ndarray::Array3;

    fn volume(dim: (usize, usize, usize)) -> Volume {
        let mut data = Array3::zeros(dim);
        data[[dim.0 - 1, dim.1 - 1, dim.2 - 1]] = 4000;
        Volume::new(data, Calibration::new(1.0, -1000.0)).unwrap()
    }

    #[test]
    fn starts_at_first_slice_and_minimum_floor() {
        let state = ViewportState::new(&volume((4, 4, 4)), SliceLink::Shared);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.display_floor(), -1000.0);
        assert_eq!(state.physical_range(), (-1000.0, 3000.0));
    }

    #[test]
    fn floor_clamps_to_physical_range() {
        let mut state = ViewportState::new(&volume((4, 4, 4)), SliceLink::Shared);
        state.set_display_floor(5000.0);
        assert_eq!(state.display_floor(), 3000.0);
        state.set_display_floor(-9999.0);
        assert_eq!(state.display_floor(), -1000.0);
        state.set_display_floor(f32::NAN);
        assert_eq!(state.display_floor(), -1000.0);
    }

    #[test]
    fn slice_index_clamps_to_slice_axis() {
        let mut state = ViewportState::new(&volume((4, 4, 6)), SliceLink::Shared);
        state.set_slice_index(17);
        assert_eq!(state.current_index(), 5);
        state.set_slice_index(-3);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn extreme_slider_values_land_on_the_boundaries() {
        let mut state = ViewportState::new(&volume((4, 4, 6)), SliceLink::Shared);
        state.set_slice_index(i64::MAX);
        assert_eq!(state.current_index(), state.max_index());
        state.set_slice_index(5_000_000_000);
        assert_eq!(state.current_index(), 5);
        state.set_slice_index(i64::MIN);
        assert_eq!(state.current_index(), 0);

        assert_eq!(clamp_index(i64::MAX, 7), 6);
        assert_eq!(clamp_index(i64::MIN, 7), 0);
    }

    #[test]
    fn setters_are_idempotent() {
        let mut state = ViewportState::new(&volume((4, 4, 4)), SliceLink::Shared);
        state.set_slice_index(2);
        state.set_display_floor(120.5);
        let once = state;
        state.set_slice_index(2);
        state.set_display_floor(120.5);
        assert_eq!(state, once);
    }

    #[test]
    fn shared_index_is_bounded_per_plane() {
        let mut state = ViewportState::new(&volume((2, 3, 8)), SliceLink::Shared);
        state.set_slice_index(6);
        assert_eq!(state.index_for(Orientation::Sagittal), 6);
        assert_eq!(state.index_for(Orientation::Coronal), 2);
        assert_eq!(state.index_for(Orientation::Axial), 1);
    }

    #[test]
    fn independent_planes_move_alone() {
        let mut state = ViewportState::new(&volume((4, 5, 6)), SliceLink::Independent);
        assert_eq!(state.link(), SliceLink::Independent);
        state.set_plane_index(Orientation::Coronal, 3);
        assert_eq!(state.index_for(Orientation::Coronal), 3);
        assert_eq!(state.index_for(Orientation::Sagittal), 0);
        assert_eq!(state.index_for(Orientation::Axial), 0);

        state.set_plane_index(Orientation::Axial, 99);
        assert_eq!(state.index_for(Orientation::Axial), 3);

        state.set_slice_index(5);
        assert_eq!(state.index_for(Orientation::Sagittal), 5);
        assert_eq!(state.index_for(Orientation::Coronal), 4);
        assert_eq!(state.index_for(Orientation::Axial), 3);
    }

    #[test]
    fn window_follows_floor() {
        let mut state = ViewportState::new(&volume((4, 4, 4)), SliceLink::Shared);
        state.set_display_floor(200.0);
        let window = state.window();
        assert_eq!(window.floor(), 200.0);
        assert_eq!(window.ceiling(), 3000.0);
    }
}
