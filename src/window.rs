/// Linear display window over physical intensities.
///
/// Values at or below `floor` map to black, values at or above `ceiling`
/// map to white. The window is derived from the viewport on every redraw
/// and shared by all three planes of that redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityWindow {
    floor: f32,
    ceiling: f32,
}

impl IntensityWindow {
    /// A floor above the ceiling is pulled down to the ceiling.
    pub fn new(floor: f32, ceiling: f32) -> Self {
        Self {
            floor: floor.min(ceiling),
            ceiling,
        }
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Clip a physical value into `[floor, ceiling]`.
    #[inline]
    pub fn clamp(&self, physical: f32) -> f32 {
        physical.clamp(self.floor, self.ceiling)
    }

    /// Map a physical value to `0.0..=1.0`.
    #[inline]
    pub fn normalize(&self, physical: f32) -> f32 {
        let width = self.ceiling - self.floor;
        if width <= 0.0 {
            // degenerate window: a step at the ceiling
            return if physical >= self.ceiling { 1.0 } else { 0.0 };
        }
        (self.clamp(physical) - self.floor) / width
    }

    /// Map a physical value to an 8-bit gray level.
    #[inline]
    pub fn to_luma(&self, physical: f32) -> u8 {
        (self.normalize(physical) * 255.0).round().clamp(0.0, 255.0) as u8
    }
}
