/// How the slice index is shared between the three planes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliceLink {
    /// One scrub position drives all planes.
    #[default]
    Shared,
    /// Every plane keeps its own index.
    Independent,
}

/// Conversion used for the hover readout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DensityReadout {
    /// `raw * slope + intercept` from the volume calibration.
    #[default]
    Calibrated,
    /// `raw - offset`, ignoring the calibration.
    FixedOffset(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub slice_link: SliceLink,
    pub readout: DensityReadout,
    /// Unit appended to probe readouts.
    pub unit: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            slice_link: SliceLink::default(),
            readout: DensityReadout::default(),
            unit: "HU".to_string(),
        }
    }
}
