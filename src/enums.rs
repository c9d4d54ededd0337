use std::fmt;

/// The three orthogonal viewing planes.
///
/// Each plane holds one axis of the `(row, column, slice)` volume fixed:
///  - Sagittal fixes the slice axis (2)
///  - Coronal fixes the column axis (1)
///  - Axial fixes the row axis (0)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Sagittal,
    Coronal,
    Axial,
}

impl Orientation {
    /// All planes in display order.
    pub const ALL: [Orientation; 3] = [
        Orientation::Sagittal,
        Orientation::Coronal,
        Orientation::Axial,
    ];

    /// The volume axis held constant when slicing along this plane.
    pub fn fixed_axis(self) -> usize {
        match self {
            Orientation::Sagittal => 2,
            Orientation::Coronal => 1,
            Orientation::Axial => 0,
        }
    }

    /// Extent of the fixed axis, i.e. the number of slices along this plane.
    pub fn depth(self, dim: (usize, usize, usize)) -> usize {
        match self {
            Orientation::Sagittal => dim.2,
            Orientation::Coronal => dim.1,
            Orientation::Axial => dim.0,
        }
    }

    /// Shape `(height, width)` of a slice along this plane.
    pub fn plane_dim(self, dim: (usize, usize, usize)) -> (usize, usize) {
        match self {
            Orientation::Sagittal => (dim.0, dim.1),
            Orientation::Coronal => (dim.0, dim.2),
            Orientation::Axial => (dim.1, dim.2),
        }
    }

    /// Map an in-plane position back to the volume. `row` is the vertical
    /// pixel coordinate, `col` the horizontal one.
    pub fn voxel(self, index: usize, row: usize, col: usize) -> (usize, usize, usize) {
        match self {
            Orientation::Sagittal => (row, col, index),
            Orientation::Coronal => (row, index, col),
            Orientation::Axial => (index, row, col),
        }
    }

    pub(crate) fn position(self) -> usize {
        match self {
            Orientation::Sagittal => 0,
            Orientation::Coronal => 1,
            Orientation::Axial => 2,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Sagittal => write!(f, "Sagittal"),
            Orientation::Coronal => write!(f, "Coronal"),
            Orientation::Axial => write!(f, "Axial"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}
