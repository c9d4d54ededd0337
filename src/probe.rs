use crate::config::DensityReadout;
use crate::enums::Orientation;
use crate::volume::Volume;

use log::trace;

/// Volume coordinate `(row, column, slice)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voxel {
    pub row: usize,
    pub col: usize,
    pub slice: usize,
}

/// Crosshair through the probed pixel: a horizontal line at `row` and a
/// vertical line at `col`, both in plane pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuideLines {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeResult {
    pub orientation: Orientation,
    pub voxel: Voxel,
    pub raw: i32,
    pub density: f32,
    pub guides: GuideLines,
}

/// Map a pointer position on a plane back into the volume.
///
/// `x` runs along the plane's width and `y` along its height. Both are
/// floored. Positions off the image, including non-finite ones, return
/// `None`.
pub fn probe(
    volume: &Volume,
    orientation: Orientation,
    x: f32,
    y: f32,
    index: usize,
    readout: DensityReadout,
) -> Option<ProbeResult> {
    let (height, width) = orientation.plane_dim(volume.dim());
    let (Some(col), Some(row)) = (pixel(x, width), pixel(y, height)) else {
        trace!("probe miss on {orientation} at ({x}, {y})");
        return None;
    };

    let (r, c, s) = orientation.voxel(index, row, col);
    let raw = match volume.raw_at(r, c, s) {
        Ok(raw) => raw,
        Err(err) => {
            trace!("probe miss on {orientation}: {err}");
            return None;
        }
    };

    let density = match readout {
        DensityReadout::Calibrated => volume.to_physical(raw),
        DensityReadout::FixedOffset(offset) => raw as f32 - offset,
    };

    Some(ProbeResult {
        orientation,
        voxel: Voxel {
            row: r,
            col: c,
            slice: s,
        },
        raw,
        density,
        guides: GuideLines { row, col },
    })
}

fn pixel(value: f32, extent: usize) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let floored = value.floor() as usize;
    (floored < extent).then_some(floored)
}
