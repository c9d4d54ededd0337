use std::{error::Error, path::PathBuf};

use clap::Parser;
use dicom_triplanar::{
    DensityReadout, Orientation, SliceLink, SortBy, Viewer, ViewerConfig, ViewerEvent,
    VolumeLoader,
};
use log::{info, warn};

#[derive(Debug, clap::ValueEnum, Clone, Copy)]
enum ArgSortBy {
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}

impl From<ArgSortBy> for SortBy {
    fn from(value: ArgSortBy) -> Self {
        match value {
            ArgSortBy::ImagePositionPatient => SortBy::ImagePositionPatient,
            ArgSortBy::TablePosition => SortBy::TablePosition,
            ArgSortBy::InstanceNumber => SortBy::InstanceNumber,
            ArgSortBy::None => SortBy::None,
        }
    }
}

#[derive(Debug, clap::ValueEnum, Clone, Copy)]
enum ArgOrientation {
    Sagittal,
    Coronal,
    Axial,
}

impl From<ArgOrientation> for Orientation {
    fn from(value: ArgOrientation) -> Self {
        match value {
            ArgOrientation::Sagittal => Orientation::Sagittal,
            ArgOrientation::Coronal => Orientation::Coronal,
            ArgOrientation::Axial => Orientation::Axial,
        }
    }
}

/// Render the triplanar view of a CT volume to a PNG.
#[derive(Parser, Debug)]
struct Args {
    /// A multi-frame DICOM file or a directory of .dcm files.
    input: PathBuf,
    /// Where to write the 2×2 composite.
    #[arg(short, long, default_value = "result.png")]
    output: PathBuf,
    /// Slice ordering when reading a directory.
    #[arg(long, value_enum, default_value = "instance-number")]
    sort_by: ArgSortBy,
    /// Shared slice index, clamped to the volume.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    slice: i64,
    /// Display threshold in physical units. Defaults to the volume minimum.
    #[arg(long, allow_negative_numbers = true)]
    floor: Option<f32>,
    /// Plane to probe, together with `--x` and `--y`.
    #[arg(long, value_enum, requires_all = ["x", "y"])]
    probe: Option<ArgOrientation>,
    #[arg(long, allow_negative_numbers = true)]
    x: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    y: Option<f32>,
    /// Report `raw - OFFSET` instead of the calibrated value.
    #[arg(long, allow_negative_numbers = true)]
    fixed_offset: Option<f32>,
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();

    let volume = if args.input.is_dir() {
        VolumeLoader::load_from_directory(&args.input, args.sort_by.into())?
    } else {
        VolumeLoader::load_from_file(&args.input)?
    };

    let config = ViewerConfig {
        slice_link: SliceLink::Shared,
        readout: args
            .fixed_offset
            .map_or(DensityReadout::Calibrated, DensityReadout::FixedOffset),
        ..Default::default()
    };
    let mut viewer = Viewer::with_volume(config, volume);
    let volume = viewer.volume()?;
    info!(
        "volume {:?}, {} .. {} {}",
        volume.dim(),
        volume.min_physical(),
        volume.max_physical(),
        viewer.config().unit
    );
    let last_slice = viewer.state()?.max_index();
    if !(0..=last_slice as i64).contains(&args.slice) {
        warn!("slice {} is outside 0..={last_slice}, clamping", args.slice);
    }

    let mut frame = viewer.dispatch(ViewerEvent::SliceSliderChanged(args.slice))?;
    if let Some(floor) = args.floor {
        frame = viewer.dispatch(ViewerEvent::ThresholdSliderChanged(floor))?;
    }
    if let (Some(orientation), Some(x), Some(y)) = (args.probe, args.x, args.y) {
        frame = viewer.dispatch(ViewerEvent::PointerMoved {
            orientation: orientation.into(),
            x,
            y,
        })?;
        if viewer.probe().is_none() {
            info!("pointer is outside the {} plane", Orientation::from(orientation));
        }
    }

    for view in frame.views() {
        info!("{}", view.label);
    }

    frame.compose().save(&args.output)?;
    info!("wrote {}", args.output.display());

    Ok(())
}
