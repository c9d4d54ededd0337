//! # DICOM-triplanar library
//!
//! This crate is the viewing engine of an interactive triplanar viewer for
//! CT volumes. A volume is browsed along the three medical planes:
//!  - Sagittal
//!  - Coronal
//!  - Axial
//!
//!  One shared slider scrubs all three planes at once, a density threshold
//!  sets the floor of the display window (the ceiling is the volume
//!  maximum) and the pointer can probe the physical value of any voxel.
//!
//!  The widget toolkit stays outside of this crate. It forwards slider
//!  and pointer gestures as [`ViewerEvent`]s and draws the returned
//!  [`Frame`]: one 8-bit image per plane, a title label and an optional
//!  crosshair.
//!
//!  Volumes are read with the dicom-rs ecosystem, either from a single
//!  multi-frame file or from a folder of single-frame files. Raw stored
//!  values are kept and converted to physical units with the Rescale
//!  Slope and Intercept of the source.
//!
//! # Examples
//!
//! ## Probing a voxel
//!
//! Load a series, move to slice 40, raise the threshold to 0 HU and probe
//! the axial plane at pixel (120, 200).
//!
//! ```no_run
//! # use dicom_triplanar::{Orientation, SortBy, Viewer, ViewerConfig, ViewerEvent, VolumeLoader};
//! let volume = VolumeLoader::load_from_directory("dicom", SortBy::InstanceNumber)
//!     .expect("should have loaded files from directory");
//! let mut viewer = Viewer::with_volume(ViewerConfig::default(), volume);
//! viewer.dispatch(ViewerEvent::SliceSliderChanged(40)).unwrap();
//! viewer.dispatch(ViewerEvent::ThresholdSliderChanged(0.0)).unwrap();
//! let frame = viewer
//!     .dispatch(ViewerEvent::PointerMoved {
//!         orientation: Orientation::Axial,
//!         x: 120.0,
//!         y: 200.0,
//!     })
//!     .unwrap();
//! println!("{}", frame.view(Orientation::Axial).label);
//! frame.compose().save("result.png").unwrap();
//! ```

pub mod config;
pub mod enums;
pub mod probe;
pub mod render;
pub mod viewer;
pub mod viewport;
pub mod volume;
pub mod volume_loader;
pub mod window;

pub use config::{DensityReadout, SliceLink, ViewerConfig};
pub use enums::{Orientation, SortBy};
pub use probe::{GuideLines, ProbeResult, Voxel};
pub use render::{Frame, PlaneView};
pub use viewer::{Phase, Viewer, ViewerError, ViewerEvent};
pub use viewport::ViewportState;
pub use volume::{Calibration, Volume, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
pub use window::IntensityWindow;
