use crate::config::ViewerConfig;
use crate::enums::Orientation;
use crate::probe::{ProbeResult, probe};
use crate::render::{Frame, PlaneView};
use crate::viewport::ViewportState;
use crate::volume::{Volume, VolumeError};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("No volume loaded")]
    VolumeNotLoaded,

    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    #[error("Could not build the display buffer for the {0} plane")]
    Render(Orientation),
}

/// Session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Interacting,
}

/// User gestures forwarded by the widget layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerEvent {
    /// The shared slice slider moved.
    SliceSliderChanged(i64),
    /// A per-plane slider moved. Only distinct from the shared slider with
    /// independent planes.
    PlaneSliderChanged {
        orientation: Orientation,
        index: i64,
    },
    /// The density threshold slider moved. The value is in physical units.
    ThresholdSliderChanged(f32),
    /// The pointer hovers over a plane at pixel position `(x, y)`.
    PointerMoved {
        orientation: Orientation,
        x: f32,
        y: f32,
    },
    /// The pointer left all planes.
    PointerLeft,
}

#[derive(Clone, Copy, Debug)]
struct Pointer {
    orientation: Orientation,
    x: f32,
    y: f32,
}

#[derive(Debug)]
struct Session {
    volume: Volume,
    state: ViewportState,
    pointer: Option<Pointer>,
    probe: Option<ProbeResult>,
}

/// Owns the volume and the viewport state, and is the only writer of the
/// latter.
///
/// Every event is applied to a copy of the state which then replaces the
/// current one in a single assignment. The returned frame is rendered from
/// that one state, so all three planes always agree on slice and threshold.
#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    phase: Phase,
    session: Option<Session>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            session: None,
        }
    }

    pub fn with_volume(config: ViewerConfig, volume: Volume) -> Self {
        let mut viewer = Self::new(config);
        viewer.load(volume);
        viewer
    }

    /// Open a volume, replacing any previous one. The viewport starts at
    /// slice 0 with the threshold at the volume minimum.
    pub fn load(&mut self, volume: Volume) {
        let state = ViewportState::new(&volume, self.config.slice_link);
        debug!(
            "loaded volume {:?}, physical range {:?}",
            volume.dim(),
            state.physical_range()
        );
        self.session = Some(Session {
            volume,
            state,
            pointer: None,
            probe: None,
        });
        self.phase = Phase::Ready;
    }

    /// Close the session and hand the volume back.
    pub fn close(&mut self) -> Option<Volume> {
        self.phase = Phase::Idle;
        self.session.take().map(|session| session.volume)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn volume(&self) -> Result<&Volume, ViewerError> {
        self.session().map(|session| &session.volume)
    }

    pub fn state(&self) -> Result<&ViewportState, ViewerError> {
        self.session().map(|session| &session.state)
    }

    /// The active probe, if the pointer is over a voxel.
    pub fn probe(&self) -> Option<&ProbeResult> {
        self.session.as_ref().and_then(|session| session.probe.as_ref())
    }

    /// Apply one gesture and redraw.
    ///
    /// # Errors
    ///
    /// Returns `VolumeNotLoaded` if no volume is open.
    pub fn dispatch(&mut self, event: ViewerEvent) -> Result<Frame, ViewerError> {
        let readout = self.config.readout;
        let session = self.session.as_mut().ok_or(ViewerError::VolumeNotLoaded)?;
        self.phase = Phase::Interacting;
        debug!("dispatching {event:?}");

        let mut next = session.state;
        match event {
            ViewerEvent::SliceSliderChanged(index) => next.set_slice_index(index),
            ViewerEvent::PlaneSliderChanged { orientation, index } => {
                next.set_plane_index(orientation, index)
            }
            ViewerEvent::ThresholdSliderChanged(floor) => next.set_display_floor(floor),
            ViewerEvent::PointerMoved { orientation, x, y } => {
                session.pointer = Some(Pointer { orientation, x, y })
            }
            ViewerEvent::PointerLeft => session.pointer = None,
        }
        session.state = next;

        // Re-probe on every event so the readout follows slice changes and
        // a previous plane's guides are never kept.
        session.probe = session.pointer.and_then(|pointer| {
            probe(
                &session.volume,
                pointer.orientation,
                pointer.x,
                pointer.y,
                next.index_for(pointer.orientation),
                readout,
            )
        });

        let frame = Self::render(session, &self.config);
        self.phase = Phase::Ready;
        frame
    }

    /// Render all three planes from the current state.
    pub fn redraw(&self) -> Result<Frame, ViewerError> {
        Self::render(self.session()?, &self.config)
    }

    fn session(&self) -> Result<&Session, ViewerError> {
        self.session.as_ref().ok_or(ViewerError::VolumeNotLoaded)
    }

    fn render(session: &Session, config: &ViewerConfig) -> Result<Frame, ViewerError> {
        let [sagittal, coronal, axial] =
            Orientation::ALL.map(|orientation| Self::render_plane(session, config, orientation));
        Ok(Frame::new([sagittal?, coronal?, axial?]))
    }

    fn render_plane(
        session: &Session,
        config: &ViewerConfig,
        orientation: Orientation,
    ) -> Result<PlaneView, ViewerError> {
        let state = &session.state;
        let index = state.index_for(orientation);
        let image = session
            .volume
            .get_image_from_axis(index, orientation, &state.window())?
            .ok_or(ViewerError::Render(orientation))?;

        let probe = session.probe.filter(|probe| probe.orientation == orientation);
        let mut label = format!("{orientation} Slice {}", index + 1);
        if let Some(probe) = probe {
            label.push_str(&format!(" - Density: {} {}", probe.density, config.unit));
        }

        Ok(PlaneView {
            orientation,
            index,
            image,
            label,
            guides: probe.map(|probe| probe.guides),
        })
    }
}
