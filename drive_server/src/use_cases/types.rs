// Use-case level inputs/outputs for the simulation task.

use crate::domain::{JumpError, MapOptions, Overlays, Pose, Readout, Waypoint};
use tokio::sync::oneshot;

/// Requests handled by the simulation task, one at a time.
#[derive(Debug)]
pub enum SimCommand {
    /// A key press; the reply carries the pose after it, or `None` for unmapped keys.
    Key {
        key: String,
        reply: Option<oneshot::Sender<Option<Pose>>>,
    },
    /// Raw jump panel input.
    Jump {
        lat: String,
        lng: String,
        heading: String,
        reply: Option<oneshot::Sender<Result<Pose, JumpError>>>,
    },
    /// The page (re)created its map; restarts the tick timer.
    InitMap,
    /// The jump panel's close button.
    CloseJump,
}

/// Output pushed to the map widget and the dashboard around it.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    MapInit(MapOptions),
    Center { lat: f64, lng: f64 },
    Heading { heading: f64 },
    Chevron { rotation: Option<f64> },
    Readout(Readout),
    Overlays(Overlays),
    Waypoints(Vec<Waypoint>),
}

/// Latest pose and panel state, for late joiners and lag recovery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub pose: Pose,
    pub overlays: Overlays,
}
