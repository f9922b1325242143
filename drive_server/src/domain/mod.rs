// Domain layer: vehicle pose, driving controls and dead-reckoning rules.

pub mod controls;
pub mod jump;
pub mod map;
pub mod ports;
pub mod pose;
pub mod readout;
pub mod systems;
pub mod tuning;
pub mod waypoint;

pub use controls::{DriveKey, Overlays};
pub use jump::{JumpError, JumpTarget};
pub use map::MapOptions;
pub use ports::{Clock, Dashboard, MapRenderer};
pub use pose::{Pose, wrap_heading};
pub use readout::Readout;
pub use waypoint::{Waypoint, default_waypoints};
