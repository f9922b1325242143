// Use cases layer: the motion controller and the task that drives it.

pub mod controller;
pub mod simulation;
pub mod timer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{ControllerSettings, MotionController};
pub use simulation::{SimHandle, SimSettings, sim_task, spawn_simulation};
pub use timer::TickTimer;
pub use types::{SimCommand, ViewEvent, ViewState};
