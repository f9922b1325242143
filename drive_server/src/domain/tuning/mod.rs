// Driving tuning, kept apart from runtime/server configuration.

pub mod map;
pub mod motion;
pub mod vehicle;

pub use map::MapTuning;
pub use motion::MotionTuning;
pub use vehicle::VehicleTuning;
