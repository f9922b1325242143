// Frameworks layer: runtime bootstrap, configuration and system adapters.

pub mod clock;
pub mod config;
pub mod server;
pub mod waypoints;
