use std::{env, path::PathBuf, time::Duration};

// Runtime/server constants (not vehicle tuning).

pub fn http_port() -> u16 {
    env::var("DRIVE_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3004)
}

pub fn tick_interval() -> Duration {
    let millis = env::var("TICK_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(200);
    Duration::from_millis(millis)
}

// Degrees the map widget rounds headings to (0 disables rounding).
pub fn map_heading_step() -> f64 {
    env::var("MAP_HEADING_STEP")
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|step| step.is_finite() && *step >= 0.0)
        .unwrap_or(1.0)
}

pub fn waypoints_file() -> Option<PathBuf> {
    env::var_os("WAYPOINTS_FILE")
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

pub const COMMAND_CHANNEL_CAPACITY: usize = 1024;
pub const VIEW_BROADCAST_CAPACITY: usize = 128;

/// Everything the server needs to assemble its state.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub tick_interval: Duration,
    pub map_heading_step: f64,
    pub waypoints_file: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            map_heading_step: 1.0,
            waypoints_file: None,
        }
    }
}

pub fn load_settings() -> ServerSettings {
    ServerSettings {
        tick_interval: tick_interval(),
        map_heading_step: map_heading_step(),
        waypoints_file: waypoints_file(),
    }
}
