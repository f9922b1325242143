// Loads jump shortcuts from a TOML file.
//
// ```toml
// [[waypoint]]
// title = "Bimhuis"
// lat = 52.377335
// lng = 4.913855
// heading = 275
// ```

use crate::domain::Waypoint;
use serde::Deserialize;
use std::{fmt, fs, path::Path};

#[derive(Debug)]
pub enum WaypointLoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Empty,
    InvalidCoordinates(String),
}

impl fmt::Display for WaypointLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointLoadError::Io(e) => write!(f, "failed to read waypoints file: {e}"),
            WaypointLoadError::Parse(e) => write!(f, "failed to parse waypoints file: {e}"),
            WaypointLoadError::Empty => write!(f, "waypoints file lists no waypoints"),
            WaypointLoadError::InvalidCoordinates(title) => {
                write!(f, "waypoint {title:?} has non-finite coordinates")
            }
        }
    }
}

impl std::error::Error for WaypointLoadError {}

#[derive(Debug, Deserialize)]
struct WaypointFile {
    #[serde(default, rename = "waypoint")]
    waypoints: Vec<WaypointEntry>,
}

#[derive(Debug, Deserialize)]
struct WaypointEntry {
    title: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    heading: i32,
}

pub fn parse_waypoints(text: &str) -> Result<Vec<Waypoint>, WaypointLoadError> {
    let file: WaypointFile = toml::from_str(text).map_err(WaypointLoadError::Parse)?;
    if file.waypoints.is_empty() {
        return Err(WaypointLoadError::Empty);
    }

    file.waypoints
        .into_iter()
        .map(|entry| {
            if !entry.lat.is_finite() || !entry.lng.is_finite() {
                return Err(WaypointLoadError::InvalidCoordinates(entry.title));
            }
            Ok(Waypoint::new(entry.title, entry.lat, entry.lng, entry.heading))
        })
        .collect()
}

pub fn load_waypoints(path: &Path) -> Result<Vec<Waypoint>, WaypointLoadError> {
    let text = fs::read_to_string(path).map_err(WaypointLoadError::Io)?;
    parse_waypoints(&text)
}
