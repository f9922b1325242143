// Named seed locations offered as jump shortcuts.

use crate::domain::jump::JumpTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub heading: i32,
}

impl Waypoint {
    pub fn new(title: impl Into<String>, lat: f64, lng: f64, heading: i32) -> Self {
        Self {
            title: title.into(),
            lat,
            lng,
            heading,
        }
    }

    pub fn target(&self) -> JumpTarget {
        JumpTarget {
            lat: self.lat,
            lng: self.lng,
            heading: crate::domain::pose::wrap_heading(self.heading),
        }
    }
}

/// Built-in shortcuts; the first one is where the vehicle starts.
pub fn default_waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new("Bimhuis", 52.377335, 4.913855, 275),
        Waypoint::new("London", 51.500909, -0.124400, 273),
    ]
}
