// Text readout shown under the map.

use crate::domain::pose::Pose;
use std::fmt;

/// Preformatted readout fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub speed_kmh: String,
    pub heading: i32,
    pub lat: String,
    pub lng: String,
}

impl Readout {
    pub fn from_pose(pose: &Pose) -> Self {
        let kmh = pose.speed * 3600.0;
        // Whole km/h once the number is big enough to read at a glance.
        let speed_kmh = if kmh.abs() > 10.0 {
            format!("{kmh:.0}")
        } else {
            format!("{kmh:.1}")
        };

        Self {
            speed_kmh: strip_negative_zero(speed_kmh),
            heading: pose.heading,
            lat: format!("{:.6}", pose.lat),
            lng: format!("{:.6}", pose.lng),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Speed: {} km/h | Heading: {}\nLat,Lng: {}, {}",
            self.speed_kmh, self.heading, self.lat, self.lng
        )
    }
}

// Covers -0.0 as well as tiny reverse speeds that round to zero.
fn strip_negative_zero(text: String) -> String {
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
