// Construction options for the external mapping widget.

use crate::domain::pose::Pose;
use crate::domain::tuning::MapTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
    pub heading: i32,
    pub map_type: String,
    pub disable_default_ui: bool,
    pub tilt: u8,
}

impl MapOptions {
    /// Centers the camera on the pose and faces it along the heading.
    pub fn for_pose(pose: &Pose, tuning: &MapTuning) -> Self {
        Self {
            lat: pose.lat,
            lng: pose.lng,
            zoom: tuning.zoom,
            heading: pose.heading,
            map_type: tuning.map_type.to_string(),
            disable_default_ui: tuning.disable_default_ui,
            tilt: tuning.tilt,
        }
    }
}
