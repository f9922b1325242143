use crate::domain::pose::Pose;
use crate::domain::tuning::MotionTuning;

/// What a dead-reckoning step did to the pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Too soon after the previous step; nothing changed.
    Coalesced,
    /// Movement too small to show; only the clock moved.
    Settled,
    /// Position and clock were updated.
    Moved,
}

/// Advances the pose to `now_ms` along its heading.
///
/// Uses a flat-earth conversion from meters to degrees for both axes, so it is only
/// accurate for short hops away from the poles and does not wrap longitude at ±180.
pub fn step_pose(pose: &mut Pose, now_ms: u64, forced: bool, tuning: &MotionTuning) -> StepOutcome {
    let elapsed_ms = now_ms.saturating_sub(pose.time_ms);
    if elapsed_ms < tuning.min_step_ms && !forced {
        return StepOutcome::Coalesced;
    }

    let distance_m = pose.speed * elapsed_ms as f64;
    if distance_m.abs() < tuning.min_distance_m && !forced {
        pose.time_ms = pose.time_ms.max(now_ms);
        return StepOutcome::Settled;
    }

    // 0 degrees is north: latitude follows cos, longitude follows sin.
    let heading_rad = f64::from(pose.heading).to_radians();
    let earth_factor = tuning.earth_factor();
    pose.lat += distance_m * heading_rad.cos() * earth_factor;
    pose.lng += distance_m * heading_rad.sin() * earth_factor;
    pose.time_ms = pose.time_ms.max(now_ms);

    StepOutcome::Moved
}
