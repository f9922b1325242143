/// Thresholds and constants for the dead-reckoning step.

/// Mean equatorial circumference used to turn meters into degrees.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_017.0;

#[derive(Debug, Clone, Copy)]
pub struct MotionTuning {
    /// Unforced steps closer together than this are coalesced.
    pub min_step_ms: u64,

    /// Unforced steps covering less distance (meters) only reset the clock.
    pub min_distance_m: f64,

    /// Planet circumference in meters.
    pub earth_circumference_m: f64,
}

impl MotionTuning {
    /// Degrees per meter under the flat-earth approximation.
    pub fn earth_factor(&self) -> f64 {
        360.0 / self.earth_circumference_m
    }
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            min_step_ms: 10,
            min_distance_m: 0.1,
            earth_circumference_m: EARTH_CIRCUMFERENCE_M,
        }
    }
}
