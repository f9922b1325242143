/// How key presses change the vehicle's speed and heading.
///
/// Speeds are meters per millisecond; multiply by 3600 for km/h.

#[derive(Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Speed the vehicle starts with.
    pub initial_speed: f64,

    /// Speed added by W and removed by S.
    pub speed_step: f64,

    /// Halving (Space) below this magnitude stops the vehicle.
    pub stop_threshold: f64,

    /// Doubling (N) never leaves the vehicle slower than this.
    pub min_boost_speed: f64,

    /// Degrees turned by A and D.
    pub fine_turn: i32,

    /// Degrees turned by Q and E.
    pub coarse_turn: i32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            initial_speed: 0.0005,
            speed_step: 0.0005,
            stop_threshold: 0.0001,
            min_boost_speed: 0.0025,
            fine_turn: 1,
            coarse_turn: 5,
        }
    }
}
