// Simulated vehicle pose mutated by ticks and key presses.

/// Position, heading and speed of the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub lat: f64,
    pub lng: f64,
    pub heading: i32, // compass degrees, 0..=359
    pub speed: f64,   // meters per millisecond (km/s), negative is reverse
    pub time_ms: u64, // clock reading of the last applied update
}

impl Pose {
    pub fn new(lat: f64, lng: f64, heading: i32, speed: f64, time_ms: u64) -> Self {
        Self {
            lat,
            lng,
            heading: wrap_heading(heading),
            speed,
            time_ms,
        }
    }

    /// Rotates the heading by `delta` degrees, staying on the compass circle.
    pub fn turn(&mut self, delta: i32) {
        self.heading = wrap_heading(self.heading + delta);
    }
}

/// Wraps any integer angle into `0..360`.
pub fn wrap_heading(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}
