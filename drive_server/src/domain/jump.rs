// Validated "jump to location" requests typed into the jump panel.

use crate::domain::pose::wrap_heading;
use std::fmt;

/// Where a jump lands the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpTarget {
    pub lat: f64,
    pub lng: f64,
    pub heading: i32,
}

/// Jump input that could not be turned into a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpError {
    InvalidLatitude(String),
    InvalidLongitude(String),
    InvalidHeading(String),
}

impl fmt::Display for JumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpError::InvalidLatitude(raw) => write!(f, "invalid latitude: {raw:?}"),
            JumpError::InvalidLongitude(raw) => write!(f, "invalid longitude: {raw:?}"),
            JumpError::InvalidHeading(raw) => write!(f, "invalid heading: {raw:?}"),
        }
    }
}

impl std::error::Error for JumpError {}

impl JumpTarget {
    /// Parses free-form panel text. Empty, non-numeric and non-finite values are rejected;
    /// the heading is rounded to whole degrees and wrapped onto the compass.
    pub fn parse(lat: &str, lng: &str, heading: &str) -> Result<Self, JumpError> {
        let lat = parse_finite(lat).ok_or_else(|| JumpError::InvalidLatitude(lat.to_string()))?;
        let lng = parse_finite(lng).ok_or_else(|| JumpError::InvalidLongitude(lng.to_string()))?;
        let degrees =
            parse_finite(heading).ok_or_else(|| JumpError::InvalidHeading(heading.to_string()))?;

        // rem_euclid first so the cast never saturates.
        let heading = wrap_heading(degrees.rem_euclid(360.0).round() as i32);
        Ok(Self { lat, lng, heading })
    }

    /// Checks a target built from raw fields: coordinates must be finite and the
    /// heading is wrapped onto the compass.
    pub fn checked(self) -> Result<Self, JumpError> {
        if !self.lat.is_finite() {
            return Err(JumpError::InvalidLatitude(self.lat.to_string()));
        }
        if !self.lng.is_finite() {
            return Err(JumpError::InvalidLongitude(self.lng.to_string()));
        }
        Ok(Self {
            heading: wrap_heading(self.heading),
            ..self
        })
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
