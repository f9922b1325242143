// Keyboard controls: which key does what to the pose and the overlays.

use crate::domain::pose::Pose;
use crate::domain::tuning::VehicleTuning;

/// Visibility of the help and jump panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    pub help: bool,
    pub jump: bool,
}

/// Every key the simulator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKey {
    TurnLeft,
    TurnRight,
    SharpLeft,
    SharpRight,
    Accelerate,
    Decelerate,
    Halve,
    Boost,
    Refresh,
    ShowHelp,
    ShowJump,
    HideOverlays,
}

impl DriveKey {
    /// Maps a browser `KeyboardEvent.key` value, ignoring letter case.
    pub fn parse(key: &str) -> Option<Self> {
        if key == " " {
            return Some(Self::Halve);
        }
        if key.eq_ignore_ascii_case("space") {
            return Some(Self::Halve);
        }
        if key.eq_ignore_ascii_case("escape") {
            return Some(Self::HideOverlays);
        }

        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'a' => Some(Self::TurnLeft),
            'd' => Some(Self::TurnRight),
            'q' => Some(Self::SharpLeft),
            'e' => Some(Self::SharpRight),
            'w' => Some(Self::Accelerate),
            's' => Some(Self::Decelerate),
            'n' => Some(Self::Boost),
            'r' => Some(Self::Refresh),
            '?' => Some(Self::ShowHelp),
            'j' => Some(Self::ShowJump),
            _ => None,
        }
    }

    /// Applies the key to the pose or the overlays.
    pub fn apply(self, pose: &mut Pose, overlays: &mut Overlays, tuning: &VehicleTuning) {
        match self {
            Self::TurnLeft => pose.turn(-tuning.fine_turn),
            Self::TurnRight => pose.turn(tuning.fine_turn),
            Self::SharpLeft => pose.turn(360 - tuning.coarse_turn),
            Self::SharpRight => pose.turn(tuning.coarse_turn),
            Self::Accelerate => pose.speed += tuning.speed_step,
            Self::Decelerate => pose.speed -= tuning.speed_step,
            Self::Halve => {
                pose.speed /= 2.0;
                if pose.speed.abs() < tuning.stop_threshold {
                    pose.speed = 0.0;
                }
            }
            Self::Boost => {
                pose.speed *= 2.0;
                if pose.speed.abs() < tuning.min_boost_speed {
                    pose.speed = if pose.speed < 0.0 {
                        -tuning.min_boost_speed
                    } else {
                        tuning.min_boost_speed
                    };
                }
            }
            Self::Refresh => {}
            Self::ShowHelp => overlays.help = true,
            Self::ShowJump => overlays.jump = true,
            Self::HideOverlays => *overlays = Overlays::default(),
        }
    }
}
