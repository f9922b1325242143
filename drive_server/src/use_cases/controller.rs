// Motion controller: owns the pose and pushes every change to the map and dashboard.

use crate::domain::systems::motion::{StepOutcome, step_pose};
use crate::domain::tuning::{MapTuning, MotionTuning, VehicleTuning};
use crate::domain::{
    Clock, Dashboard, DriveKey, JumpError, JumpTarget, MapOptions, MapRenderer, Overlays, Pose,
    Readout, Waypoint, default_waypoints,
};
use crate::use_cases::types::ViewState;
use tracing::{debug, info, warn};

/// Tuning and seed data for a controller.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub vehicle: VehicleTuning,
    pub motion: MotionTuning,
    pub map: MapTuning,
    /// Jump shortcuts; the vehicle starts at the first one.
    pub waypoints: Vec<Waypoint>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            motion: MotionTuning::default(),
            map: MapTuning::default(),
            waypoints: default_waypoints(),
        }
    }
}

pub struct MotionController<C, R, D> {
    clock: C,
    renderer: R,
    dashboard: D,
    pose: Pose,
    // Heading last pushed to the renderer; `None` forces the next sync.
    last_applied_heading: Option<i32>,
    overlays: Overlays,
    settings: ControllerSettings,
}

impl<C, R, D> MotionController<C, R, D>
where
    C: Clock,
    R: MapRenderer,
    D: Dashboard,
{
    pub fn new(clock: C, renderer: R, dashboard: D, mut settings: ControllerSettings) -> Self {
        if settings.waypoints.is_empty() {
            settings.waypoints = default_waypoints();
        }
        let seed = settings
            .waypoints
            .first()
            .map(Waypoint::target)
            .unwrap_or(JumpTarget {
                lat: 0.0,
                lng: 0.0,
                heading: 0,
            });
        let pose = Pose::new(
            seed.lat,
            seed.lng,
            seed.heading,
            settings.vehicle.initial_speed,
            clock.now_ms(),
        );

        Self {
            clock,
            renderer,
            dashboard,
            pose,
            last_applied_heading: None,
            overlays: Overlays::default(),
            settings,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            pose: self.pose,
            overlays: self.overlays,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.settings.waypoints
    }

    /// (Re)creates the map around the current pose and repaints the dashboard.
    pub fn init_map(&mut self) {
        let options = MapOptions::for_pose(&self.pose, &self.settings.map);
        self.renderer.init(&options);
        self.last_applied_heading = None;

        self.dashboard.show_waypoints(&self.settings.waypoints);
        self.dashboard.set_overlays(self.overlays);
        self.refresh_readout();
        info!(
            lat = self.pose.lat,
            lng = self.pose.lng,
            heading = self.pose.heading,
            "map initialized"
        );
    }

    /// Dead-reckons the pose up to now. `forced` skips the time and distance guards.
    pub fn advance(&mut self, forced: bool) -> StepOutcome {
        let now_ms = self.clock.now_ms();
        let outcome = step_pose(&mut self.pose, now_ms, forced, &self.settings.motion);
        if outcome != StepOutcome::Moved {
            return outcome;
        }

        self.renderer.set_center(self.pose.lat, self.pose.lng);
        self.sync_heading();
        self.refresh_readout();
        outcome
    }

    /// Pushes a changed heading to the renderer and rotates the chevron by whatever
    /// the renderer failed to apply.
    pub fn sync_heading(&mut self) {
        let heading = self.pose.heading;
        if self.last_applied_heading == Some(heading) {
            return;
        }

        let requested = f64::from(heading);
        self.renderer.set_heading(requested);
        let applied = self.renderer.heading().unwrap_or(0.0);
        if applied != requested {
            debug!(requested, applied, "renderer adjusted heading");
            self.dashboard.set_chevron_rotation(Some(requested - applied));
        } else {
            self.dashboard.set_chevron_rotation(None);
        }

        // Record even on mismatch so the correction is not re-sent every step.
        self.last_applied_heading = Some(heading);
    }

    /// Applies a key press. Returns false for keys without a binding.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(drive_key) = DriveKey::parse(key) else {
            return false;
        };

        let overlays_before = self.overlays;
        drive_key.apply(&mut self.pose, &mut self.overlays, &self.settings.vehicle);
        if self.overlays != overlays_before {
            self.dashboard.set_overlays(self.overlays);
        }
        debug!(
            ?drive_key,
            heading = self.pose.heading,
            speed = self.pose.speed,
            "key applied"
        );

        self.advance(true);
        true
    }

    /// Parses jump panel input and moves there. Invalid input leaves the pose untouched.
    pub fn jump_to(&mut self, lat: &str, lng: &str, heading: &str) -> Result<Pose, JumpError> {
        let target = JumpTarget::parse(lat, lng, heading).inspect_err(|error| {
            warn!(%error, "jump rejected");
        })?;
        self.jump(target)
    }

    /// Teleports to the target and stops the vehicle. Non-finite coordinates are
    /// rejected and leave the pose untouched.
    pub fn jump(&mut self, target: JumpTarget) -> Result<Pose, JumpError> {
        let target = target.checked().inspect_err(|error| {
            warn!(%error, "jump rejected");
        })?;

        self.pose.lat = target.lat;
        self.pose.lng = target.lng;
        self.pose.heading = target.heading;
        self.pose.speed = 0.0;
        self.pose.time_ms = self.pose.time_ms.max(self.clock.now_ms());
        info!(
            lat = target.lat,
            lng = target.lng,
            heading = target.heading,
            "jumped"
        );

        self.advance(true);
        Ok(self.pose)
    }

    pub fn close_jump(&mut self) {
        if self.overlays.jump {
            self.overlays.jump = false;
            self.dashboard.set_overlays(self.overlays);
        }
    }

    fn refresh_readout(&mut self) {
        self.dashboard.show_readout(&Readout::from_pose(&self.pose));
    }
}
