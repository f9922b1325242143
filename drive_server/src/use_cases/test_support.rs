use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{Clock, Dashboard, MapOptions, MapRenderer, Overlays, Readout, Waypoint};

pub(crate) const START_MS: u64 = 1_700_000_000_000;

// Hand-cranked clock shared between a test and the controller it owns.
#[derive(Clone)]
pub(crate) struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub(crate) fn new(now_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now_ms)))
    }

    pub(crate) fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

// Follows tokio's (possibly paused) clock so timer tests see virtual time.
pub(crate) struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        START_MS + self.origin.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MapCall {
    Init(MapOptions),
    Center(f64, f64),
    Heading(f64),
}

// Map widget fake that snaps headings to `heading_step` like tilted imagery does.
#[derive(Clone)]
pub(crate) struct RecordingMap {
    calls: Arc<Mutex<Vec<MapCall>>>,
    applied: Arc<Mutex<Option<f64>>>,
    heading_step: f64,
}

impl RecordingMap {
    pub(crate) fn new() -> Self {
        Self::with_heading_step(0.0)
    }

    pub(crate) fn with_heading_step(heading_step: f64) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            applied: Arc::new(Mutex::new(None)),
            heading_step,
        }
    }

    pub(crate) fn calls(&self) -> Vec<MapCall> {
        self.calls.lock().expect("map calls mutex poisoned").clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().expect("map calls mutex poisoned").clear();
    }

    pub(crate) fn center_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MapCall::Center(..)))
            .count()
    }

    pub(crate) fn heading_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MapCall::Heading(_)))
            .count()
    }

    fn record(&self, call: MapCall) {
        self.calls.lock().expect("map calls mutex poisoned").push(call);
    }
}

impl MapRenderer for RecordingMap {
    fn init(&mut self, options: &MapOptions) {
        self.record(MapCall::Init(options.clone()));
    }

    fn set_center(&mut self, lat: f64, lng: f64) {
        self.record(MapCall::Center(lat, lng));
    }

    fn set_heading(&mut self, heading: f64) {
        self.record(MapCall::Heading(heading));
        let applied = if self.heading_step > 0.0 {
            (heading / self.heading_step).round() * self.heading_step
        } else {
            heading
        };
        *self.applied.lock().expect("applied mutex poisoned") = Some(applied);
    }

    fn heading(&self) -> Option<f64> {
        *self.applied.lock().expect("applied mutex poisoned")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DashCall {
    Readout(Readout),
    Chevron(Option<f64>),
    Overlays(Overlays),
    Waypoints(Vec<Waypoint>),
}

#[derive(Clone)]
pub(crate) struct RecordingDashboard {
    calls: Arc<Mutex<Vec<DashCall>>>,
}

impl RecordingDashboard {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn calls(&self) -> Vec<DashCall> {
        self.calls.lock().expect("dashboard mutex poisoned").clone()
    }

    pub(crate) fn last_readout(&self) -> Option<Readout> {
        self.calls().into_iter().rev().find_map(|call| match call {
            DashCall::Readout(readout) => Some(readout),
            _ => None,
        })
    }

    pub(crate) fn last_chevron(&self) -> Option<Option<f64>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            DashCall::Chevron(rotation) => Some(rotation),
            _ => None,
        })
    }

    fn record(&self, call: DashCall) {
        self.calls.lock().expect("dashboard mutex poisoned").push(call);
    }
}

impl Dashboard for RecordingDashboard {
    fn show_readout(&mut self, readout: &Readout) {
        self.record(DashCall::Readout(readout.clone()));
    }

    fn set_chevron_rotation(&mut self, degrees: Option<f64>) {
        self.record(DashCall::Chevron(degrees));
    }

    fn set_overlays(&mut self, overlays: Overlays) {
        self.record(DashCall::Overlays(overlays));
    }

    fn show_waypoints(&mut self, waypoints: &[Waypoint]) {
        self.record(DashCall::Waypoints(waypoints.to_vec()));
    }
}
