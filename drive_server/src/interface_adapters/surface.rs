// Map and dashboard adapters that publish view events to every connected page.

use crate::domain::{Dashboard, MapOptions, MapRenderer, Overlays, Readout, Waypoint};
use crate::use_cases::ViewEvent;
use tokio::sync::broadcast;

/// Stand-in for the browser's map widget.
///
/// Tilted satellite imagery only renders at certain headings, so the widget rounds
/// requests to `heading_step` degrees. The same rounding is modelled here so the
/// controller can compensate with the chevron. A step of 0 applies headings as-is.
pub struct BroadcastMap {
    view_tx: broadcast::Sender<ViewEvent>,
    heading_step: f64,
    applied_heading: Option<f64>,
}

impl BroadcastMap {
    pub fn new(view_tx: broadcast::Sender<ViewEvent>, heading_step: f64) -> Self {
        Self {
            view_tx,
            heading_step,
            applied_heading: None,
        }
    }

    fn quantize(&self, heading: f64) -> f64 {
        if self.heading_step > 0.0 {
            ((heading / self.heading_step).round() * self.heading_step).rem_euclid(360.0)
        } else {
            heading
        }
    }

    fn publish(&self, event: ViewEvent) {
        // No subscribers just means no page is open yet.
        let _ = self.view_tx.send(event);
    }
}

impl MapRenderer for BroadcastMap {
    fn init(&mut self, options: &MapOptions) {
        self.applied_heading = Some(self.quantize(f64::from(options.heading)));
        self.publish(ViewEvent::MapInit(options.clone()));
    }

    fn set_center(&mut self, lat: f64, lng: f64) {
        self.publish(ViewEvent::Center { lat, lng });
    }

    fn set_heading(&mut self, heading: f64) {
        self.applied_heading = Some(self.quantize(heading));
        self.publish(ViewEvent::Heading { heading });
    }

    fn heading(&self) -> Option<f64> {
        self.applied_heading
    }
}

/// Readout, chevron and panel updates for the page around the map.
pub struct BroadcastDashboard {
    view_tx: broadcast::Sender<ViewEvent>,
}

impl BroadcastDashboard {
    pub fn new(view_tx: broadcast::Sender<ViewEvent>) -> Self {
        Self { view_tx }
    }
}

impl Dashboard for BroadcastDashboard {
    fn show_readout(&mut self, readout: &Readout) {
        let _ = self.view_tx.send(ViewEvent::Readout(readout.clone()));
    }

    fn set_chevron_rotation(&mut self, degrees: Option<f64>) {
        let _ = self.view_tx.send(ViewEvent::Chevron { rotation: degrees });
    }

    fn set_overlays(&mut self, overlays: Overlays) {
        let _ = self.view_tx.send(ViewEvent::Overlays(overlays));
    }

    fn show_waypoints(&mut self, waypoints: &[Waypoint]) {
        let _ = self.view_tx.send(ViewEvent::Waypoints(waypoints.to_vec()));
    }
}
