// Ports the motion controller talks through; adapters live outside the domain.

use crate::domain::controls::Overlays;
use crate::domain::map::MapOptions;
use crate::domain::readout::Readout;
use crate::domain::waypoint::Waypoint;

/// Port for reading the current time in milliseconds. Readings must not go backwards.
pub trait Clock: Send {
    fn now_ms(&self) -> u64;
}

/// Port for the external mapping widget that draws the satellite view.
pub trait MapRenderer: Send {
    /// (Re)creates the widget with the given camera.
    fn init(&mut self, options: &MapOptions);
    fn set_center(&mut self, lat: f64, lng: f64);
    fn set_heading(&mut self, heading: f64);
    /// Heading the widget actually applied; widgets may round or clamp requests.
    fn heading(&self) -> Option<f64>;
}

/// Port for everything drawn around the map: readout, chevron and panels.
pub trait Dashboard: Send {
    fn show_readout(&mut self, readout: &Readout);
    /// Extra chevron rotation in degrees, `None` to clear it.
    fn set_chevron_rotation(&mut self, degrees: Option<f64>);
    fn set_overlays(&mut self, overlays: Overlays);
    fn show_waypoints(&mut self, waypoints: &[Waypoint]);
}
