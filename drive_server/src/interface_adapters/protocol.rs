// Wire protocol DTOs and conversions for the browser page.
// The page hosts the map widget; it sends key presses and receives view events.

use crate::domain::{MapOptions, Overlays, Pose, Readout, Waypoint};
use crate::use_cases::{ViewEvent, ViewState};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected pages over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Create (or recreate) the map widget.
    MapInit(MapOptionsDto),
    // Re-center the camera.
    Center(LatLngDto),
    // Rotate the camera.
    Heading { heading: f64 },
    // Extra chevron rotation compensating for a rounded camera heading.
    Chevron { rotation: Option<f64> },
    Readout(ReadoutDto),
    Overlays(OverlaysDto),
    // Shortcuts for the jump panel.
    Waypoints(Vec<WaypointDto>),
    // Full snapshot sent on connect and after falling behind.
    Sync(ViewStateDto),
    // Request-specific failure, sent only to the requesting socket.
    Error { message: String },
}

impl From<ViewEvent> for ServerMessage {
    fn from(event: ViewEvent) -> Self {
        match event {
            ViewEvent::MapInit(options) => ServerMessage::MapInit(options.into()),
            ViewEvent::Center { lat, lng } => ServerMessage::Center(LatLngDto { lat, lng }),
            ViewEvent::Heading { heading } => ServerMessage::Heading { heading },
            ViewEvent::Chevron { rotation } => ServerMessage::Chevron { rotation },
            ViewEvent::Readout(readout) => ServerMessage::Readout(readout.into()),
            ViewEvent::Overlays(overlays) => ServerMessage::Overlays(overlays.into()),
            ViewEvent::Waypoints(waypoints) => {
                ServerMessage::Waypoints(waypoints.iter().map(WaypointDto::from).collect())
            }
        }
    }
}

/// Messages the page sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // `KeyboardEvent.key` of a keydown.
    Key { key: String },
    // Jump panel "Go" button with the raw input values.
    Jump(JumpPayload),
    // The page finished loading the map script.
    InitMap,
    // Jump panel close button.
    CloseJump,
}

/// Raw jump panel fields; validated by the simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct JumpPayload {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
    #[serde(default)]
    pub heading: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}

/// Options in the shape the map widget's constructor expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptionsDto {
    pub center: LatLngDto,
    pub zoom: u8,
    pub heading: i32,
    pub map_type_id: String,
    #[serde(rename = "disableDefaultUI")]
    pub disable_default_ui: bool,
    pub tilt: u8,
}

impl From<MapOptions> for MapOptionsDto {
    fn from(options: MapOptions) -> Self {
        Self {
            center: LatLngDto {
                lat: options.lat,
                lng: options.lng,
            },
            zoom: options.zoom,
            heading: options.heading,
            map_type_id: options.map_type,
            disable_default_ui: options.disable_default_ui,
            tilt: options.tilt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadoutDto {
    pub speed_kmh: String,
    pub heading: i32,
    pub lat: String,
    pub lng: String,
    // Ready-to-display text for simple pages.
    pub text: String,
}

impl From<Readout> for ReadoutDto {
    fn from(readout: Readout) -> Self {
        Self {
            text: readout.to_string(),
            speed_kmh: readout.speed_kmh,
            heading: readout.heading,
            lat: readout.lat,
            lng: readout.lng,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OverlaysDto {
    pub help: bool,
    pub jump: bool,
}

impl From<Overlays> for OverlaysDto {
    fn from(overlays: Overlays) -> Self {
        Self {
            help: overlays.help,
            jump: overlays.jump,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WaypointDto {
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub heading: i32,
}

impl From<&Waypoint> for WaypointDto {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            title: waypoint.title.clone(),
            lat: waypoint.lat,
            lng: waypoint.lng,
            heading: waypoint.heading,
        }
    }
}

/// Pose as exposed over HTTP and in sync snapshots.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoseDto {
    pub lat: f64,
    pub lng: f64,
    pub heading: i32,
    // Meters per millisecond.
    pub speed: f64,
    pub speed_kmh: f64,
    pub time_ms: u64,
}

impl From<Pose> for PoseDto {
    fn from(pose: Pose) -> Self {
        Self {
            lat: pose.lat,
            lng: pose.lng,
            heading: pose.heading,
            speed: pose.speed,
            speed_kmh: pose.speed * 3600.0,
            time_ms: pose.time_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewStateDto {
    pub pose: PoseDto,
    pub overlays: OverlaysDto,
}

impl From<ViewState> for ViewStateDto {
    fn from(state: ViewState) -> Self {
        Self {
            pose: state.pose.into(),
            overlays: state.overlays.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::MapTuning;
    use serde_json::{Value, json};

    #[test]
    fn map_init_uses_widget_option_names() {
        let pose = Pose::new(52.377335, 4.913855, 275, 0.0005, 0);
        let options = MapOptions::for_pose(&pose, &MapTuning::default());
        let msg = ServerMessage::from(ViewEvent::MapInit(options));

        let value = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(
            value,
            json!({
                "type": "MapInit",
                "data": {
                    "center": { "lat": 52.377335, "lng": 4.913855 },
                    "zoom": 20,
                    "heading": 275,
                    "mapTypeId": "satellite",
                    "disableDefaultUI": true,
                    "tilt": 60
                }
            })
        );
    }

    #[test]
    fn readout_carries_display_text() {
        let readout = Readout::from_pose(&Pose::new(1.0, 2.0, 90, 0.0, 0));
        let value: Value =
            serde_json::to_value(ServerMessage::from(ViewEvent::Readout(readout))).unwrap();

        assert_eq!(value["type"], "Readout");
        assert_eq!(
            value["data"]["text"],
            "Speed: 0.0 km/h | Heading: 90\nLat,Lng: 1.000000, 2.000000"
        );
    }

    #[test]
    fn client_messages_parse_from_tagged_json() {
        let key: ClientMessage =
            serde_json::from_str(r#"{"type":"Key","data":{"key":"w"}}"#).unwrap();
        assert!(matches!(key, ClientMessage::Key { key } if key == "w"));

        let jump: ClientMessage = serde_json::from_str(
            r#"{"type":"Jump","data":{"lat":"52.0","lng":"4.9","heading":"90"}}"#,
        )
        .unwrap();
        assert!(matches!(jump, ClientMessage::Jump(p) if p.heading == "90"));

        let init: ClientMessage = serde_json::from_str(r#"{"type":"InitMap"}"#).unwrap();
        assert!(matches!(init, ClientMessage::InitMap));
    }

    #[test]
    fn unknown_client_messages_are_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"Fly"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }
}
