// Network adapter modules split by page sockets vs the JSON HTTP API.

pub mod api;
pub mod client;

pub use api::{get_pose, get_waypoints, post_init_map, post_jump, post_key};
pub use client::{spawn_view_serializer, view_event_serializer, ws_handler};
