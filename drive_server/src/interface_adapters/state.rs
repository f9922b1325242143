use crate::domain::Waypoint;
use crate::use_cases::{SimCommand, ViewState};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Commands flowing from sockets and HTTP into the simulation task.
    pub cmd_tx: mpsc::Sender<SimCommand>,
    // Serialized view events, shared across all connections.
    pub view_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest pose and panel state for new connections and lag recovery.
    pub view_state_tx: watch::Sender<ViewState>,
    // Jump shortcuts offered to every page.
    pub waypoints: Arc<[Waypoint]>,
}
