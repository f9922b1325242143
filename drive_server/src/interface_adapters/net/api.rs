use crate::interface_adapters::http::{json_error, simulation_unavailable};
use crate::interface_adapters::protocol::{PoseDto, WaypointDto};
use crate::interface_adapters::state::AppState;
use crate::use_cases::SimCommand;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug, serde::Deserialize)]
pub struct KeyRequest {
    // `KeyboardEvent.key` value, e.g. "w" or " ".
    key: String,
}

#[derive(Debug, serde::Serialize)]
struct KeyResponse {
    // Whether the key maps to a control.
    handled: bool,
    pose: PoseDto,
}

#[derive(Debug, serde::Deserialize)]
pub struct JumpRequest {
    // Raw field values; the simulation validates them.
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lng: String,
    #[serde(default)]
    heading: String,
}

pub async fn get_pose(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pose = state.view_state_tx.borrow().pose;
    Json(PoseDto::from(pose))
}

pub async fn get_waypoints(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let waypoints: Vec<WaypointDto> = state.waypoints.iter().map(WaypointDto::from).collect();
    Json(waypoints)
}

pub async fn post_key(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<KeyRequest>,
) -> Response {
    let (reply_tx, reply_rx) = oneshot::channel();
    let cmd = SimCommand::Key {
        key: payload.key,
        reply: Some(reply_tx),
    };
    if state.cmd_tx.send(cmd).await.is_err() {
        warn!("key rejected; simulation is gone");
        return simulation_unavailable();
    }

    match reply_rx.await {
        Ok(Some(pose)) => Json(KeyResponse {
            handled: true,
            pose: pose.into(),
        })
        .into_response(),
        Ok(None) => {
            // Unmapped keys leave the pose untouched.
            let pose = state.view_state_tx.borrow().pose;
            Json(KeyResponse {
                handled: false,
                pose: pose.into(),
            })
            .into_response()
        }
        Err(_) => simulation_unavailable(),
    }
}

pub async fn post_jump(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JumpRequest>,
) -> Response {
    let (reply_tx, reply_rx) = oneshot::channel();
    let cmd = SimCommand::Jump {
        lat: payload.lat,
        lng: payload.lng,
        heading: payload.heading,
        reply: Some(reply_tx),
    };
    if state.cmd_tx.send(cmd).await.is_err() {
        warn!("jump rejected; simulation is gone");
        return simulation_unavailable();
    }

    match reply_rx.await {
        Ok(Ok(pose)) => Json(PoseDto::from(pose)).into_response(),
        Ok(Err(e)) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        Err(_) => simulation_unavailable(),
    }
}

pub async fn post_init_map(State(state): State<Arc<AppState>>) -> Response {
    if state.cmd_tx.send(SimCommand::InitMap).await.is_err() {
        warn!("map init rejected; simulation is gone");
        return simulation_unavailable();
    }
    debug!("map re-initialization queued");
    StatusCode::ACCEPTED.into_response()
}
