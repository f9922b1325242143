use crate::interface_adapters::net::{
    get_pose, get_waypoints, post_init_map, post_jump, post_key, ws_handler,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/pose", get(get_pose))
        .route("/waypoints", get(get_waypoints))
        .route("/keys", post(post_key))
        .route("/jump", post(post_jump))
        .route("/map/init", post(post_init_map))
        .with_state(state)
}
