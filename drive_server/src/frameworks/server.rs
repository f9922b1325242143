// Framework bootstrap for the drive server runtime.

use crate::domain::default_waypoints;
use crate::frameworks::clock::SystemClock;
use crate::frameworks::config::{self, ServerSettings};
use crate::frameworks::waypoints::load_waypoints;
use crate::interface_adapters::net::spawn_view_serializer;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::surface::{BroadcastDashboard, BroadcastMap};
use crate::use_cases::{
    ControllerSettings, MotionController, SimSettings, ViewEvent, spawn_simulation,
};

use axum::extract::ws::Utf8Bytes;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::broadcast;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with_settings(listener, config::load_settings()).await
}

pub async fn run_with_settings(
    listener: tokio::net::TcpListener,
    settings: ServerSettings,
) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state(settings)?;
    // Start the Web Server
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

pub fn build_state(settings: ServerSettings) -> Result<Arc<AppState>> {
    let waypoints = match &settings.waypoints_file {
        Some(path) => load_waypoints(path)
            .inspect_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to load waypoints");
            })
            .map_err(std::io::Error::other)?,
        None => default_waypoints(),
    };
    tracing::debug!(
        waypoints = waypoints.len(),
        tick_ms = settings.tick_interval.as_millis() as u64,
        map_heading_step = settings.map_heading_step,
        "drive settings loaded"
    );

    // view_tx: Map and dashboard events from the simulation.
    let (view_tx, _view_rx) = broadcast::channel::<ViewEvent>(config::VIEW_BROADCAST_CAPACITY);
    // view_bytes_tx: Serialized view events shared across all pages.
    let (view_bytes_tx, _view_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::VIEW_BROADCAST_CAPACITY);

    // The serializer must subscribe before the simulation emits its first map init.
    spawn_view_serializer(&view_tx, view_bytes_tx.clone());

    let controller = MotionController::new(
        SystemClock::new(),
        BroadcastMap::new(view_tx.clone(), settings.map_heading_step),
        BroadcastDashboard::new(view_tx),
        ControllerSettings {
            waypoints: waypoints.clone(),
            ..ControllerSettings::default()
        },
    );

    // Spawn the simulation task. It owns the pose from here on.
    let sim = spawn_simulation(
        controller,
        SimSettings {
            command_channel_capacity: config::COMMAND_CHANNEL_CAPACITY,
            tick_interval: settings.tick_interval,
        },
    );

    Ok(Arc::new(AppState {
        cmd_tx: sim.cmd_tx,
        view_bytes_tx,
        view_state_tx: sim.view_state_tx,
        waypoints: waypoints.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[tokio::test]
    async fn build_state_seeds_pose_from_default_waypoints() {
        let state = build_state(ServerSettings::default()).expect("state");

        let pose = state.view_state_tx.borrow().pose;
        assert_eq!((pose.lat, pose.lng, pose.heading), (52.377335, 4.913855, 275));
        assert_eq!(state.waypoints.len(), 2);
    }

    #[tokio::test]
    async fn build_state_fails_when_waypoints_file_is_missing() {
        let settings = ServerSettings {
            tick_interval: Duration::from_millis(200),
            map_heading_step: 1.0,
            waypoints_file: Some(PathBuf::from("/definitely/not/here/waypoints.toml")),
        };

        assert!(build_state(settings).is_err());
    }
}
