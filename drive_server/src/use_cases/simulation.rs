// Simulation task: the single owner of the motion controller.

use crate::domain::{Clock, Dashboard, MapRenderer};
use crate::use_cases::controller::MotionController;
use crate::use_cases::timer::TickTimer;
use crate::use_cases::types::{SimCommand, ViewState};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

// Ticks only need a small buffer; the timer drops ticks when it is full.
const TICK_CHANNEL_CAPACITY: usize = 8;

/// Runtime settings for the simulation task.
#[derive(Debug, Clone)]
pub struct SimSettings {
    /// Capacity for inbound commands from sockets and HTTP handlers.
    pub command_channel_capacity: usize,
    /// Fixed cadence of unforced position updates.
    pub tick_interval: Duration,
}

/// Channels for talking to a running simulation.
#[derive(Clone)]
pub struct SimHandle {
    /// Sender for commands into the simulation task.
    pub cmd_tx: mpsc::Sender<SimCommand>,
    /// Watch sender holding the latest view state.
    pub view_state_tx: watch::Sender<ViewState>,
}

/// Spawns the simulation task for `controller`.
pub fn spawn_simulation<C, R, D>(
    controller: MotionController<C, R, D>,
    settings: SimSettings,
) -> SimHandle
where
    C: Clock + 'static,
    R: MapRenderer + 'static,
    D: Dashboard + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<SimCommand>(settings.command_channel_capacity);
    let (view_state_tx, _view_state_rx) = watch::channel(controller.view_state());

    tokio::spawn(sim_task(
        controller,
        cmd_rx,
        settings.tick_interval,
        view_state_tx.clone(),
    ));

    SimHandle {
        cmd_tx,
        view_state_tx,
    }
}

/// Initializes the map, then applies ticks and commands one at a time until every
/// command sender is gone.
pub async fn sim_task<C, R, D>(
    mut controller: MotionController<C, R, D>,
    mut cmd_rx: mpsc::Receiver<SimCommand>,
    tick_interval: Duration,
    view_state_tx: watch::Sender<ViewState>,
) where
    C: Clock,
    R: MapRenderer,
    D: Dashboard,
{
    let (tick_tx, mut tick_rx) = mpsc::channel::<()>(TICK_CHANNEL_CAPACITY);
    let mut timer = TickTimer::new(tick_interval);

    controller.init_map();
    timer.restart(tick_tx.clone());
    view_state_tx.send_replace(controller.view_state());
    info!(
        tick_ms = timer.period().as_millis() as u64,
        "simulation started"
    );

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                apply_command(&mut controller, &mut timer, &tick_tx, cmd);
            }
            Some(()) = tick_rx.recv() => {
                controller.advance(false);
            }
        }

        view_state_tx.send_replace(controller.view_state());
    }

    timer.stop();
    info!("simulation stopped");
}

fn apply_command<C, R, D>(
    controller: &mut MotionController<C, R, D>,
    timer: &mut TickTimer,
    tick_tx: &mpsc::Sender<()>,
    cmd: SimCommand,
) where
    C: Clock,
    R: MapRenderer,
    D: Dashboard,
{
    match cmd {
        SimCommand::Key { key, reply } => {
            let handled = controller.handle_key(&key);
            if !handled {
                debug!(key = %key, "unmapped key ignored");
            }
            if let Some(reply) = reply {
                let _ = reply.send(handled.then(|| controller.pose()));
            }
        }
        SimCommand::Jump {
            lat,
            lng,
            heading,
            reply,
        } => {
            let result = controller.jump_to(&lat, &lng, &heading);
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        }
        SimCommand::InitMap => {
            // Re-initialization replaces the tick stream instead of adding one.
            controller.init_map();
            timer.restart(tick_tx.clone());
        }
        SimCommand::CloseJump => controller.close_jump(),
    }
}
