use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, ViewStateDto, WaypointDto};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_conn_id;
use crate::use_cases::{SimCommand, ViewEvent, ViewState};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::timeout;
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    CommandsClosed,
    ViewEventsClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;
const JUMP_REPLY_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn view_event_serializer(
    mut view_rx: broadcast::Receiver<ViewEvent>,
    view_bytes_tx: broadcast::Sender<Utf8Bytes>,
) {
    // Serialize each view event once and broadcast the shared bytes.
    loop {
        match view_rx.recv().await {
            Ok(event) => {
                let msg = ServerMessage::from(event);
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize view event");
                        continue;
                    }
                };
                let _ = view_bytes_tx.send(Utf8Bytes::from(txt));
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "view serializer lagged; pages will resync");
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("view events channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_view_serializer(
    view_tx: &broadcast::Sender<ViewEvent>,
    view_bytes_tx: broadcast::Sender<Utf8Bytes>,
) {
    // Subscribe here, before the simulation can emit its first events.
    tokio::spawn(view_event_serializer(view_tx.subscribe(), view_bytes_tx));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs of one page.
        let conn_id = next_conn_id();
        handle_socket(socket, state).instrument(info_span!("conn", conn_id))
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };
    info!("client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        lag_recovery_count = ctx.lag_recovery_count,
        "connection stats"
    );
    info!("client disconnected");
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub cmd_tx: mpsc::Sender<SimCommand>,
    pub view_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub view_state_rx: watch::Receiver<ViewState>,
    // Count lag recovery snapshots sent to this page.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,

    pub last_command_full_log: Instant,
    pub last_view_lag_log: Instant,
    pub last_invalid_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* doing anything else (awaits) to not miss packets.
    let view_bytes_rx = state.view_bytes_tx.subscribe();
    let view_state_rx = state.view_state_tx.subscribe();

    let waypoints =
        ServerMessage::Waypoints(state.waypoints.iter().map(WaypointDto::from).collect());
    let mut bytes_out = send_message(socket, &waypoints).await?;

    // Copy out of the watch so the borrow is not held across the send.
    let latest = *view_state_rx.borrow();
    let sync = ServerMessage::Sync(ViewStateDto::from(latest));
    bytes_out += send_message(socket, &sync).await?;

    let mut ctx = ConnCtx::new(state.cmd_tx.clone(), view_bytes_rx, view_state_rx);
    ctx.msgs_out = 2;
    ctx.bytes_out = bytes_out as u64;
    Ok(ctx)
}

impl ConnCtx {
    fn new(
        cmd_tx: mpsc::Sender<SimCommand>,
        view_bytes_rx: broadcast::Receiver<Utf8Bytes>,
        view_state_rx: watch::Receiver<ViewState>,
    ) -> Self {
        // Backdate so the first warning of each kind is never throttled.
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            cmd_tx,
            view_bytes_rx,
            view_state_rx,
            lag_recovery_count: 0,

            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,

            invalid_json: 0,

            last_command_full_log: now,
            last_view_lag_log: now,
            last_invalid_log: now,

            close_frame: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

// Fire-and-forget commands; a full queue drops the command instead of stalling the socket.
fn dispatch_command(
    cmd_tx: &mpsc::Sender<SimCommand>,
    cmd: SimCommand,
    last_command_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match cmd_tx.try_send(cmd) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(TrySendError::Full(cmd)) => {
            if should_log(last_command_full_log) {
                warn!(?cmd, "command channel full; dropping command");
            }
            Ok(LoopControl::Continue)
        }
        Err(TrySendError::Closed(_cmd)) => Err(NetError::CommandsClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from the page
            incoming = socket.recv() => {
                match handle_incoming_ws(socket, incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing View Event
            view_msg = ctx.view_bytes_rx.recv() => {
                match view_msg {
                    Ok(bytes) => match forward_view_bytes(bytes, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        let snapshot = lag_snapshot(ctx, n);
                        match send_message(socket, &snapshot).await {
                            Ok(bytes) => {
                                ctx.msgs_out += 1;
                                ctx.bytes_out += bytes as u64;
                                false
                            }
                            Err(err) => {
                                warn!(error = ?err, "failed to send lag recovery snapshot");
                                true
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::ViewEventsClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// Resync strategy: replace the missed events with the latest full view state.
fn lag_snapshot(ctx: &mut ConnCtx, missed: u64) -> ServerMessage {
    if should_log(&mut ctx.last_view_lag_log) {
        warn!(missed, "view events lagged; sending snapshot");
    }

    let latest = *ctx.view_state_rx.borrow();
    ctx.lag_recovery_count += 1;
    ServerMessage::Sync(latest.into())
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Key { key }) => dispatch_command(
                        &ctx.cmd_tx,
                        SimCommand::Key { key, reply: None },
                        &mut ctx.last_command_full_log,
                    ),
                    Ok(ClientMessage::Jump(payload)) => {
                        let (reply_tx, reply_rx) = oneshot::channel();
                        let control = dispatch_command(
                            &ctx.cmd_tx,
                            SimCommand::Jump {
                                lat: payload.lat,
                                lng: payload.lng,
                                heading: payload.heading,
                                reply: Some(reply_tx),
                            },
                            &mut ctx.last_command_full_log,
                        )?;

                        // Only the requesting page hears about bad input.
                        let reply = timeout(JUMP_REPLY_TIMEOUT, reply_rx).await;
                        if let Ok(Ok(Err(jump_error))) = reply {
                            let msg = ServerMessage::Error {
                                message: jump_error.to_string(),
                            };
                            let bytes = send_message(socket, &msg).await?;
                            ctx.msgs_out += 1;
                            ctx.bytes_out += bytes as u64;
                        }
                        Ok(control)
                    }
                    Ok(ClientMessage::InitMap) => dispatch_command(
                        &ctx.cmd_tx,
                        SimCommand::InitMap,
                        &mut ctx.last_command_full_log,
                    ),
                    Ok(ClientMessage::CloseJump) => dispatch_command(
                        &ctx.cmd_tx,
                        SimCommand::CloseJump,
                        &mut ctx.last_command_full_log,
                    ),
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_view_bytes(
    view_msg: Utf8Bytes,
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
) -> LoopControl {
    let bytes_len = view_msg.len();
    match socket
        .send(Message::Text(view_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send view event");
            LoopControl::Disconnect
        }
    }
}
