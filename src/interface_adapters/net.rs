use crate::interface_adapters::http::bad_request;
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{rand_id, session_rng};
use crate::use_cases::{
    FrameSubmit, GameMode, SessionEvent, SessionHandle, SessionSnapshot, spawn_session,
    submit_frame,
};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    SessionClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SessionQuery {
    // Game to play on this connection; defaults to rock-paper-scissors.
    #[serde(default)]
    mode: Option<String>,
}

const MAX_INVALID_JSON: u32 = 10;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Response {
    let mode = match query.mode.as_deref().map(str::parse::<GameMode>).transpose() {
        Ok(mode) => mode.unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "rejecting websocket with unknown mode");
            return bad_request(e);
        }
    };

    ws.on_upgrade(move |socket| {
        let conn_id = rand_id();
        handle_socket(socket, state, mode, conn_id)
            .instrument(info_span!("conn", conn_id, mode = mode.as_str()))
    })
}

async fn handle_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    mode: GameMode,
    conn_id: u64,
) {
    let session = spawn_session(
        mode,
        &state.settings,
        state.clock.clone(),
        session_rng(),
    );

    if let Err(e) = send_message(&mut socket, &ServerMessage::session(conn_id, mode)).await {
        warn!(error = ?e, "failed to greet client");
        return;
    }
    info!("client connected");

    let mut ctx = ConnCtx::new(session);
    match run_client_loop(&mut socket, &mut ctx).await {
        Ok(()) => {}
        Err(NetError::SessionClosed) => {
            warn!("session task ended unexpectedly");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "session closed".into(),
                })))
                .await;
        }
        Err(e) => warn!(error = ?e, "client loop exited with error"),
    }

    info!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        frames_dropped = ctx.frames_dropped,
        "client disconnected"
    );
    // Dropping the handle closes the input channel and ends the session task.
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket.send(Message::Text(txt.into())).await?;
    Ok(bytes)
}

struct ConnCtx {
    input_tx: mpsc::Sender<SessionEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,

    msgs_in: u64,
    msgs_out: u64,
    frames_dropped: u64,
    invalid_json: u32,
}

impl ConnCtx {
    fn new(session: SessionHandle) -> Self {
        Self {
            input_tx: session.input_tx,
            snapshot_rx: session.snapshot_rx,
            msgs_in: 0,
            msgs_out: 0,
            frames_dropped: 0,
            invalid_json: 0,
        }
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    loop {
        let control = tokio::select! {
            incoming = socket.recv() => handle_incoming_ws(socket, incoming, ctx).await?,

            // Only the latest snapshot is forwarded when the socket falls behind.
            changed = ctx.snapshot_rx.changed() => {
                changed.map_err(|_| NetError::SessionClosed)?;
                let msg = ServerMessage::from(ctx.snapshot_rx.borrow_and_update().clone());
                send_message(socket, &msg).await?;
                ctx.msgs_out += 1;
                LoopControl::Continue
            }
        };

        if let LoopControl::Disconnect = control {
            return Ok(());
        }
    }
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, axum::Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let msg = match incoming {
        Some(Ok(msg)) => msg,
        Some(Err(e)) => return Err(NetError::Ws(e)),
        None => return Ok(LoopControl::Disconnect),
    };
    ctx.msgs_in += 1;

    let text = match msg {
        Message::Text(text) => text,
        Message::Close(_) => return Ok(LoopControl::Disconnect),
        // Pings are answered by axum; binary payloads are not part of the protocol.
        _ => return Ok(LoopControl::Continue),
    };

    let client_msg = match serde_json::from_str::<ClientMessage>(text.as_str()) {
        Ok(msg) => msg,
        Err(e) => {
            ctx.invalid_json += 1;
            warn!(error = %e, count = ctx.invalid_json, "invalid client message");
            if ctx.invalid_json >= MAX_INVALID_JSON {
                let _ = socket
                    .send(Message::Close(Some(CloseFrame {
                        code: close_code::POLICY,
                        reason: "too many invalid messages".into(),
                    })))
                    .await;
                return Ok(LoopControl::Disconnect);
            }
            send_error(socket, ctx, format!("invalid message: {e}")).await?;
            return Ok(LoopControl::Continue);
        }
    };

    match client_msg {
        ClientMessage::Frame(frame) => match frame.into_hand() {
            Ok(hand) => match submit_frame(&ctx.input_tx, hand) {
                FrameSubmit::Accepted => {}
                FrameSubmit::Dropped => ctx.frames_dropped += 1,
                FrameSubmit::Closed => return Err(NetError::SessionClosed),
            },
            Err(e) => {
                warn!(error = %e, "malformed frame; skipping");
                send_error(socket, ctx, e.to_string()).await?;
            }
        },
        ClientMessage::DetectionError { message } => {
            forward(ctx, SessionEvent::DetectionFailed { message }).await?;
        }
        ClientMessage::Start => forward(ctx, SessionEvent::Start).await?,
        ClientMessage::Stop => forward(ctx, SessionEvent::Stop).await?,
    }

    Ok(LoopControl::Continue)
}

// Control events wait for room; only frames are droppable.
async fn forward(ctx: &ConnCtx, event: SessionEvent) -> Result<(), NetError> {
    ctx.input_tx
        .send(event)
        .await
        .map_err(|_| NetError::SessionClosed)
}

async fn send_error(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    message: String,
) -> Result<(), NetError> {
    send_message(socket, &ServerMessage::Error { message }).await?;
    ctx.msgs_out += 1;
    Ok(())
}
