use super::state::AppState;
use crate::pipeline::Session;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, warn};

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /ws/audio
/// Upgrade the connection to a streaming audio session
pub async fn audio_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

/// One connection, one session: binary frames are fed to the accumulator,
/// and each completed audio unit produces exactly one text frame back
/// (the aggregated response, or an explicit failure notice for an aborted
/// unit). A disconnect abandons any in-flight unit without a response;
/// staged resources are released either way.
async fn handle_session(mut socket: WebSocket, state: AppState) {
    let mut session = Session::new(state.pipeline.clone());
    info!("Audio stream connected: {}", session.id());

    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("Session {} transport error: {}", session.id(), e);
                break;
            }
        };

        match message {
            Message::Binary(bytes) => {
                let Some(outcome) = session.ingest(&bytes).await else {
                    continue;
                };

                let frame = match outcome.to_frame() {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!("Session {} failed to serialize frame: {}", session.id(), e);
                        continue;
                    }
                };

                if socket.send(Message::Text(frame)).await.is_err() {
                    warn!("Session {} dropped while responding", session.id());
                    break;
                }
            }
            Message::Close(_) => break,
            // Pings are answered by axum; text frames are not part of the
            // ingestion protocol and are ignored
            _ => {}
        }
    }

    let stats = session.stats();
    info!(
        "Session {} closed: {} bytes received, {} units processed, {} failed",
        stats.session_id, stats.bytes_received, stats.units_processed, stats.units_failed
    );
}
