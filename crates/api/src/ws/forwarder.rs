//! Bridges the job event bus to WebSocket clients.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast::error::RecvError;

use brandforge_events::{JobEvent, JobEventBus};

use crate::ws::manager::WsManager;

/// Spawn a task that forwards every [`JobEvent`] to all connected clients
/// as a JSON text frame.
///
/// The task ends when the bus sender is dropped (during shutdown). Lagged
/// receivers skip ahead: polling clients still see the full progress log
/// on the job record itself.
pub fn start_event_forwarder(
    bus: Arc<JobEventBus>,
    ws_manager: Arc<WsManager>,
) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => forward(&ws_manager, event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event forwarder lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::info!("Event forwarder stopped");
    })
}

async fn forward(ws_manager: &WsManager, event: JobEvent) {
    match serde_json::to_string(&event) {
        Ok(json) => ws_manager.broadcast(Message::Text(json.into())).await,
        Err(e) => tracing::error!(error = %e, "Failed to serialize job event"),
    }
}
