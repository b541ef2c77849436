use std::sync::Arc;

use crate::config::ServerConfig;
use crate::jobs::JobManager;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Job lifecycle manager (in-memory registry + per-job supervisors).
    pub jobs: Arc<JobManager>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying job lifecycle events.
    pub event_bus: Arc<brandforge_events::JobEventBus>,
}
