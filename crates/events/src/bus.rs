//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`JobEventBus`] is the publish/subscribe hub for [`JobEvent`]s emitted by
//! running jobs. It is designed to be shared via `Arc<JobEventBus>` across
//! the application; the WebSocket layer subscribes and forwards frames to
//! connected clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

use brandforge_core::types::JobId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Message type constants
// ---------------------------------------------------------------------------

/// Progress line appended during job execution.
pub const MSG_TYPE_JOB_PROGRESS: &str = "job_progress";

/// Cost snapshot updated after a billed remote call.
pub const MSG_TYPE_JOB_COST: &str = "job_cost";

/// Job completed successfully.
pub const MSG_TYPE_JOB_COMPLETED: &str = "job_completed";

/// Job failed with an error.
pub const MSG_TYPE_JOB_FAILED: &str = "job_failed";

// ---------------------------------------------------------------------------
// JobEvent
// ---------------------------------------------------------------------------

/// What happened to a job.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEventKind {
    /// A progress message was appended to the job log.
    JobProgress { message: String },
    /// The job's cumulative cost changed.
    JobCost { cost: serde_json::Value },
    /// The job reached `completed`.
    JobCompleted,
    /// The job reached `error`.
    JobFailed { error: String },
}

impl JobEventKind {
    /// The wire message type constant for this event.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::JobProgress { .. } => MSG_TYPE_JOB_PROGRESS,
            Self::JobCost { .. } => MSG_TYPE_JOB_COST,
            Self::JobCompleted => MSG_TYPE_JOB_COMPLETED,
            Self::JobFailed { .. } => MSG_TYPE_JOB_FAILED,
        }
    }
}

/// A lifecycle event for one job.
#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    pub job_id: JobId,
    #[serde(flatten)]
    pub kind: JobEventKind,
    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl JobEvent {
    pub fn new(job_id: JobId, kind: JobEventKind) -> Self {
        Self {
            job_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// JobEventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for job events.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`JobEvent`].
pub struct JobEventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl JobEventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; the job record
    /// itself is always updated first, so polling clients lose nothing.
    pub fn publish(&self, event: JobEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for JobEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
