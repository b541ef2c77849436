//! Typed progress/cost relay from pipeline stages to their observer.
//!
//! Stages never know how events are delivered; they emit into an
//! [`EventSink`] owned by the caller (the job manager appends to the job
//! record and republishes on the event bus, the CLI prints to stdout).

use crate::cost::CostInfo;

/// One event emitted while a pipeline run is in flight.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Human-readable progress line, append-only.
    Progress(String),
    /// Cumulative cost snapshot after a billed remote call.
    Cost(CostInfo),
}

/// Receiver for pipeline events.
///
/// Implementations must be cheap and non-blocking; they are called from
/// inside stage task bodies.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink that discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Convenience: emit a progress line.
pub fn progress(sink: &dyn EventSink, message: impl Into<String>) {
    sink.emit(PipelineEvent::Progress(message.into()));
}
