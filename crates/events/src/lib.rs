//! In-process event distribution for job lifecycle updates.

pub mod bus;

pub use bus::{JobEvent, JobEventBus, JobEventKind};
