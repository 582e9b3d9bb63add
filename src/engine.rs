//! Asynchronous result dispatch.
//!
//! The engine turns a probe target into a rendered placeholder without
//! blocking the caller: resolve the description, dispatch it through the
//! renderer registry, bind the outcome. Jobs are independent, cancellable
//! and report terminal outcomes on a shared update channel.

pub mod dispatch;
pub mod protocol;
pub(crate) mod worker;

pub use dispatch::{DispatchEngine, EngineConfig, JobHandle};
pub use protocol::{AsyncMode, ErrorReport, JobId, JobOutcome, JobState, JobUpdate};
