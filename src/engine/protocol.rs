//! Job lifecycle types shared between the engine, its workers and observers.
//!
//! Terminal outcomes travel two ways: into the job's placeholder (the single
//! write) and over the engine's update channel as [`JobUpdate`] messages
//! correlated by [`JobId`], so an owning context can react without polling.

use crate::render::tree::{RenderResult, RenderTree};
use std::time::Duration;

/// Monotonically increasing job identifier, unique per engine instance.
pub type JobId = u64;

/// Lifecycle state of a dispatched job.
///
/// `Pending` → `Running` on schedule, then exactly one of the terminal
/// states. There is no retry transition; callers re-dispatch instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Cancelled,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Cancelled | JobState::Completed | JobState::Failed
        )
    }
}

/// Where the resolve+render work for a dispatch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsyncMode {
    /// Spawn a dedicated background task (the engine default)
    #[default]
    Background,
    /// Run to completion inside the caller's `await`
    Inline,
}

/// Failure digest for a job: the headline message, the error panel bound
/// into the placeholder, and the wall-clock time spent before failing.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub panel: RenderTree,
    pub elapsed: Duration,
}

/// Terminal outcome of a job.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(RenderResult),
    Failed(ErrorReport),
    Cancelled,
}

impl JobOutcome {
    /// The job state this outcome terminates in
    pub fn state(&self) -> JobState {
        match self {
            JobOutcome::Completed(_) => JobState::Completed,
            JobOutcome::Failed(_) => JobState::Failed,
            JobOutcome::Cancelled => JobState::Cancelled,
        }
    }
}

/// Terminal notification delivered on the engine's update channel.
#[derive(Debug, Clone)]
pub struct JobUpdate {
    pub job_id: JobId,
    pub outcome: JobOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_outcome_maps_to_state() {
        assert_eq!(JobOutcome::Cancelled.state(), JobState::Cancelled);
        let report = ErrorReport {
            message: "boom".to_string(),
            panel: RenderTree::default(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(JobOutcome::Failed(report).state(), JobState::Failed);
    }

    #[test]
    fn test_background_is_the_default_mode() {
        assert_eq!(AsyncMode::default(), AsyncMode::Background);
    }
}
