//! Write-once placeholder slot.
//!
//! Each dispatched object gets a placeholder shown while its job runs. The
//! slot starts in `Loading` and transitions exactly once to a terminal state;
//! late writes are ignored, which settles a cancel racing a completion
//! deterministically in favour of whichever landed first. Host toolkits
//! mirror the slot's label, content tree and expansion state into their own
//! container widget.

use crate::render::format::format_elapsed;
use crate::render::tree::{RenderResult, RenderTree};
use parking_lot::Mutex;
use std::sync::Arc;

/// Lifecycle state of a placeholder slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderState {
    /// Job still running; content not yet available
    Loading,
    /// Completed render bound into the slot
    Rendered,
    /// Error panel bound into the slot
    Errored,
    /// Job cancelled; label updated, content left as it was
    Cancelled,
}

impl PlaceholderState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PlaceholderState::Loading)
    }
}

#[derive(Debug)]
struct PlaceholderInner {
    state: PlaceholderState,
    label: String,
    content: Option<RenderTree>,
    collapsed: bool,
}

/// Shared container slot that a dispatched job fills exactly once.
///
/// Cloning shares the slot. The caller keeps one clone for display; the job
/// holds another and performs the single terminal write.
#[derive(Debug, Clone)]
pub struct Placeholder {
    inner: Arc<Mutex<PlaceholderInner>>,
}

impl Placeholder {
    /// New slot in the Loading state with the default label
    pub fn loading() -> Self {
        Self::with_label("Loading...")
    }

    /// New Loading slot with a caller-supplied label, for hosts that show
    /// what is being loaded (`"Loading thumbnail..."`)
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PlaceholderInner {
                state: PlaceholderState::Loading,
                label: label.into(),
                content: None,
                collapsed: false,
            })),
        }
    }

    pub fn state(&self) -> PlaceholderState {
        self.inner.lock().state
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Current label snapshot
    pub fn label(&self) -> String {
        self.inner.lock().label.clone()
    }

    /// Current content snapshot; `None` while loading or after a cancel that
    /// landed before any content
    pub fn content(&self) -> Option<RenderTree> {
        self.inner.lock().content.clone()
    }

    /// Whether the host container should present itself collapsed
    pub fn is_collapsed(&self) -> bool {
        self.inner.lock().collapsed
    }

    /// Bind a completed render. Returns false if the slot was already
    /// terminal, in which case nothing changes.
    pub(crate) fn complete(&self, result: &RenderResult) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.is_terminal() {
            return false;
        }
        inner.state = PlaceholderState::Rendered;
        inner.label = result_label(result);
        inner.collapsed = result.tree.section_count() > 1;
        inner.content = Some(result.tree.clone());
        true
    }

    /// Bind an error panel under the fixed `ERROR` label. Returns false if
    /// the slot was already terminal.
    pub(crate) fn fail(&self, panel: &RenderTree) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.is_terminal() {
            return false;
        }
        inner.state = PlaceholderState::Errored;
        inner.label = "ERROR".to_string();
        inner.content = Some(panel.clone());
        true
    }

    /// Mark the slot cancelled: fixed `CANCELLED` label, content untouched.
    /// Returns false if the slot was already terminal.
    pub(crate) fn mark_cancelled(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.is_terminal() {
            return false;
        }
        inner.state = PlaceholderState::Cancelled;
        inner.label = "CANCELLED".to_string();
        true
    }
}

/// Completed label: both type names when they differ, always stamped with the
/// elapsed wall-clock time.
fn result_label(result: &RenderResult) -> String {
    let elapsed = format_elapsed(result.elapsed);
    if result.local_type == result.server_type {
        format!("{} [{}]", result.server_type, elapsed)
    } else {
        format!(
            "{} (local) / {} (server) [{}]",
            result.local_type, result.server_type, elapsed
        )
    }
}
