//! The dispatch engine: entry points, job handles and lifecycle plumbing.
//!
//! Each dispatch pairs one target with one placeholder and runs as an
//! independent job. The engine enforces no pool bound, no queueing and no
//! ordering across jobs; when several objects are dispatched together their
//! visual order comes from their placeholders, not from completion order.

use crate::engine::protocol::{AsyncMode, JobId, JobState, JobUpdate};
use crate::engine::worker::{run_job, JobContext};
use crate::error::Result;
use crate::remote::{Description, ProbeTarget, RemoteSource};
use crate::render::registry::{Registry, RenderContext, Renderer, DEFAULT_MAX_DEPTH};
use crate::render::tag::TypeTag;
use crate::render::tree::RenderTree;
use crate::widget::Placeholder;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Dispatch in the background unless overridden per call
    pub default_async: bool,
    /// Nested rendering bound
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_async: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Handle to one dispatched job.
///
/// Dropping the handle detaches the job: the work keeps running and the
/// placeholder still resolves. Keep the handle to wait or cancel.
pub struct JobHandle {
    id: JobId,
    placeholder: Placeholder,
    cancel: CancellationToken,
    state_rx: watch::Receiver<JobState>,
    task: Option<JoinHandle<()>>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The placeholder this job writes into
    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Last observed job state
    pub fn state(&self) -> JobState {
        *self.state_rx.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Wait until the job reaches a terminal state
    pub async fn wait(&mut self) -> JobState {
        loop {
            let current = *self.state_rx.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            if self.state_rx.changed().await.is_err() {
                return *self.state_rx.borrow();
            }
        }
    }

    /// Request cooperative termination and block until the job acknowledges
    /// stop.
    ///
    /// Best-effort: a job that already completed keeps its result, a job
    /// mid-fetch abandons the fetch at the next checkpoint. Cancelling a
    /// finished job is a no-op, and so is cancelling twice.
    pub async fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Asynchronous result-dispatch engine.
///
/// Owns the remote source, the renderer registry and the update channel.
/// The registry is read-mostly: extended through
/// [`register_renderer`](Self::register_renderer) during setup, shared
/// read-only with every running job.
pub struct DispatchEngine {
    source: Arc<dyn RemoteSource>,
    registry: Arc<RwLock<Registry>>,
    default_async: AtomicBool,
    max_depth: usize,
    next_job_id: AtomicU64,
    updates_tx: mpsc::UnboundedSender<JobUpdate>,
    updates_rx: Mutex<Option<mpsc::UnboundedReceiver<JobUpdate>>>,
}

impl DispatchEngine {
    /// Engine with the built-in renderers and default config
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self::with_registry(source, Registry::with_defaults(), EngineConfig::default())
    }

    /// Engine with a caller-built registry and explicit config
    pub fn with_registry(
        source: Arc<dyn RemoteSource>,
        registry: Registry,
        config: EngineConfig,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            source,
            registry: Arc::new(RwLock::new(registry)),
            default_async: AtomicBool::new(config.default_async),
            max_depth: config.max_depth,
            next_job_id: AtomicU64::new(1),
            updates_tx,
            updates_rx: Mutex::new(Some(updates_rx)),
        }
    }

    /// Register `renderer` for every tag in `tags`; the most recent
    /// registration for a tag wins
    pub fn register_renderer(
        &self,
        tags: impl IntoIterator<Item = TypeTag>,
        renderer: Renderer,
    ) {
        self.registry.write().register(tags, renderer);
    }

    /// [`register_renderer`](Self::register_renderer) for plain functions
    /// and closures
    pub fn register_renderer_fn<F>(&self, tags: impl IntoIterator<Item = TypeTag>, renderer: F)
    where
        F: Fn(&RenderContext<'_>, &Description) -> Result<RenderTree> + Send + Sync + 'static,
    {
        self.registry.write().register_fn(tags, renderer);
    }

    /// Whether dispatches default to background mode
    pub fn default_async(&self) -> bool {
        self.default_async.load(Ordering::Relaxed)
    }

    /// Flip the default dispatch mode; per-call overrides still apply
    pub fn set_default_async(&self, default_async: bool) {
        self.default_async.store(default_async, Ordering::Relaxed);
    }

    /// Take the terminal-update receiver.
    ///
    /// The first caller gets it and becomes the owning context; later calls
    /// return `None`.
    pub fn take_updates(&self) -> Option<mpsc::UnboundedReceiver<JobUpdate>> {
        self.updates_rx.lock().take()
    }

    /// Dispatch `target` into the caller-supplied `placeholder` using the
    /// engine's default mode
    pub async fn dispatch(&self, target: ProbeTarget, placeholder: Placeholder) -> JobHandle {
        let mode = if self.default_async() {
            AsyncMode::Background
        } else {
            AsyncMode::Inline
        };
        self.dispatch_with(target, placeholder, mode).await
    }

    /// Dispatch with an explicit mode override
    pub async fn dispatch_with(
        &self,
        target: ProbeTarget,
        placeholder: Placeholder,
        mode: AsyncMode,
    ) -> JobHandle {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(JobState::Pending);

        let job = JobContext {
            job_id,
            target,
            placeholder: placeholder.clone(),
            source: Arc::clone(&self.source),
            registry: Arc::clone(&self.registry),
            max_depth: self.max_depth,
            cancel: cancel.clone(),
            state_tx,
            updates: self.updates_tx.clone(),
        };

        log::debug!("dispatching job {job_id} ({mode:?})");
        let task = match mode {
            AsyncMode::Background => Some(tokio::spawn(run_job(job))),
            AsyncMode::Inline => {
                run_job(job).await;
                None
            }
        };

        JobHandle {
            id: job_id,
            placeholder,
            cancel,
            state_rx,
            task,
        }
    }

    /// Dispatch several targets at once, one fresh placeholder per target.
    ///
    /// Handles come back in input order, which is also the visual order a
    /// host should lay the placeholders out in; completion order is up to
    /// each job.
    pub async fn dispatch_all(
        &self,
        targets: impl IntoIterator<Item = ProbeTarget>,
    ) -> Vec<JobHandle> {
        let mut handles = Vec::new();
        for target in targets {
            handles.push(self.dispatch(target, Placeholder::loading()).await);
        }
        handles
    }
}
