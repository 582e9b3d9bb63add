//! Job execution: type resolution and the checkpointed fetch→render→bind run.

use crate::engine::protocol::{ErrorReport, JobId, JobOutcome, JobState, JobUpdate};
use crate::error::Result;
use crate::remote::{local_type_name, Description, ProbeTarget, RemoteSource};
use crate::render::registry::{Registry, RenderContext};
use crate::render::report::error_tree;
use crate::render::tag::TypeTag;
use crate::render::tree::RenderResult;
use crate::widget::Placeholder;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Resolved identity of a dispatch target, ready to render.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub tag: TypeTag,
    pub local_type: String,
    pub server_type: String,
    pub description: Description,
}

/// Determine the reportable type of `target`.
///
/// Remote targets fetch their description; the server-reported `type` string
/// wins and the handle's local type name is the fallback. Local values derive
/// both labels from the JSON kind without any fetch. Fetch errors propagate
/// untouched; the job boundary converts them.
pub(crate) async fn resolve_target(
    source: &dyn RemoteSource,
    target: &ProbeTarget,
) -> Result<Resolution> {
    match target {
        ProbeTarget::Remote(handle) => {
            let description = source.fetch_description(handle).await?;
            let server_type = description
                .get("type")
                .and_then(Description::as_str)
                .unwrap_or_else(|| handle.local_type())
                .to_string();
            Ok(Resolution {
                tag: TypeTag::parse(&server_type),
                local_type: handle.local_type().to_string(),
                server_type,
                description,
            })
        }
        ProbeTarget::Local(value) => {
            let local_type = local_type_name(value).to_string();
            Ok(Resolution {
                tag: TypeTag::parse(&local_type),
                local_type: local_type.clone(),
                server_type: local_type,
                description: value.clone(),
            })
        }
    }
}

/// Everything one job needs, bundled for the spawn.
pub(crate) struct JobContext {
    pub job_id: JobId,
    pub target: ProbeTarget,
    pub placeholder: Placeholder,
    pub source: Arc<dyn RemoteSource>,
    pub registry: Arc<RwLock<Registry>>,
    pub max_depth: usize,
    pub cancel: CancellationToken,
    pub state_tx: watch::Sender<JobState>,
    pub updates: mpsc::UnboundedSender<JobUpdate>,
}

/// Run one job to its terminal state.
///
/// The cancellation token is honoured at two checkpoints (before the fetch
/// and before the render) and raced against the fetch itself, so a hung
/// remote call cannot outlive a cancel. Every error is converted into a
/// Failed outcome here; the task never propagates one.
pub(crate) async fn run_job(ctx: JobContext) {
    let _ = ctx.state_tx.send(JobState::Running);
    let started = Instant::now();

    if ctx.cancel.is_cancelled() {
        finish_cancelled(&ctx);
        return;
    }

    let resolution = tokio::select! {
        resolved = resolve_target(ctx.source.as_ref(), &ctx.target) => resolved,
        _ = ctx.cancel.cancelled() => {
            finish_cancelled(&ctx);
            return;
        }
    };

    if ctx.cancel.is_cancelled() {
        finish_cancelled(&ctx);
        return;
    }

    let rendered = resolution.and_then(|resolution| {
        let registry = ctx.registry.read();
        let render_ctx = RenderContext::new(&registry, ctx.max_depth);
        let tree = render_ctx.render(&resolution.tag, &resolution.description)?;
        Ok(RenderResult {
            tree,
            local_type: resolution.local_type,
            server_type: resolution.server_type,
            elapsed: started.elapsed(),
        })
    });

    match rendered {
        Ok(result) => {
            log::debug!(
                "job {} completed as {} in {:?}",
                ctx.job_id,
                result.server_type,
                result.elapsed
            );
            ctx.placeholder.complete(&result);
            let _ = ctx.state_tx.send(JobState::Completed);
            let _ = ctx.updates.send(JobUpdate {
                job_id: ctx.job_id,
                outcome: JobOutcome::Completed(result),
            });
        }
        Err(error) => {
            log::warn!("job {} failed: {error}", ctx.job_id);
            let report = ErrorReport {
                message: error.to_string(),
                panel: error_tree(&error),
                elapsed: started.elapsed(),
            };
            ctx.placeholder.fail(&report.panel);
            let _ = ctx.state_tx.send(JobState::Failed);
            let _ = ctx.updates.send(JobUpdate {
                job_id: ctx.job_id,
                outcome: JobOutcome::Failed(report),
            });
        }
    }
}

fn finish_cancelled(ctx: &JobContext) {
    log::debug!("job {} cancelled", ctx.job_id);
    ctx.placeholder.mark_cancelled();
    let _ = ctx.state_tx.send(JobState::Cancelled);
    let _ = ctx.updates.send(JobUpdate {
        job_id: ctx.job_id,
        outcome: JobOutcome::Cancelled,
    });
}
