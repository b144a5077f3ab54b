//! Submission and polling of generation tasks.
//!
//! [`GenerationOrchestrator`] owns the single current [`GenerationTask`].
//! A successful submission spawns one polling task guarded by a child
//! [`CancellationToken`]; a new submission cancels it and bumps the epoch,
//! so any response still in flight for the old task is discarded on arrival.
//!
//! Notifications are broadcast as [`GenerationEvent`]s. Call
//! [`GenerationOrchestrator::subscribe`] to receive them.

use std::sync::Arc;
use std::time::Duration;

use atelier_core::types::TaskId;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::JobApi;
use crate::error::GenerationError;
use crate::messages::TaskSnapshot;
use crate::request::GenerationRequest;
use crate::task::{images_from_payload, GeneratedImage, GenerationTask, TaskPhase, Transition};

/// Broadcast channel capacity for generation events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long [`GenerationOrchestrator::shutdown`] waits for the poller.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A notification about the current generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// The job API accepted the request.
    Submitted { epoch: u64, task_id: TaskId },

    /// The request was not accepted; no task exists.
    SubmitFailed { epoch: u64, message: String },

    /// A poll reported a new non-terminal phase.
    StatusChanged { task_id: TaskId, phase: TaskPhase },

    /// The task reached a terminal phase.
    Completed {
        task_id: TaskId,
        phase: TaskPhase,
        images: Vec<GeneratedImage>,
    },

    /// A poll failed; the task is marked failed.
    PollFailed { task_id: TaskId, message: String },

    /// A response for a superseded task arrived and was ignored.
    StaleResponseDiscarded { epoch: u64, task_id: TaskId },

    /// Polling was stopped without a terminal status.
    Cancelled { epoch: u64 },
}

/// Polling task bookkeeping.
struct ActivePoll {
    task_handle: JoinHandle<()>,
    /// Per-poll cancellation token (child of the master token).
    cancel: CancellationToken,
}

/// Everything a polling task needs, detached from the orchestrator.
struct PollContext<A> {
    api: Arc<A>,
    state: Arc<RwLock<GenerationTask>>,
    event_tx: broadcast::Sender<GenerationEvent>,
    poll_interval: Duration,
}

/// Drives one generation at a time against a [`JobApi`].
pub struct GenerationOrchestrator<A: JobApi> {
    api: Arc<A>,
    state: Arc<RwLock<GenerationTask>>,
    event_tx: broadcast::Sender<GenerationEvent>,
    active: Mutex<Option<ActivePoll>>,
    poll_interval: Duration,
    /// Master cancellation token, cancelled during shutdown.
    cancel: CancellationToken,
}

impl<A: JobApi> GenerationOrchestrator<A> {
    pub fn new(api: Arc<A>, poll_interval: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            state: Arc::new(RwLock::new(GenerationTask::default())),
            event_tx,
            active: Mutex::new(None),
            poll_interval,
            cancel: CancellationToken::new(),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Subscribe to generation events.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.event_tx.subscribe()
    }

    /// A copy of the current task state.
    pub async fn snapshot(&self) -> GenerationTask {
        self.state.read().await.clone()
    }

    /// Validate `request`, submit it, and start polling the new task.
    ///
    /// Validation failures return before any network call and leave the
    /// current task untouched. Otherwise the previous task is superseded
    /// immediately, even if this submission then fails.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<TaskId, GenerationError> {
        let model = request.validate()?;
        let wire = request.to_wire(model)?;

        self.stop_polling().await;
        let epoch = self.state.write().await.begin();
        tracing::info!(
            epoch,
            model = model.id,
            images = request.image_urls.len(),
            "Submitting generation",
        );

        let task_id = match self.api.create_task(&wire).await {
            Ok(task_id) => task_id,
            Err(e) => {
                let transition = self.state.write().await.on_submit_failed(epoch);
                tracing::error!(epoch, error = %e, "Failed to create generation task");
                if transition != Transition::Stale {
                    let _ = self.event_tx.send(GenerationEvent::SubmitFailed {
                        epoch,
                        message: e.to_string(),
                    });
                }
                return Err(e.into());
            }
        };

        if self.state.write().await.on_submitted(epoch, task_id.clone()) == Transition::Stale {
            tracing::warn!(epoch, task_id = %task_id, "Submission superseded before acknowledgement");
            return Err(GenerationError::Superseded);
        }

        tracing::info!(epoch, task_id = %task_id, "Generation task created");
        let _ = self.event_tx.send(GenerationEvent::Submitted {
            epoch,
            task_id: task_id.clone(),
        });

        self.spawn_poller(epoch, task_id.clone()).await;
        Ok(task_id)
    }

    /// Stop polling the current task. Its phase is left as is; responses
    /// still in flight are discarded.
    pub async fn cancel(&self) {
        self.stop_polling().await;
        let epoch = {
            let mut state = self.state.write().await;
            if !state.generating {
                return;
            }
            state.invalidate();
            state.epoch
        };
        tracing::info!(epoch, "Generation polling cancelled");
        let _ = self.event_tx.send(GenerationEvent::Cancelled { epoch });
    }

    /// Wait until nothing is generating and return the final state.
    pub async fn wait_for_terminal(&self) -> GenerationTask {
        let mut rx = self.subscribe();
        loop {
            {
                let state = self.state.read().await;
                if !state.generating {
                    return state.clone();
                }
            }
            match rx.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return self.snapshot().await,
            }
        }
    }

    /// Cancel polling and wait up to 5 seconds for the poller to exit.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down generation orchestrator");
        self.cancel.cancel();
        let active = self.active.lock().await.take();
        if let Some(active) = active {
            active.cancel.cancel();
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, active.task_handle).await;
        }
        tracing::info!("Generation orchestrator shut down complete");
    }

    // ---- private helpers ----

    /// Cancel the current poller without waiting for it.
    async fn stop_polling(&self) {
        let active = self.active.lock().await.take();
        if let Some(active) = active {
            active.cancel.cancel();
        }
    }

    async fn spawn_poller(&self, epoch: u64, task_id: TaskId) {
        let cancel = self.cancel.child_token();
        let ctx = PollContext {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            event_tx: self.event_tx.clone(),
            poll_interval: self.poll_interval,
        };
        let cancel_clone = cancel.clone();

        let task_handle = tokio::spawn(async move {
            tracing::debug!(epoch, task_id = %task_id, "Starting poll loop");
            run_poll_loop(&ctx, epoch, &task_id, &cancel_clone).await;
            tracing::debug!(epoch, task_id = %task_id, "Poll loop exited");
        });

        let mut active = self.active.lock().await;
        if let Some(previous) = active.replace(ActivePoll {
            task_handle,
            cancel,
        }) {
            previous.cancel.cancel();
        }
    }
}

impl<A: JobApi> Drop for GenerationOrchestrator<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Poll `task_id` every `poll_interval` until a terminal status, a poll
/// error, a stale response, or cancellation.
///
/// The first poll fires immediately. Each poll completes before the next
/// tick is awaited, so polls never overlap.
async fn run_poll_loop<A: JobApi>(
    ctx: &PollContext<A>,
    epoch: u64,
    task_id: &str,
    cancel: &CancellationToken,
) {
    let mut ticker = tokio::time::interval(ctx.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(epoch, task_id, "Poll loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                if !ctx.state.read().await.is_current(epoch, task_id) {
                    break;
                }
                if poll_once(ctx, epoch, task_id).await {
                    break;
                }
            }
        }
    }
}

/// Run one query and apply it. Returns `true` when polling should stop.
async fn poll_once<A: JobApi>(ctx: &PollContext<A>, epoch: u64, task_id: &str) -> bool {
    match ctx.api.query_task(task_id).await {
        Ok(snapshot) => apply_snapshot(ctx, epoch, task_id, snapshot).await,
        Err(e) => {
            let transition = ctx.state.write().await.on_poll_error(epoch, task_id);
            if transition == Transition::Stale {
                discard_stale(ctx, epoch, task_id);
                return true;
            }
            tracing::error!(epoch, task_id, error = %e, "Failed to poll task status");
            let _ = ctx.event_tx.send(GenerationEvent::PollFailed {
                task_id: task_id.to_string(),
                message: e.to_string(),
            });
            true
        }
    }
}

async fn apply_snapshot<A: JobApi>(
    ctx: &PollContext<A>,
    epoch: u64,
    task_id: &str,
    snapshot: TaskSnapshot,
) -> bool {
    let Some(status) = snapshot.parsed_status() else {
        tracing::debug!(
            epoch,
            task_id,
            status = snapshot.status.as_deref().unwrap_or(""),
            "Ignoring unrecognised task status",
        );
        return false;
    };

    let images = if status.is_terminal() {
        images_from_payload(
            snapshot.task_info.as_ref(),
            snapshot.task_result.as_ref(),
            chrono::Utc::now(),
        )
    } else {
        Vec::new()
    };

    let reported = images.clone();
    let transition = ctx
        .state
        .write()
        .await
        .on_status(epoch, task_id, status, images);

    match transition {
        Transition::Stale => {
            discard_stale(ctx, epoch, task_id);
            true
        }
        Transition::Updated { phase, changed } => {
            if changed {
                tracing::debug!(epoch, task_id, phase = %phase, "Task status changed");
                let _ = ctx.event_tx.send(GenerationEvent::StatusChanged {
                    task_id: task_id.to_string(),
                    phase,
                });
            }
            false
        }
        Transition::Terminal(phase) => {
            let images = if phase == TaskPhase::Success {
                reported
            } else {
                Vec::new()
            };
            if phase == TaskPhase::Success && images.is_empty() {
                tracing::warn!(epoch, task_id, "Task succeeded without any images");
            }
            tracing::info!(epoch, task_id, phase = %phase, images = images.len(), "Generation finished");
            let _ = ctx.event_tx.send(GenerationEvent::Completed {
                task_id: task_id.to_string(),
                phase,
                images,
            });
            true
        }
    }
}

fn discard_stale<A>(ctx: &PollContext<A>, epoch: u64, task_id: &str) {
    tracing::debug!(epoch, task_id, "Discarding response for superseded task");
    let _ = ctx.event_tx.send(GenerationEvent::StaleResponseDiscarded {
        epoch,
        task_id: task_id.to_string(),
    });
}
