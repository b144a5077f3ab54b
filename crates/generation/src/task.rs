//! Generation task state and its transitions.
//!
//! All transitions are plain methods on [`GenerationTask`]; the
//! orchestrator only decides when to call them. Responses are matched
//! against the current epoch and task id, and anything older is reported
//! as [`Transition::Stale`] without touching state.

use atelier_core::extract::parse_task_images;
use atelier_core::types::{TaskId, Timestamp};
use serde::Serialize;
use serde_json::Value;

use crate::messages::TaskStatus;

/// Lifecycle phase of the current task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPhase {
    /// No task has been accepted yet.
    #[default]
    None,
    Pending,
    Processing,
    Success,
    Failed,
    Canceled,
}

impl TaskPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

impl From<TaskStatus> for TaskPhase {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => Self::Pending,
            TaskStatus::Processing => Self::Processing,
            TaskStatus::Success => Self::Success,
            TaskStatus::Failed => Self::Failed,
            TaskStatus::Canceled => Self::Canceled,
        }
    }
}

impl std::fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    /// `<millis>-<index>-<url>`.
    pub id: String,
    pub url: String,
}

impl GeneratedImage {
    pub fn new(millis: i64, index: usize, url: String) -> Self {
        Self {
            id: format!("{millis}-{index}-{url}"),
            url,
        }
    }
}

/// Result images of a finished task, stamped with `now`.
pub fn images_from_payload(
    task_info: Option<&Value>,
    task_result: Option<&Value>,
    now: Timestamp,
) -> Vec<GeneratedImage> {
    let millis = now.timestamp_millis();
    parse_task_images(task_info, task_result)
        .into_iter()
        .enumerate()
        .map(|(index, url)| GeneratedImage::new(millis, index, url))
        .collect()
}

/// Outcome of feeding a response into the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The response belongs to a superseded submission or task.
    Stale,
    /// Accepted; the task is still running.
    Updated { phase: TaskPhase, changed: bool },
    /// Accepted; the task reached a terminal phase.
    Terminal(TaskPhase),
}

/// State of the current generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationTask {
    pub task_id: Option<TaskId>,
    pub phase: TaskPhase,
    pub images: Vec<GeneratedImage>,
    /// Incremented on every submission.
    pub epoch: u64,
    /// `true` from submission until a terminal phase or failure.
    pub generating: bool,
}

impl GenerationTask {
    /// Start a new submission, invalidating everything before it.
    ///
    /// Returns the new epoch.
    pub fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.task_id = None;
        self.phase = TaskPhase::None;
        self.images.clear();
        self.generating = true;
        self.epoch
    }

    /// The job API accepted submission `epoch` as `task_id`.
    pub fn on_submitted(&mut self, epoch: u64, task_id: TaskId) -> Transition {
        if epoch != self.epoch {
            return Transition::Stale;
        }
        self.task_id = Some(task_id);
        self.phase = TaskPhase::Pending;
        Transition::Updated {
            phase: TaskPhase::Pending,
            changed: true,
        }
    }

    /// Submission `epoch` failed; no task exists.
    pub fn on_submit_failed(&mut self, epoch: u64) -> Transition {
        if epoch != self.epoch {
            return Transition::Stale;
        }
        self.generating = false;
        self.phase = TaskPhase::None;
        Transition::Terminal(TaskPhase::None)
    }

    /// `true` when a response for (`epoch`, `task_id`) may still change state.
    pub fn is_current(&self, epoch: u64, task_id: &str) -> bool {
        epoch == self.epoch
            && self.generating
            && !self.phase.is_terminal()
            && self.task_id.as_deref() == Some(task_id)
    }

    /// A poll reported `status`. `images` are only kept on success.
    pub fn on_status(
        &mut self,
        epoch: u64,
        task_id: &str,
        status: TaskStatus,
        images: Vec<GeneratedImage>,
    ) -> Transition {
        if !self.is_current(epoch, task_id) {
            return Transition::Stale;
        }
        let phase = TaskPhase::from(status);
        let changed = phase != self.phase;
        self.phase = phase;

        if !phase.is_terminal() {
            return Transition::Updated { phase, changed };
        }

        self.generating = false;
        if phase == TaskPhase::Success {
            self.images = images;
        } else {
            self.images.clear();
        }
        Transition::Terminal(phase)
    }

    /// A poll failed: the task is marked failed and its images cleared.
    pub fn on_poll_error(&mut self, epoch: u64, task_id: &str) -> Transition {
        if !self.is_current(epoch, task_id) {
            return Transition::Stale;
        }
        self.phase = TaskPhase::Failed;
        self.images.clear();
        self.generating = false;
        Transition::Terminal(TaskPhase::Failed)
    }

    /// Stop tracking the current submission without changing its phase.
    ///
    /// Bumps the epoch so any in-flight response is discarded.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.generating = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn running(task_id: &str) -> (GenerationTask, u64) {
        let mut task = GenerationTask::default();
        let epoch = task.begin();
        task.on_submitted(epoch, task_id.into());
        (task, epoch)
    }

    fn image(url: &str) -> GeneratedImage {
        GeneratedImage::new(1, 0, url.into())
    }

    // -- begin / on_submitted --

    #[test]
    fn begin_resets_and_bumps_epoch() {
        let (mut task, epoch) = running("t1");
        task.on_status(epoch, "t1", TaskStatus::Success, vec![image("a")]);
        assert_eq!(task.images.len(), 1);

        let next = task.begin();
        assert_eq!(next, epoch + 1);
        assert!(task.images.is_empty());
        assert_eq!(task.task_id, None);
        assert_eq!(task.phase, TaskPhase::None);
        assert!(task.generating);
    }

    #[test]
    fn submission_sets_pending() {
        let (task, _) = running("t1");
        assert_eq!(task.phase, TaskPhase::Pending);
        assert_eq!(task.task_id.as_deref(), Some("t1"));
    }

    #[test]
    fn late_acknowledgement_is_stale() {
        let mut task = GenerationTask::default();
        let first = task.begin();
        let second = task.begin();
        assert_eq!(task.on_submitted(first, "old".into()), Transition::Stale);
        assert_eq!(task.task_id, None);
        task.on_submitted(second, "new".into());
        assert_eq!(task.task_id.as_deref(), Some("new"));
    }

    #[test]
    fn submit_failure_never_reaches_pending() {
        let mut task = GenerationTask::default();
        let epoch = task.begin();
        assert_eq!(task.on_submit_failed(epoch), Transition::Terminal(TaskPhase::None));
        assert_eq!(task.phase, TaskPhase::None);
        assert!(!task.generating);
    }

    // -- on_status --

    #[test]
    fn processing_then_success() {
        let (mut task, epoch) = running("t1");
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Processing, vec![]),
            Transition::Updated { phase: TaskPhase::Processing, changed: true }
        );
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Processing, vec![]),
            Transition::Updated { phase: TaskPhase::Processing, changed: false }
        );
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Success, vec![image("a")]),
            Transition::Terminal(TaskPhase::Success)
        );
        assert_eq!(task.images, [image("a")]);
        assert!(!task.generating);
    }

    #[test]
    fn failure_clears_images() {
        let (mut task, epoch) = running("t1");
        task.on_status(epoch, "t1", TaskStatus::Failed, vec![image("a")]);
        assert_eq!(task.phase, TaskPhase::Failed);
        assert!(task.images.is_empty());
    }

    #[test]
    fn success_without_images_is_tolerated() {
        let (mut task, epoch) = running("t1");
        task.on_status(epoch, "t1", TaskStatus::Success, vec![]);
        assert_eq!(task.phase, TaskPhase::Success);
        assert!(task.images.is_empty());
    }

    #[test]
    fn stale_task_id_or_epoch_is_ignored() {
        let (mut task, epoch) = running("t2");
        let before = task.clone();
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Success, vec![image("x")]),
            Transition::Stale
        );
        assert_eq!(
            task.on_status(epoch - 1, "t2", TaskStatus::Failed, vec![]),
            Transition::Stale
        );
        assert_eq!(task.on_poll_error(epoch, "t1"), Transition::Stale);
        assert_eq!(task, before);
    }

    #[test]
    fn nothing_changes_after_terminal() {
        let (mut task, epoch) = running("t1");
        task.on_status(epoch, "t1", TaskStatus::Canceled, vec![]);
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Success, vec![image("a")]),
            Transition::Stale
        );
        assert_eq!(task.phase, TaskPhase::Canceled);
    }

    // -- on_poll_error --

    #[test]
    fn poll_error_marks_failed() {
        let (mut task, epoch) = running("t1");
        assert_eq!(task.on_poll_error(epoch, "t1"), Transition::Terminal(TaskPhase::Failed));
        assert_eq!(task.phase, TaskPhase::Failed);
        assert!(!task.generating);
    }

    // -- invalidate --

    #[test]
    fn invalidate_makes_in_flight_responses_stale() {
        let (mut task, epoch) = running("t1");
        task.invalidate();
        assert_eq!(
            task.on_status(epoch, "t1", TaskStatus::Success, vec![]),
            Transition::Stale
        );
        assert_eq!(task.phase, TaskPhase::Pending);
    }

    // -- images_from_payload --

    #[test]
    fn image_ids_combine_time_index_and_url() {
        let now = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let info = json!({"images": ["https://x/a.png", "https://x/b.png"]});
        let images = images_from_payload(Some(&info), None, now);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, "1700000000123-0-https://x/a.png");
        assert_eq!(images[1].id, "1700000000123-1-https://x/b.png");
        assert_eq!(images[1].url, "https://x/b.png");
    }
}
