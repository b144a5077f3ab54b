//! Wire types for the remote job API.
//!
//! Every response is wrapped in an envelope `{"code", "message", "data"}`;
//! `code == 0` means success regardless of the HTTP status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JobApiError;

pub const MEDIA_TYPE_IMAGE: &str = "image";
pub const SCENE_IMAGE_TO_IMAGE: &str = "image-to-image";

/// Body of `POST /api/ai/generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub media_type: String,
    pub scene: String,
    pub provider: String,
    pub model: String,
    /// JSON-encoded prompt payload.
    pub prompt: String,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub image_input: Vec<String>,
}

/// Body of `POST /api/ai/query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub task_id: String,
}

/// Common response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// The payload when `code == 0`, otherwise an application error
    /// carrying the server message (or `fallback` when it is empty).
    pub fn into_result(self, fallback: &str) -> Result<Option<T>, JobApiError> {
        if self.code == Some(0) {
            return Ok(self.data);
        }
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(JobApiError::Application(message))
    }
}

/// `data` of a generate response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedTask {
    #[serde(default)]
    pub id: Option<Value>,
}

impl CreatedTask {
    /// The task id as a string; numeric ids are accepted, empty ones are not.
    pub fn task_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `data` of a query response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub task_info: Option<Value>,
    #[serde(default)]
    pub task_result: Option<Value>,
}

impl TaskSnapshot {
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Parsed status; `None` when absent or unrecognised.
    pub fn parsed_status(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(TaskStatus::parse)
    }
}

/// Status reported by the job API for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Case-insensitive parse; the British `cancelled` is accepted too.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    // -- ApiEnvelope::into_result --

    #[test]
    fn zero_code_yields_data() {
        let env: ApiEnvelope<CreatedTask> =
            serde_json::from_value(json!({"code": 0, "data": {"id": "t-1"}})).unwrap();
        let data = env.into_result("fallback").unwrap().unwrap();
        assert_eq!(data.task_id().as_deref(), Some("t-1"));
    }

    #[test]
    fn non_zero_code_uses_server_message() {
        let env: ApiEnvelope<CreatedTask> =
            serde_json::from_value(json!({"code": 1, "message": "no credits"})).unwrap();
        assert_matches!(
            env.into_result("fallback"),
            Err(JobApiError::Application(m)) if m == "no credits"
        );
    }

    #[test]
    fn missing_code_or_message_uses_fallback() {
        let env: ApiEnvelope<TaskSnapshot> = serde_json::from_value(json!({"data": null})).unwrap();
        assert_matches!(
            env.into_result("Failed to query task"),
            Err(JobApiError::Application(m)) if m == "Failed to query task"
        );
    }

    // -- CreatedTask::task_id --

    #[test]
    fn task_id_shapes() {
        let id = |v| CreatedTask { id: Some(v) }.task_id();
        assert_eq!(id(json!("abc")), Some("abc".into()));
        assert_eq!(id(json!(42)), Some("42".into()));
        assert_eq!(id(json!("")), None);
        assert_eq!(id(json!(null)), None);
        assert_eq!(CreatedTask::default().task_id(), None);
    }

    // -- TaskStatus::parse --

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(TaskStatus::parse("SUCCESS"), Some(TaskStatus::Success));
        assert_eq!(TaskStatus::parse(" processing "), Some(TaskStatus::Processing));
        assert_eq!(TaskStatus::parse("cancelled"), Some(TaskStatus::Canceled));
        assert_eq!(TaskStatus::parse("queued"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
        assert!(TaskStatus::Success.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
    }

    // -- serialization --

    #[test]
    fn generate_request_wire_shape() {
        let req = GenerateRequest {
            media_type: MEDIA_TYPE_IMAGE.into(),
            scene: SCENE_IMAGE_TO_IMAGE.into(),
            provider: "replicate".into(),
            model: "google/nano-banana".into(),
            prompt: "{}".into(),
            options: GenerateOptions {
                image_input: vec!["u1".into()],
            },
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "mediaType": "image",
                "scene": "image-to-image",
                "provider": "replicate",
                "model": "google/nano-banana",
                "prompt": "{}",
                "options": {"image_input": ["u1"]}
            })
        );
        assert_eq!(
            serde_json::to_value(QueryRequest { task_id: "t".into() }).unwrap(),
            json!({"taskId": "t"})
        );
    }

    #[test]
    fn snapshot_reads_camel_case_fields() {
        let snap: TaskSnapshot = serde_json::from_value(json!({
            "status": "success",
            "taskInfo": "{\"images\":[\"a\"]}",
            "taskResult": null
        }))
        .unwrap();
        assert_eq!(snap.parsed_status(), Some(TaskStatus::Success));
        assert!(snap.task_info.is_some());
        assert!(snap.task_result.is_none());
    }
}
