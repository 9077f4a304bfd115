use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    #[serde(alias = "processing")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub filename: String,
    #[serde(default)]
    pub pdf_filename: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ConversionResult {
    /// Output file to offer for download; only successful entries have one.
    pub fn download_name(&self) -> Option<&str> {
        if self.success {
            self.pdf_filename.as_deref()
        } else {
            None
        }
    }

    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("Conversion failed")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub completed: usize,
    pub total: usize,
    pub status: TaskStatus,
    #[serde(default)]
    pub results: Vec<ConversionResult>,
}

impl StatusReport {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
