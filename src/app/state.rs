use super::toast::Severity;
use crate::convert::{ConversionResult, TaskId};
use crate::staging::FileStaging;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressView {
    pub visible: bool,
    pub completed: usize,
    pub total: usize,
    pub label: String,
}

impl ProgressView {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }

    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    entries: Vec<ConversionResult>,
    successes: usize,
}

impl ResultsView {
    pub fn new(entries: Vec<ConversionResult>) -> Self {
        let successes = entries.iter().filter(|r| r.success).count();
        Self { entries, successes }
    }

    pub fn entries(&self) -> &[ConversionResult] {
        &self.entries
    }

    pub fn success_count(&self) -> usize {
        self.successes
    }

    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.successes
    }

    pub fn summary(&self) -> (Severity, String) {
        let (ok, failed) = (self.success_count(), self.failure_count());
        if ok > 0 && failed == 0 {
            (Severity::Success, format!("{} file(s) converted!", ok))
        } else if ok > 0 {
            (
                Severity::Warning,
                format!("{} succeeded, {} failed", ok, failed),
            )
        } else {
            (Severity::Error, "All conversions failed".to_string())
        }
    }

    pub fn download_all_enabled(&self) -> bool {
        self.successes > 0
    }

    /// With a single success the per-file link is enough, so the bulk action stays hidden.
    pub fn download_all_visible(&self) -> bool {
        self.successes > 1
    }

    pub(crate) fn offers(&self, pdf_filename: &str) -> bool {
        self.entries
            .iter()
            .any(|r| r.download_name() == Some(pdf_filename))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) files: FileStaging,
    pub(crate) phase: Phase,
    pub(crate) task_id: Option<TaskId>,
    pub(crate) progress: ProgressView,
    pub(crate) results: Option<ResultsView>,
    pub(crate) last_download: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &FileStaging {
        &self.files
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    pub fn progress(&self) -> &ProgressView {
        &self.progress
    }

    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn last_download(&self) -> Option<&PathBuf> {
        self.last_download.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Polling)
    }

    /// Submit and clear are disabled while a task is in flight.
    pub fn controls_enabled(&self) -> bool {
        !self.is_busy()
    }
}
