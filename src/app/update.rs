use super::state::{Phase, ProgressView, ResultsView, Session};
use super::toast::Severity;
use crate::convert::{StatusReport, TaskId};
use crate::staging::StagedFile;
use std::path::PathBuf;
use tracing::{debug, info};

pub const POLL_FAILED_MESSAGE: &str = "An error occurred while checking the conversion status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    FilesSelected(Vec<StagedFile>),
    RemoveFile(usize),
    ClearRequested,
    ConvertRequested,
    SubmitSucceeded { task_id: TaskId },
    SubmitFailed { message: String },
    StatusPolled { task_id: TaskId, report: StatusReport },
    PollFailed { task_id: TaskId },
    DownloadRequested { pdf_filename: String },
    DownloadAllRequested,
    DownloadFinished { path: PathBuf },
    DownloadFailed { message: String },
    CleanupRequested,
    CleanupFinished { task_id: TaskId },
    CleanupFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify { severity: Severity, message: String },
    Submit { files: Vec<StagedFile> },
    /// Replaces any running poll loop.
    StartPolling { task_id: TaskId },
    StopPolling,
    Download { task_id: TaskId, pdf_filename: String },
    DownloadAll { task_id: TaskId },
    Cleanup { task_id: TaskId },
}

fn notify(severity: Severity, message: impl Into<String>) -> Effect {
    Effect::Notify {
        severity,
        message: message.into(),
    }
}

pub fn update(mut session: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(candidates) => {
            let outcome = session.files.add_files(candidates);
            let mut effects: Vec<Effect> = outcome
                .rejected
                .iter()
                .map(|rejection| notify(Severity::Warning, rejection.to_string()))
                .collect();
            if outcome.added > 0 {
                effects.push(notify(
                    Severity::Success,
                    format!("{} file(s) added", outcome.added),
                ));
            }
            effects
        }
        Msg::RemoveFile(index) => match session.files.remove_file(index) {
            Some(removed) => vec![notify(
                Severity::Info,
                format!("\"{}\" removed", removed.name),
            )],
            None => Vec::new(),
        },
        Msg::ClearRequested => {
            session.files.clear();
            vec![notify(Severity::Info, "File list cleared")]
        }
        Msg::ConvertRequested => {
            if session.is_busy() {
                return (session, Vec::new());
            }
            if session.files.is_empty() {
                return (
                    session,
                    vec![notify(Severity::Warning, "Add files to convert first")],
                );
            }

            let files = session.files.files().to_vec();
            info!(count = files.len(), "conversion requested");
            session.phase = Phase::Submitting;
            session.task_id = None;
            session.results = None;
            session.progress = ProgressView {
                visible: true,
                completed: 0,
                total: files.len(),
                label: "Preparing conversion...".to_string(),
            };
            vec![Effect::StopPolling, Effect::Submit { files }]
        }
        Msg::SubmitSucceeded { task_id } => {
            if session.phase != Phase::Submitting {
                return (session, Vec::new());
            }
            session.phase = Phase::Polling;
            session.task_id = Some(task_id.clone());
            vec![
                notify(Severity::Info, "Conversion started"),
                Effect::StartPolling { task_id },
            ]
        }
        Msg::SubmitFailed { message } => {
            if session.phase != Phase::Submitting {
                return (session, Vec::new());
            }
            session.phase = Phase::Failed;
            vec![notify(Severity::Error, message)]
        }
        Msg::StatusPolled { task_id, report } => {
            if !is_current_poll(&session, &task_id) {
                debug!(task_id = %task_id, "dropping status for a stale task");
                return (session, Vec::new());
            }

            session.progress.completed = report.completed;
            session.progress.total = report.total;
            session.progress.label = "Converting...".to_string();

            if report.is_completed() {
                info!(task_id = %task_id, "conversion task completed");
                let results = ResultsView::new(report.results);
                let (severity, summary) = results.summary();
                session.phase = Phase::Completed;
                session.progress.visible = false;
                session.results = Some(results);
                vec![Effect::StopPolling, notify(severity, summary)]
            } else {
                Vec::new()
            }
        }
        Msg::PollFailed { task_id } => {
            if !is_current_poll(&session, &task_id) {
                return (session, Vec::new());
            }
            session.phase = Phase::Failed;
            vec![Effect::StopPolling, notify(Severity::Error, POLL_FAILED_MESSAGE)]
        }
        Msg::DownloadRequested { pdf_filename } => {
            match (&session.task_id, &session.results) {
                (Some(task_id), Some(results)) if results.offers(&pdf_filename) => {
                    vec![Effect::Download {
                        task_id: task_id.clone(),
                        pdf_filename,
                    }]
                }
                _ => Vec::new(),
            }
        }
        Msg::DownloadAllRequested => match (&session.task_id, &session.results) {
            (Some(task_id), Some(results)) if results.download_all_enabled() => {
                vec![Effect::DownloadAll {
                    task_id: task_id.clone(),
                }]
            }
            _ => Vec::new(),
        },
        Msg::DownloadFinished { path } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            session.last_download = Some(path);
            vec![notify(Severity::Success, format!("Saved \"{}\"", name))]
        }
        Msg::DownloadFailed { message } => vec![notify(Severity::Error, message)],
        Msg::CleanupRequested => match (&session.task_id, session.phase) {
            (Some(task_id), Phase::Completed) => vec![Effect::Cleanup {
                task_id: task_id.clone(),
            }],
            _ => Vec::new(),
        },
        Msg::CleanupFinished { task_id } => {
            if session.task_id.as_ref() != Some(&task_id) {
                return (session, Vec::new());
            }
            session.task_id = None;
            session.results = None;
            session.phase = Phase::Idle;
            vec![notify(Severity::Info, "Converted files removed from the server")]
        }
        Msg::CleanupFailed { message } => vec![notify(Severity::Error, message)],
    };

    (session, effects)
}

fn is_current_poll(session: &Session, task_id: &TaskId) -> bool {
    session.phase == Phase::Polling && session.task_id.as_ref() == Some(task_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConversionResult, TaskStatus};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn file(name: &str, size: usize) -> StagedFile {
        StagedFile::from_bytes(name, Arc::from(vec![1u8; size]))
    }

    fn apply(session: Session, msgs: Vec<Msg>) -> (Session, Vec<Effect>) {
        let mut session = session;
        let mut all = Vec::new();
        for msg in msgs {
            let (next, effects) = update(session, msg);
            session = next;
            all.extend(effects);
        }
        (session, all)
    }

    fn notifications(effects: &[Effect]) -> Vec<(Severity, String)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify { severity, message } => Some((*severity, message.clone())),
                _ => None,
            })
            .collect()
    }

    fn report(completed: usize, total: usize, status: TaskStatus) -> StatusReport {
        StatusReport {
            completed,
            total,
            status,
            results: Vec::new(),
        }
    }

    fn ok(name: &str) -> ConversionResult {
        ConversionResult {
            success: true,
            filename: name.to_string(),
            pdf_filename: Some(format!("{name}.pdf")),
            error: None,
        }
    }

    fn failed(name: &str) -> ConversionResult {
        ConversionResult {
            success: false,
            filename: name.to_string(),
            pdf_filename: None,
            error: Some("unsupported object".to_string()),
        }
    }

    /// A session that has submitted three files and is polling task `t1`.
    fn polling_session() -> Session {
        let (session, _) = apply(
            Session::new(),
            vec![
                Msg::FilesSelected(vec![file("a.hwp", 1), file("b.hwp", 2), file("c.hwpx", 3)]),
                Msg::ConvertRequested,
                Msg::SubmitSucceeded {
                    task_id: TaskId::new("t1"),
                },
            ],
        );
        assert_eq!(session.phase(), Phase::Polling);
        session
    }

    fn complete_with(results: Vec<ConversionResult>) -> (Session, Vec<Effect>) {
        let total = results.len();
        let mut last = report(total, total, TaskStatus::Completed);
        last.results = results;
        update(
            polling_session(),
            Msg::StatusPolled {
                task_id: TaskId::new("t1"),
                report: last,
            },
        )
    }

    #[test]
    fn adding_files_warns_per_rejection_and_summarises_additions() {
        let (session, effects) = update(
            Session::new(),
            Msg::FilesSelected(vec![file("a.pdf", 1), file("b.hwp", 1), file("c.hwpx", 1)]),
        );

        assert_eq!(session.files().len(), 2);
        assert_eq!(
            notifications(&effects),
            vec![
                (
                    Severity::Warning,
                    "\"a.pdf\" is not a supported format".to_string()
                ),
                (Severity::Success, "2 file(s) added".to_string()),
            ]
        );
    }

    #[test]
    fn all_rejected_batch_only_warns() {
        let (session, _) = update(Session::new(), Msg::FilesSelected(vec![file("a.hwp", 1)]));
        let (session, effects) = update(session, Msg::FilesSelected(vec![file("a.hwp", 1)]));

        assert_eq!(session.files().len(), 1);
        assert_eq!(
            notifications(&effects),
            vec![(
                Severity::Warning,
                "\"a.hwp\" has already been added".to_string()
            )]
        );
    }

    #[test]
    fn remove_and_clear_notify() {
        let (session, _) = update(
            Session::new(),
            Msg::FilesSelected(vec![file("a.hwp", 1), file("b.hwp", 1)]),
        );
        let (session, effects) = update(session, Msg::RemoveFile(0));
        assert_eq!(
            notifications(&effects),
            vec![(Severity::Info, "\"a.hwp\" removed".to_string())]
        );

        let (session, effects) = update(session, Msg::RemoveFile(5));
        assert!(effects.is_empty());

        let (session, effects) = update(session, Msg::ClearRequested);
        assert!(session.files().is_empty());
        assert_eq!(notifications(&effects).len(), 1);
    }

    #[test]
    fn convert_with_no_files_does_nothing_but_warn() {
        let (session, effects) = update(Session::new(), Msg::ConvertRequested);

        assert_eq!(
            effects,
            vec![Effect::Notify {
                severity: Severity::Warning,
                message: "Add files to convert first".to_string(),
            }]
        );
        assert!(session.controls_enabled());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.progress().visible);
    }

    #[test]
    fn convert_cancels_old_poll_before_submitting() {
        let (session, _) = update(Session::new(), Msg::FilesSelected(vec![file("a.hwp", 7)]));
        let (session, effects) = update(session, Msg::ConvertRequested);

        assert_eq!(
            effects,
            vec![
                Effect::StopPolling,
                Effect::Submit {
                    files: vec![file("a.hwp", 7)]
                },
            ]
        );
        assert!(!session.controls_enabled());
        assert_eq!(session.progress().counter_text(), "0 / 1");
        assert_eq!(session.progress().label, "Preparing conversion...");
        assert!(session.results().is_none());
    }

    #[test]
    fn convert_is_ignored_while_busy() {
        let (session, effects) = update(polling_session(), Msg::ConvertRequested);
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Polling);
    }

    #[test]
    fn submit_success_starts_polling() {
        let (session, _) = update(Session::new(), Msg::FilesSelected(vec![file("a.hwp", 1)]));
        let (session, _) = update(session, Msg::ConvertRequested);
        let (session, effects) = update(
            session,
            Msg::SubmitSucceeded {
                task_id: TaskId::new("t9"),
            },
        );

        assert_eq!(session.task_id(), Some(&TaskId::new("t9")));
        assert!(effects.contains(&Effect::StartPolling {
            task_id: TaskId::new("t9")
        }));
    }

    #[test]
    fn submit_failure_reenables_controls_and_reports_message() {
        let (session, _) = update(Session::new(), Msg::FilesSelected(vec![file("a.hwp", 1)]));
        let (session, _) = update(session, Msg::ConvertRequested);
        let (session, effects) = update(
            session,
            Msg::SubmitFailed {
                message: "No valid HWP/HWPX files".to_string(),
            },
        );

        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.controls_enabled());
        assert_eq!(
            notifications(&effects),
            vec![(Severity::Error, "No valid HWP/HWPX files".to_string())]
        );
        assert!(!effects.iter().any(|e| matches!(e, Effect::StartPolling { .. })));
    }

    #[test]
    fn progress_reaches_total_before_results_render() {
        let task_id = TaskId::new("t1");
        let mut session = polling_session();

        let (next, effects) = update(
            session,
            Msg::StatusPolled {
                task_id: task_id.clone(),
                report: report(0, 3, TaskStatus::Pending),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(next.progress().counter_text(), "0 / 3");
        session = next;

        let (next, effects) = update(
            session,
            Msg::StatusPolled {
                task_id: task_id.clone(),
                report: report(2, 3, TaskStatus::InProgress),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(next.progress().counter_text(), "2 / 3");
        assert_eq!(next.progress().label, "Converting...");
        assert!(next.results().is_none());
        session = next;

        let mut last = report(3, 3, TaskStatus::Completed);
        last.results = vec![ok("a"), ok("b"), ok("c")];
        let (session, effects) = update(
            session,
            Msg::StatusPolled {
                task_id: task_id.clone(),
                report: last,
            },
        );

        assert_eq!(session.progress().counter_text(), "3 / 3");
        assert_eq!(session.progress().fraction(), 1.0);
        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.controls_enabled());
        assert_eq!(session.results().unwrap().entries().len(), 3);
        assert_eq!(effects[0], Effect::StopPolling);

        // The loop is gone; a late duplicate changes nothing.
        let (session, effects) = update(
            session,
            Msg::StatusPolled {
                task_id,
                report: report(3, 3, TaskStatus::Completed),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(session.results().unwrap().entries().len(), 3);
    }

    #[test]
    fn partial_success_enables_and_shows_bulk_download() {
        let (session, effects) = complete_with(vec![ok("a"), failed("b"), ok("c")]);
        let results = session.results().unwrap();

        assert_eq!(
            notifications(&effects),
            vec![(Severity::Warning, "2 succeeded, 1 failed".to_string())]
        );
        assert!(results.download_all_enabled());
        assert!(results.download_all_visible());
        let without_link = results
            .entries()
            .iter()
            .filter(|r| r.download_name().is_none())
            .count();
        assert_eq!(without_link, 1);
    }

    #[test]
    fn single_success_hides_bulk_download_but_keeps_the_link() {
        let (session, effects) = complete_with(vec![ok("only")]);
        let results = session.results().unwrap();

        assert_eq!(
            notifications(&effects),
            vec![(Severity::Success, "1 file(s) converted!".to_string())]
        );
        assert!(results.download_all_enabled());
        assert!(!results.download_all_visible());
        assert_eq!(results.entries()[0].download_name(), Some("only.pdf"));
    }

    #[test]
    fn all_failures_report_an_error_summary() {
        let (_, effects) = complete_with(vec![failed("a"), failed("b")]);
        assert_eq!(
            notifications(&effects),
            vec![(Severity::Error, "All conversions failed".to_string())]
        );
    }

    #[test]
    fn poll_failure_stops_loop_and_restores_controls() {
        let (session, effects) = update(
            polling_session(),
            Msg::PollFailed {
                task_id: TaskId::new("t1"),
            },
        );

        assert_eq!(
            effects,
            vec![
                Effect::StopPolling,
                Effect::Notify {
                    severity: Severity::Error,
                    message: POLL_FAILED_MESSAGE.to_string(),
                },
            ]
        );
        assert!(session.controls_enabled());
        assert!(session.results().is_none());
    }

    #[test]
    fn messages_for_another_task_are_dropped() {
        let (session, effects) = update(
            polling_session(),
            Msg::StatusPolled {
                task_id: TaskId::new("old"),
                report: report(5, 5, TaskStatus::Completed),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Polling);
        assert_eq!(session.progress().counter_text(), "0 / 3");

        let (session, effects) = update(
            session,
            Msg::PollFailed {
                task_id: TaskId::new("old"),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Polling);
    }

    #[test]
    fn downloads_only_target_offered_outputs() {
        let (session, _) = complete_with(vec![ok("a"), failed("b")]);

        let (session, effects) = update(
            session,
            Msg::DownloadRequested {
                pdf_filename: "a.pdf".to_string(),
            },
        );
        assert_eq!(
            effects,
            vec![Effect::Download {
                task_id: TaskId::new("t1"),
                pdf_filename: "a.pdf".to_string(),
            }]
        );

        let (session, effects) = update(
            session,
            Msg::DownloadRequested {
                pdf_filename: "b.pdf".to_string(),
            },
        );
        assert!(effects.is_empty());

        let (_, effects) = update(session, Msg::DownloadAllRequested);
        assert_eq!(
            effects,
            vec![Effect::DownloadAll {
                task_id: TaskId::new("t1")
            }]
        );
    }

    #[test]
    fn download_all_without_successes_is_ignored() {
        let (session, _) = complete_with(vec![failed("a")]);
        let (_, effects) = update(session, Msg::DownloadAllRequested);
        assert!(effects.is_empty());
    }

    #[test]
    fn finished_download_is_remembered() {
        let (session, effects) = update(
            Session::new(),
            Msg::DownloadFinished {
                path: PathBuf::from("/tmp/out/a.pdf"),
            },
        );
        assert_eq!(session.last_download(), Some(&PathBuf::from("/tmp/out/a.pdf")));
        assert_eq!(
            notifications(&effects),
            vec![(Severity::Success, "Saved \"a.pdf\"".to_string())]
        );
    }

    #[test]
    fn cleanup_forgets_the_task() {
        let (session, _) = complete_with(vec![ok("a")]);
        let (session, effects) = update(session, Msg::CleanupRequested);
        assert_eq!(
            effects,
            vec![Effect::Cleanup {
                task_id: TaskId::new("t1")
            }]
        );

        let (session, _) = update(
            session,
            Msg::CleanupFinished {
                task_id: TaskId::new("t1"),
            },
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.task_id().is_none());
        assert!(session.results().is_none());
    }

    #[test]
    fn cleanup_is_only_offered_after_completion() {
        let (_, effects) = update(polling_session(), Msg::CleanupRequested);
        assert!(effects.is_empty());
    }
}
