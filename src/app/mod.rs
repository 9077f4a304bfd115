mod intake;
mod state;
mod toast;
mod ui;
mod update;

use crate::config::ClientConfig;
use crate::convert::{run_poll_loop, ConversionClient, IntervalTicker, PollEvent, TaskId};
use crate::error::ApiError;
use crate::staging::StagedFile;
use eframe::{egui, App};
use intake::Intake;
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use state::{Phase, ProgressView, ResultsView, Session};
pub use toast::{Severity, Toast, Toasts};
pub use update::{update, Effect, Msg, POLL_FAILED_MESSAGE};

#[derive(Clone)]
struct MsgSender {
    tx: Sender<Msg>,
    ctx: egui::Context,
}

impl MsgSender {
    fn send(&self, msg: Msg) {
        if self.tx.send(msg).is_err() {
            debug!("ui is gone, dropping background message");
        }
        self.ctx.request_repaint();
    }
}

pub struct ConverterApp {
    session: Session,
    toasts: Toasts,
    drag_active: bool,
    client: ConversionClient,
    config: ClientConfig,
    runtime: Option<Runtime>,
    sender: MsgSender,
    receiver: Receiver<Msg>,
    poll_task: Option<JoinHandle<()>>,
}

impl ConverterApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ClientConfig,
        client: ConversionClient,
        runtime: Runtime,
    ) -> Self {
        info!(server = %client.base_url(), "starting HWP to PDF converter");
        let (tx, receiver) = std_mpsc::channel();
        Self {
            session: Session::new(),
            toasts: Toasts::new(config.toast_visible(), config.toast_fade()),
            drag_active: false,
            client,
            config,
            runtime: Some(runtime),
            sender: MsgSender {
                tx,
                ctx: cc.egui_ctx.clone(),
            },
            receiver,
            poll_task: None,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let session = std::mem::take(&mut self.session);
        let (session, effects) = update(session, msg);
        self.session = session;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Notify { severity, message } => {
                self.toasts.push(severity, message, Instant::now());
            }
            Effect::Submit { files } => self.spawn_submit(files),
            Effect::StartPolling { task_id } => self.start_polling(task_id),
            Effect::StopPolling => self.stop_polling(),
            Effect::Download {
                task_id,
                pdf_filename,
            } => {
                let Some(dest) = FileDialog::new()
                    .set_file_name(pdf_filename.as_str())
                    .add_filter("PDF", &["pdf"])
                    .save_file()
                else {
                    return;
                };
                let client = self.client.clone();
                let target = dest.clone();
                self.spawn_download(dest, async move {
                    client.download(&task_id, &pdf_filename, &target).await
                });
            }
            Effect::DownloadAll { task_id } => {
                let Some(dest) = FileDialog::new()
                    .set_file_name(format!("converted_{}.zip", task_id).as_str())
                    .add_filter("ZIP archive", &["zip"])
                    .save_file()
                else {
                    return;
                };
                let client = self.client.clone();
                let target = dest.clone();
                self.spawn_download(dest, async move {
                    client.download_all(&task_id, &target).await
                });
            }
            Effect::Cleanup { task_id } => {
                let client = self.client.clone();
                let sender = self.sender.clone();
                self.spawn(async move {
                    let msg = match client.cleanup(&task_id).await {
                        Ok(()) => Msg::CleanupFinished { task_id },
                        Err(err) => Msg::CleanupFailed {
                            message: err.user_message(),
                        },
                    };
                    sender.send(msg);
                });
            }
        }
    }

    fn spawn<F>(&self, future: F) -> Option<JoinHandle<()>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => Some(runtime.spawn(future)),
            None => {
                warn!("runtime already shut down, dropping task");
                None
            }
        }
    }

    fn spawn_submit(&self, files: Vec<StagedFile>) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.spawn(async move {
            let msg = match client.submit(&files).await {
                Ok(response) => Msg::SubmitSucceeded {
                    task_id: response.task_id,
                },
                Err(err) => {
                    warn!(error = %err, "conversion request failed");
                    Msg::SubmitFailed {
                        message: err.user_message(),
                    }
                }
            };
            sender.send(msg);
        });
    }

    fn spawn_download<F>(&self, dest: PathBuf, download: F)
    where
        F: std::future::Future<Output = Result<u64, ApiError>> + Send + 'static,
    {
        let sender = self.sender.clone();
        self.spawn(async move {
            let msg = match download.await {
                Ok(_) => Msg::DownloadFinished { path: dest },
                Err(err) => {
                    warn!(error = %err, dest = %dest.display(), "download failed");
                    Msg::DownloadFailed {
                        message: format!("Download failed: {}", err.user_message()),
                    }
                }
            };
            sender.send(msg);
        });
    }

    fn start_polling(&mut self, task_id: TaskId) {
        self.stop_polling();

        let client = self.client.clone();
        let sender = self.sender.clone();
        let period = self.config.poll_interval();
        self.poll_task = self.spawn(async move {
            let mut ticker = IntervalTicker::new(period);
            run_poll_loop(&client, &mut ticker, &task_id, |event| {
                let msg = match event {
                    PollEvent::Status(report) => Msg::StatusPolled {
                        task_id: task_id.clone(),
                        report,
                    },
                    PollEvent::Failed(_) => Msg::PollFailed {
                        task_id: task_id.clone(),
                    },
                };
                sender.send(msg);
            })
            .await;
        });
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poll_task.take() {
            debug!("stopping poll loop");
            handle.abort();
        }
    }

    fn pick_files(&mut self) {
        if let Some(paths) = FileDialog::new()
            .add_filter("HWP documents", &crate::staging::ACCEPTED_EXTENSIONS)
            .pick_files()
        {
            self.stage(Intake::from_paths(paths));
        }
    }

    fn stage(&mut self, intake: Intake) {
        let now = Instant::now();
        for rejection in intake.rejected {
            self.toasts.push(Severity::Warning, rejection.to_string(), now);
        }
        for message in intake.unreadable {
            self.toasts.push(Severity::Error, message, now);
        }

        if !intake.files.is_empty() {
            self.dispatch(Msg::FilesSelected(intake.files));
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.drag_active = hovering;

        if !dropped.is_empty() {
            self.stage(Intake::from_dropped(dropped));
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.receiver.try_recv() {
            self.dispatch(msg);
        }

        self.collect_dropped_files(ctx);

        let now = Instant::now();
        self.toasts.prune(now);

        if let Some(wait) = self.toasts.next_change(now) {
            ctx.request_repaint_after(wait);
        }
        if self.session.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

impl Drop for ConverterApp {
    fn drop(&mut self) {
        self.stop_polling();
        // A blocking runtime drop is not allowed inside the eframe loop.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
