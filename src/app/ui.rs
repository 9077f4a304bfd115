use super::{ConverterApp, Msg, Severity};
use egui::{Align, Align2, Color32, RichText};
use std::path::PathBuf;
use std::time::Instant;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);

enum UiAction {
    Send(Msg),
    PickFiles,
    Open(PathBuf),
}

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Success => Color32::from_rgb(34, 139, 34),
        Severity::Error => Color32::from_rgb(190, 40, 40),
        Severity::Warning => Color32::from_rgb(205, 140, 0),
        Severity::Info => Color32::from_rgb(40, 110, 200),
    }
}

impl ConverterApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("HWP → PDF Converter");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Convert Hangul documents (.hwp, .hwpx) to PDF")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_drop_zone(ui, &mut actions);

                if self.session.files().is_visible() {
                    ui.add_space(20.0);
                    self.render_file_list(ui, &mut actions);
                }

                if self.session.progress().visible {
                    ui.add_space(20.0);
                    self.render_progress(ui);
                }

                if self.session.results().is_some() {
                    ui.add_space(20.0);
                    self.render_results(ui, &mut actions);
                }

                ui.add_space(20.0);
            });
        });

        self.render_toasts(ctx);

        for action in actions {
            match action {
                UiAction::Send(msg) => self.dispatch(msg),
                UiAction::PickFiles => self.pick_files(),
                UiAction::Open(path) => {
                    if let Err(e) = open::that(&path) {
                        self.toasts.push(
                            Severity::Error,
                            format!("Failed to open {}: {}", path.display(), e),
                            Instant::now(),
                        );
                    }
                }
            }
        }
    }

    fn render_drop_zone(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let stroke_color = if self.drag_active {
            ACCENT
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };
        let fill = if self.drag_active {
            ACCENT.gamma_multiply(0.15)
        } else {
            ui.visuals().extreme_bg_color
        };

        let response = egui::Frame::none()
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .rounding(8.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📄").size(32.0));
                    ui.label(if self.drag_active {
                        "Release to add the files"
                    } else {
                        "Drop HWP/HWPX files here or click to choose"
                    });
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() {
            actions.push(UiAction::PickFiles);
        }
    }

    fn render_file_list(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let controls_enabled = self.session.controls_enabled();

        ui.group(|ui| {
            ui.label(format!("Selected files ({})", self.session.files().len()));
            ui.add_space(8.0);

            for row in self.session.files().rows() {
                ui.horizontal(|ui| {
                    ui.label("📄");
                    ui.label(&row.name);
                    ui.label(
                        RichText::new(&row.size_label)
                            .color(ui.visuals().text_color().gamma_multiply(0.6)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("✕").on_hover_text("Remove").clicked() {
                            actions.push(UiAction::Send(Msg::RemoveFile(row.index)));
                        }
                    });
                });
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(controls_enabled, egui::Button::new("🗑 Clear list"))
                    .clicked()
                {
                    actions.push(UiAction::Send(Msg::ClearRequested));
                }

                let convert =
                    egui::Button::new("📤 Convert to PDF").min_size(egui::vec2(200.0, 36.0));
                if ui.add_enabled(controls_enabled, convert).clicked() {
                    actions.push(UiAction::Send(Msg::ConvertRequested));
                }
            });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        let progress = self.session.progress();
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(&progress.label);
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    ui.label(progress.counter_text());
                });
            });
            ui.add(
                egui::ProgressBar::new(progress.fraction())
                    .animate(self.session.is_busy())
                    .fill(ACCENT),
            );
        });
    }

    fn render_results(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(results) = self.session.results() else {
            return;
        };

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Conversion results").strong());
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if results.download_all_visible()
                        && ui
                            .add_enabled(
                                results.download_all_enabled(),
                                egui::Button::new("📦 Download all"),
                            )
                            .clicked()
                    {
                        actions.push(UiAction::Send(Msg::DownloadAllRequested));
                    }
                });
            });
            ui.add_space(8.0);

            for result in results.entries() {
                ui.horizontal(|ui| match result.download_name() {
                    Some(pdf_filename) => {
                        ui.colored_label(SUCCESS, "✓");
                        ui.label(&result.filename);
                        ui.colored_label(SUCCESS, "Converted");
                        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                            if ui.button("📥 Download").clicked() {
                                actions.push(UiAction::Send(Msg::DownloadRequested {
                                    pdf_filename: pdf_filename.to_string(),
                                }));
                            }
                        });
                    }
                    None => {
                        ui.colored_label(FAILURE, "✕");
                        ui.label(&result.filename);
                        ui.colored_label(FAILURE, result.error_text());
                    }
                });
                ui.add_space(4.0);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if let Some(path) = self.session.last_download() {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    if ui.button(format!("📂 Open {}", name)).clicked() {
                        actions.push(UiAction::Open(path.clone()));
                    }
                }
                if ui
                    .button("🧹 Clean up on server")
                    .on_hover_text("Delete the converted files kept by the server")
                    .clicked()
                {
                    actions.push(UiAction::Send(Msg::CleanupRequested));
                }
            });
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }

        let now = Instant::now();
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.toasts.iter() {
                    let alpha = self.toasts.opacity(toast, now);
                    egui::Frame::none()
                        .fill(severity_color(toast.severity).gamma_multiply(alpha))
                        .rounding(6.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.colored_label(
                                Color32::WHITE.gamma_multiply(alpha),
                                format!("{} {}", toast.severity.icon(), toast.message),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }
}
