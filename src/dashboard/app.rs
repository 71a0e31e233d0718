//! Dashboard application entry point

use eframe::egui;
use tracing::{debug, info};

use crate::controller::{Controller, Notice, UserEvent};
use crate::dashboard::components::{render_busy, render_notice};
use crate::dashboard::state::DashboardState;
use crate::dashboard::theme;
use crate::dashboard::views::{
    render_annotated_view, render_extraction_view, render_translation_view, render_upload_view,
};
use crate::session::Session;

/// The main dashboard application
pub struct DashboardApp {
    /// Applies user events to the session
    controller: Controller,
    /// Everything produced for this window's user
    session: Session,
    /// Dashboard-specific state
    dashboard_state: DashboardState,
    /// Whether theme has been applied
    theme_applied: bool,
}

impl DashboardApp {
    /// Create a new dashboard application, optionally with an upload queued
    pub fn new(controller: Controller, session: Session, initial_upload: Option<UserEvent>) -> Self {
        let mut dashboard_state = DashboardState::default();
        if let Some(event) = initial_upload {
            dashboard_state.queue(event);
        }

        Self {
            controller,
            session,
            dashboard_state,
            theme_applied: false,
        }
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 800.0])
                .with_min_inner_size([700.0, 500.0])
                .with_drag_and_drop(true)
                .with_title("LingoLens"),
            ..Default::default()
        }
    }

    /// Apply an event now and keep its notice for display
    fn dispatch(&mut self, event: UserEvent) {
        let notice = self.controller.handle(&mut self.session, event);
        self.dashboard_state.notice = Some(notice);
    }

    /// Queue files dropped onto the window as uploads
    fn process_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        // Only the first file counts; the page holds one image
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let event = if let Some(bytes) = file.bytes {
            Ok(UserEvent::Upload {
                name: file.name,
                bytes: bytes.to_vec(),
            })
        } else if let Some(path) = file.path {
            crate::app::read_upload(&path)
        } else {
            return;
        };

        match event {
            Ok(event) => self.dashboard_state.queue(event),
            Err(e) => self.dashboard_state.notice = Some(Notice::Error(format!("{:#}", e))),
        }
    }

    /// Run the queued action once a frame with its spinner has been shown
    fn process_pending_action(&mut self, ctx: &egui::Context) {
        let Some(mut pending) = self.dashboard_state.pending.take() else {
            return;
        };

        if !pending.spinner_shown {
            pending.spinner_shown = true;
            self.dashboard_state.pending = Some(pending);
            ctx.request_repaint();
            return;
        }

        debug!("Running queued action: {}", pending.label());
        self.dispatch(pending.event);
        ctx.request_repaint();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.process_dropped_files(ctx);
        self.process_pending_action(ctx);

        let mut language_change = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                egui::Frame::none().inner_margin(24.0).show(ui, |ui| {
                    let state = &mut self.dashboard_state;
                    let session = &self.session;

                    render_upload_view(ui, session, state);

                    ui.add_space(8.0);
                    if let Some(pending) = &state.pending {
                        render_busy(ui, pending.label());
                    } else if let Some(notice) = &state.notice {
                        render_notice(ui, notice);
                    }
                    ui.add_space(8.0);

                    render_extraction_view(ui, session, state);
                    language_change = render_translation_view(ui, session, state);
                    render_annotated_view(ui, session, state);
                });
            });
        });

        if let Some(event) = language_change {
            self.dispatch(event);
        }
    }
}

/// Run the dashboard application
pub fn run_dashboard(
    controller: Controller,
    session: Session,
    initial_upload: Option<UserEvent>,
) -> Result<(), eframe::Error> {
    info!("Opening dashboard for session {}", session.id());
    let app = DashboardApp::new(controller, session, initial_upload);
    eframe::run_native(
        "LingoLens",
        DashboardApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
