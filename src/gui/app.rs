//! Chart window application
//! Steps through the rendered charts one at a time. Closing the window
//! or advancing past the last chart ends the run.

use crate::charts::{RenderError, RenderedChart};
use crate::gui::ChartViewer;
use egui::{Key, ViewportCommand};
use tracing::{debug, info};

const NAV_PANEL_HEIGHT: f32 = 48.0;
const WINDOW_PADDING: f32 = 24.0;

/// Main window: the chart viewer plus a navigation bar.
pub struct ChartWindowApp {
    viewer: ChartViewer,
    titled: Option<usize>,
}

impl ChartWindowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, charts: Vec<RenderedChart>) -> Self {
        Self {
            viewer: ChartViewer::new(charts),
            titled: None,
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        if self.titled == Some(self.viewer.position()) {
            return;
        }
        if let Some(chart) = self.viewer.current() {
            ctx.send_viewport_cmd(ViewportCommand::Title(chart.kind.title().to_string()));
            debug!(chart = ?chart.kind, "Showing chart");
        }
        self.titled = Some(self.viewer.position());
    }
}

impl eframe::App for ChartWindowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_title(ctx);

        let mut advance = ctx.input(|i| {
            i.key_pressed(Key::ArrowRight) || i.key_pressed(Key::Enter) || i.key_pressed(Key::Space)
        });

        egui::TopBottomPanel::bottom("chart_navigation")
            .exact_height(NAV_PANEL_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(format!(
                        "Chart {} of {}",
                        self.viewer.position() + 1,
                        self.viewer.len()
                    ));
                    ui.add_space(16.0);
                    let label = if self.viewer.is_last() { "Close" } else { "Next ▶" };
                    if ui.button(label).clicked() {
                        advance = true;
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewer.show(ctx, ui);
        });

        if advance && !self.viewer.advance() {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }
}

/// Open a window and show `charts` in order, blocking until it closes.
pub fn show_charts(charts: Vec<RenderedChart>) -> Result<(), RenderError> {
    if charts.is_empty() {
        return Ok(());
    }

    let width = charts.iter().map(|c| c.width).max().unwrap_or(800) as f32;
    let height = charts.iter().map(|c| c.height).max().unwrap_or(600) as f32;
    let title = charts[0].kind.title();
    info!(charts = charts.len(), "Opening chart window");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                width + WINDOW_PADDING,
                height + NAV_PANEL_HEIGHT + WINDOW_PADDING,
            ])
            .with_min_inner_size([480.0, 360.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        "Play Store Insights",
        options,
        Box::new(|cc| Ok(Box::new(ChartWindowApp::new(cc, charts)))),
    )
    .map_err(|e| RenderError::Viewer(e.to_string()))
}
