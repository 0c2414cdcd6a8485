use egui::{CentralPanel, SidePanel, TopBottomPanel};

use crate::chart::ChartModel;
use crate::chart::model::TITLE;
use crate::metrics::StepMetrics;
use crate::report::format_metrics;
use crate::ui::plots::{pwm_plot, temperature_plot};

pub struct ResponseViewer {
    model: ChartModel,
    metrics: Vec<StepMetrics>,
}

impl ResponseViewer {
    pub fn new(model: ChartModel, metrics: Vec<StepMetrics>) -> Self {
        Self { model, metrics }
    }
}

impl eframe::App for ResponseViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading(TITLE);
        });

        SidePanel::right("metrics")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Step response");
                ui.separator();
                if self.metrics.is_empty() {
                    ui.label("No curve has a configured setpoint.");
                }
                for m in &self.metrics {
                    ui.monospace(format_metrics(m));
                    ui.separator();
                }
            });

        CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_height();
            temperature_plot(ui, &self.model, avail * 0.62);
            ui.separator();
            let rest = ui.available_height();
            pwm_plot(ui, &self.model, rest);
        });
    }
}

/// Open the viewer and block until its window is closed.
pub fn show(model: ChartModel, metrics: Vec<StepMetrics>) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "pidlog",
        native_options,
        Box::new(|_cc| Ok(Box::new(ResponseViewer::new(model, metrics)))),
    )
}
