use egui::Color32;
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotPoints, VLine};

use crate::chart::ChartModel;
use crate::chart::model::{PWM_DESC, TEMP_DESC, X_DESC};

const TEMP_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const PWM_COLOR: Color32 = Color32::from_rgb(44, 160, 44);
const SETPOINT_COLORS: [Color32; 4] = [
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
];

/// Red at half opacity, matching the markers in the saved chart.
fn transition_color() -> Color32 {
    Color32::RED.gamma_multiply(0.5)
}

fn points(series: &[(f64, f64)]) -> PlotPoints<'static> {
    series.iter().map(|&(x, y)| [x, y]).collect()
}

/// Temperature over time with setpoint segments and curve-change markers.
pub fn temperature_plot(ui: &mut egui::Ui, model: &ChartModel, height: f32) {
    Plot::new("temperature_plot")
        .legend(Legend::default().position(Corner::RightBottom))
        .height(height)
        .x_axis_label(X_DESC)
        .y_axis_label(TEMP_DESC)
        .include_x(model.x_range.start)
        .include_x(model.x_range.end)
        .include_y(model.temp_range.start)
        .include_y(model.temp_range.end)
        .x_axis_formatter(|mark, _| format!("{:.0} s", mark.value))
        .y_axis_formatter(|mark, _| format!("{:.1}", mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Temperature", points(&model.temperature))
                    .color(TEMP_COLOR)
                    .width(2.0),
            );
            for (i, sp) in model.setpoints.iter().enumerate() {
                let seg = vec![[sp.t_start, sp.target_c], [sp.t_end, sp.target_c]];
                plot_ui.line(
                    Line::new(sp.label(), PlotPoints::from(seg))
                        .color(SETPOINT_COLORS[i % SETPOINT_COLORS.len()])
                        .style(LineStyle::dashed_loose())
                        .width(1.5),
                );
            }
            for marker in &model.transitions {
                plot_ui.vline(
                    VLine::new(marker.label(), marker.time_s)
                        .color(transition_color())
                        .style(LineStyle::dashed_dense()),
                );
            }
        });
}

pub fn pwm_plot(ui: &mut egui::Ui, model: &ChartModel, height: f32) {
    Plot::new("pwm_plot")
        .height(height)
        .x_axis_label(X_DESC)
        .y_axis_label(PWM_DESC)
        .include_x(model.x_range.start)
        .include_x(model.x_range.end)
        .include_y(model.pwm_range.start)
        .include_y(model.pwm_range.end)
        .x_axis_formatter(|mark, _| format!("{:.0} s", mark.value))
        .y_axis_formatter(|mark, _| format!("{:.0}", mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("PWM", points(&model.pwm))
                    .color(PWM_COLOR)
                    .width(1.5),
            );
            for marker in &model.transitions {
                plot_ui.vline(
                    VLine::new(marker.label(), marker.time_s)
                        .color(transition_color())
                        .style(LineStyle::dashed_dense()),
                );
            }
        });
}
