use std::error::Error;
use std::fs::create_dir_all;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::model::{ChartModel, PWM_DESC, TEMP_DESC, TITLE, X_DESC};

pub const TEMP_COLOR: RGBColor = RGBColor(31, 119, 180);
pub const PWM_COLOR: RGBColor = RGBColor(44, 160, 44);
pub const SETPOINT_COLORS: [RGBColor; 4] = [
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
];

/// Render the chart to `path`. `.svg` selects the SVG backend, anything else
/// is written as a bitmap.
pub fn render(model: &ChartModel, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        draw_chart(SVGBackend::new(path, size).into_drawing_area(), model)?;
    } else {
        draw_chart(BitMapBackend::new(path, size).into_drawing_area(), model)?;
    }

    info!("chart saved to {}", path.display());
    Ok(())
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, model: &ChartModel) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(model.x_range.clone(), model.temp_range.clone())?
        .set_secondary_coord(model.x_range.clone(), model.pwm_range.clone());

    chart
        .configure_mesh()
        .x_desc(X_DESC)
        .y_desc(TEMP_DESC)
        .y_labels(model.temp_tick_count())
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(PWM_DESC)
        .label_style(("sans-serif", 13).into_font().color(&PWM_COLOR))
        .draw()?;

    chart.draw_secondary_series(LineSeries::new(
        model.pwm.iter().copied(),
        PWM_COLOR.mix(0.6).stroke_width(2),
    ))?;

    chart
        .draw_series(LineSeries::new(
            model.temperature.iter().copied(),
            TEMP_COLOR.stroke_width(2),
        ))?
        .label("Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TEMP_COLOR.stroke_width(2)));

    for (i, line) in model.setpoints.iter().enumerate() {
        let color = SETPOINT_COLORS[i % SETPOINT_COLORS.len()];
        chart
            .draw_series(DashedLineSeries::new(
                vec![(line.t_start, line.target_c), (line.t_end, line.target_c)],
                8,
                5,
                color.stroke_width(2),
            ))?
            .label(line.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    let y_lo = model.temp_range.start;
    let y_hi = model.temp_range.end;
    let x_nudge = (model.x_range.end - model.x_range.start) * 0.004;
    for marker in &model.transitions {
        chart.draw_series(DashedLineSeries::new(
            vec![(marker.time_s, y_lo), (marker.time_s, y_hi)],
            6,
            4,
            RED.mix(0.5).stroke_width(1),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            marker.label(),
            (marker.time_s + x_nudge, y_hi),
            ("sans-serif", 14)
                .into_font()
                .color(&RED)
                .pos(Pos::new(HPos::Left, VPos::Top)),
        )))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 13))
        .draw()?;

    root.present()?;
    Ok(())
}
