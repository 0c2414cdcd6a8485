use std::ops::Range;

use crate::config::ChartConfig;
use crate::log_data::ProcessLog;
use crate::metrics::Setpoint;

pub const TITLE: &str = "PID behaviour - temperature, PWM and setpoints";
pub const X_DESC: &str = "Time (s)";
pub const TEMP_DESC: &str = "Temperature (°C)";
pub const PWM_DESC: &str = "PWM output";

#[derive(Debug, Clone, PartialEq)]
pub struct SetpointLine {
    pub curve: u32,
    pub target_c: f64,
    pub t_start: f64,
    pub t_end: f64,
}

impl SetpointLine {
    pub fn label(&self) -> String {
        format!("Setpoint curve {}", self.curve)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMarker {
    pub time_s: f64,
    pub curve: u32,
}

impl TransitionMarker {
    pub fn label(&self) -> String {
        format!("Curve {}", self.curve)
    }
}

/// Everything needed to draw the chart, independent of the drawing backend.
#[derive(Debug, Clone)]
pub struct ChartModel {
    pub temperature: Vec<(f64, f64)>,
    pub pwm: Vec<(f64, f64)>,
    pub setpoints: Vec<SetpointLine>,
    pub transitions: Vec<TransitionMarker>,
    pub x_range: Range<f64>,
    pub temp_range: Range<f64>,
    pub temp_tick_c: f64,
    pub pwm_range: Range<f64>,
}

impl ChartModel {
    pub fn build(log: &ProcessLog, setpoints: &[Setpoint], cfg: &ChartConfig) -> Self {
        let temperature = log.samples.iter().map(|s| (s.time_s, s.temp_c)).collect();
        let pwm = log.samples.iter().map(|s| (s.time_s, s.pwm)).collect();

        let setpoints: Vec<SetpointLine> = setpoints
            .iter()
            .filter_map(|sp| {
                let samples = log.curve(sp.curve);
                let first = samples.first()?;
                let last = samples.last()?;
                Some(SetpointLine {
                    curve: sp.curve,
                    target_c: sp.target_c,
                    t_start: first.time_s,
                    t_end: last.time_s,
                })
            })
            .collect();

        let transitions = if log.curve_ids().len() > 1 {
            log.transitions()
                .iter()
                .map(|s| TransitionMarker {
                    time_s: s.time_s,
                    curve: s.curve,
                })
                .collect()
        } else {
            Vec::new()
        };

        let (t_min, t_max) = log.time_range();
        let x_range = if t_max > t_min {
            t_min..t_max
        } else {
            (t_min - 0.5)..(t_max + 0.5)
        };

        // Setpoint lines must stay on the axis even when the log never reaches them.
        let (temp_min, temp_max) = setpoints.iter().fold(log.temp_range(), |(lo, hi), sp| {
            (lo.min(sp.target_c), hi.max(sp.target_c))
        });
        let temp_range = tick_bounds(temp_min, temp_max, cfg.temp_tick_c);

        let pwm_top = cfg.pwm_full_scale.max(log.pwm_max()).max(1.0) * 1.05;

        Self {
            temperature,
            pwm,
            setpoints,
            transitions,
            x_range,
            temp_range,
            temp_tick_c: cfg.temp_tick_c,
            pwm_range: 0.0..pwm_top,
        }
    }

    /// Number of temperature ticks between the axis bounds, inclusive.
    pub fn temp_tick_count(&self) -> usize {
        if self.temp_tick_c <= 0.0 {
            return 10;
        }
        ((self.temp_range.end - self.temp_range.start) / self.temp_tick_c).round() as usize + 1
    }
}

/// Snap `[lo, hi]` outward to multiples of `step`, keeping a non-empty range.
pub fn tick_bounds(lo: f64, hi: f64, step: f64) -> Range<f64> {
    if step <= 0.0 || !step.is_finite() {
        return if hi > lo { lo..hi } else { (lo - 1.0)..(hi + 1.0) };
    }
    let start = (lo / step).floor() * step;
    let mut end = (hi / step).ceil() * step;
    if end <= start {
        end = start + step;
    }
    start..end
}
