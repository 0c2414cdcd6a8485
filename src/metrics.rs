use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::log_data::{ProcessLog, Sample};

/// Target temperature for one curve of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setpoint {
    pub curve: u32,
    pub target_c: f64,
}

/// A curve counts as settled once `window` consecutive samples stay within
/// `band_c` of the setpoint. A `window` of 0 is treated as 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleCriteria {
    pub band_c: f64,
    pub window: usize,
}

impl Default for SettleCriteria {
    fn default() -> Self {
        Self {
            band_c: 1.0,
            window: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepMetrics {
    pub curve: u32,
    pub setpoint_c: f64,
    /// Peak temperature minus setpoint; negative when the setpoint was never reached.
    pub overshoot_c: f64,
    /// Seconds from the curve's first sample to the first sample at or above the setpoint.
    pub rise_time_s: Option<f64>,
    /// Log timestamp at which the first settled window starts.
    pub settled_at_s: Option<f64>,
    pub mean_abs_error_c: f64,
    pub samples: usize,
}

impl StepMetrics {
    pub fn compute(
        curve: u32,
        setpoint_c: f64,
        samples: &[Sample],
        criteria: SettleCriteria,
    ) -> Option<Self> {
        let first = samples.first()?;

        let peak = samples
            .iter()
            .map(|s| s.temp_c)
            .fold(f64::NEG_INFINITY, f64::max);

        let rise_time_s = samples
            .iter()
            .find(|s| s.temp_c >= setpoint_c)
            .map(|s| s.time_s - first.time_s);

        let settled_at_s = settle_start(samples, setpoint_c, criteria).map(|i| samples[i].time_s);

        let mean_abs_error_c = samples
            .iter()
            .map(|s| (s.temp_c - setpoint_c).abs())
            .sum::<f64>()
            / samples.len() as f64;

        let metrics = Self {
            curve,
            setpoint_c,
            overshoot_c: peak - setpoint_c,
            rise_time_s,
            settled_at_s,
            mean_abs_error_c,
            samples: samples.len(),
        };
        debug!(?metrics, "step response");
        Some(metrics)
    }
}

/// Index of the first sample that opens a settled window.
///
/// Candidate starts run over `0..len - window`, so the last full window of the
/// curve is never examined and a curve needs more than `window` samples to
/// settle at all.
fn settle_start(samples: &[Sample], setpoint_c: f64, criteria: SettleCriteria) -> Option<usize> {
    let window = criteria.window.max(1);
    let in_band: Vec<bool> = samples
        .iter()
        .map(|s| (s.temp_c - setpoint_c).abs() <= criteria.band_c)
        .collect();

    // Length of the in-band run starting at each index, built back to front.
    let mut run = vec![0usize; in_band.len() + 1];
    for i in (0..in_band.len()).rev() {
        run[i] = if in_band[i] { run[i + 1] + 1 } else { 0 };
    }

    (0..in_band.len().saturating_sub(window)).find(|&i| run[i] >= window)
}

/// Metrics for every configured setpoint whose curve appears in the log.
pub fn compute_all(
    log: &ProcessLog,
    setpoints: &[Setpoint],
    criteria: SettleCriteria,
) -> Vec<StepMetrics> {
    for id in log.curve_ids() {
        if !setpoints.iter().any(|sp| sp.curve == id) {
            warn!("curve {id} has no configured setpoint; skipping");
        }
    }

    setpoints
        .iter()
        .filter_map(|sp| {
            let samples = log.curve(sp.curve);
            if samples.is_empty() {
                debug!("curve {} not present in log", sp.curve);
            }
            StepMetrics::compute(sp.curve, sp.target_c, &samples, criteria)
        })
        .collect()
}
