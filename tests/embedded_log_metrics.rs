use pidlog::config::AppConfig;
use pidlog::log_data::ProcessLog;
use pidlog::metrics::{SettleCriteria, Setpoint, StepMetrics, compute_all};

fn assert_close(a: f64, b: f64, label: &str) {
    let diff = (a - b).abs();
    assert!(diff <= 1e-6, "{label} mismatch: {a} vs {b}");
}

#[test]
fn embedded_log_has_two_curves() {
    let log = ProcessLog::embedded().expect("embedded log parses");
    assert_eq!(log.len(), 164);
    assert_eq!(log.curve_ids(), vec![1, 2]);
    assert_eq!(log.curve(1).len(), 90);
    assert_eq!(log.curve(2).len(), 74);

    let (t0, t1) = log.time_range();
    assert_eq!((t0, t1), (11.0, 182.0));
    assert_eq!(log.pwm_max(), 1023.0);
}

#[test]
fn embedded_log_step_response() {
    let log = ProcessLog::embedded().unwrap();
    let cfg = AppConfig::default();
    let results = compute_all(&log, &cfg.setpoints, cfg.analysis.settle_criteria());
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.curve, 1);
    assert_eq!(first.setpoint_c, 67.0);
    assert_close(first.overshoot_c, 9.5, "curve 1 overshoot");
    assert_eq!(first.rise_time_s, Some(13.0));
    assert_eq!(first.settled_at_s, Some(43.0));
    assert_close(first.mean_abs_error_c, 4.853222, "curve 1 mae");
    assert_eq!(first.samples, 90);

    let second = &results[1];
    assert_eq!(second.curve, 2);
    assert_close(second.overshoot_c, 1.32, "curve 2 overshoot");
    assert_eq!(second.rise_time_s, Some(21.0));
    assert_eq!(second.settled_at_s, Some(123.0));
    assert_close(second.mean_abs_error_c, 2.304865, "curve 2 mae");
}

#[test]
fn unconfigured_curves_are_skipped() {
    let log = ProcessLog::embedded().unwrap();
    let setpoints = [
        Setpoint {
            curve: 2,
            target_c: 76.0,
        },
        Setpoint {
            curve: 9,
            target_c: 50.0,
        },
    ];
    let results = compute_all(&log, &setpoints, SettleCriteria::default());
    let curves: Vec<u32> = results.iter().map(|m| m.curve).collect();
    assert_eq!(curves, vec![2]);
}

#[test]
fn tighter_band_settles_later_or_never() {
    let log = ProcessLog::embedded().unwrap();
    let samples = log.curve(1);
    let loose = StepMetrics::compute(1, 67.0, &samples, SettleCriteria::default()).unwrap();
    let tight = StepMetrics::compute(
        1,
        67.0,
        &samples,
        SettleCriteria {
            band_c: 0.1,
            window: 10,
        },
    )
    .unwrap();
    assert_eq!(loose.settled_at_s, Some(43.0));
    assert_eq!(tight.settled_at_s, None);
}
