use std::error::Error;
use std::fs::create_dir_all;
use std::path::Path;

use tracing::info;

use crate::metrics::StepMetrics;

pub fn format_metrics(m: &StepMetrics) -> String {
    let rise = match m.rise_time_s {
        Some(t) => format!("{t:.2} s"),
        None => "did not reach setpoint".to_string(),
    };
    let settle = match m.settled_at_s {
        Some(t) => format!("{t:.2} s"),
        None => "did not settle".to_string(),
    };
    format!(
        "Curve {} metrics (setpoint = {} °C):\n  \
         Overshoot: {:.2} °C\n  \
         Rise time: {rise}\n  \
         Settling time: {settle}\n  \
         Mean absolute error: {:.2} °C\n",
        m.curve, m.setpoint_c, m.overshoot_c, m.mean_abs_error_c
    )
}

/// One row per curve; absent rise/settle times become empty cells.
pub fn write_metrics_csv(metrics: &[StepMetrics], path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for m in metrics {
        writer.serialize(m)?;
    }
    writer.flush()?;
    info!("metrics written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> StepMetrics {
        StepMetrics {
            curve: 2,
            setpoint_c: 76.0,
            overshoot_c: 1.32,
            rise_time_s: None,
            settled_at_s: Some(123.0),
            mean_abs_error_c: 2.3049,
            samples: 74,
        }
    }

    #[test]
    fn format_reports_missing_rise_time() {
        let text = format_metrics(&sample_metrics());
        assert!(text.starts_with("Curve 2 metrics (setpoint = 76 °C):"));
        assert!(text.contains("Overshoot: 1.32 °C"));
        assert!(text.contains("Rise time: did not reach setpoint"));
        assert!(text.contains("Settling time: 123.00 s"));
        assert!(text.contains("Mean absolute error: 2.30 °C"));
    }

    #[test]
    fn csv_leaves_absent_values_empty() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "pidlog_metrics_{}.csv",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        write_metrics_csv(&[sample_metrics()], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("curve,setpoint_c,overshoot_c,rise_time_s,settled_at_s,mean_abs_error_c,samples")
        );
        assert_eq!(lines.next(), Some("2,76.0,1.32,,123.0,2.3049,74"));
        let _ = std::fs::remove_file(&path);
    }
}
