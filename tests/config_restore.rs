use std::fs;
use std::path::PathBuf;

use pidlog::config::{AnalysisConfig, AppConfig, ChartConfig, DisplayConfig};
use pidlog::metrics::Setpoint;

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "pidlog_config_restore_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn assert_close(a: f64, b: f64, label: &str) {
    let diff = (a - b).abs();
    assert!(diff <= 1e-9, "{label} mismatch: {a} vs {b}");
}

#[test]
fn custom_config_round_trips_through_file() {
    let path = unique_path("custom.toml");
    let path_str = path.to_string_lossy().to_string();
    let custom = AppConfig {
        analysis: AnalysisConfig {
            settle_band_c: 0.5,
            settle_window: 5,
        },
        chart: ChartConfig {
            output: "out/run.svg".to_string(),
            width: 800,
            height: 400,
            temp_tick_c: 5.0,
            pwm_full_scale: 255.0,
        },
        display: DisplayConfig { window: false },
        setpoints: vec![
            Setpoint {
                curve: 1,
                target_c: 52.0,
            },
            Setpoint {
                curve: 2,
                target_c: 65.5,
            },
            Setpoint {
                curve: 3,
                target_c: 78.0,
            },
        ],
    };
    fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();

    let cfg = AppConfig::load_or_default(&path_str);
    assert_close(cfg.analysis.settle_band_c, 0.5, "analysis.settle_band_c");
    assert_eq!(cfg.analysis.settle_window, 5);
    assert_eq!(cfg.chart.output, "out/run.svg");
    assert_eq!((cfg.chart.width, cfg.chart.height), (800, 400));
    assert_close(cfg.chart.temp_tick_c, 5.0, "chart.temp_tick_c");
    assert_close(cfg.chart.pwm_full_scale, 255.0, "chart.pwm_full_scale");
    assert!(!cfg.display.window);
    assert_eq!(cfg.setpoints, custom.setpoints);

    let criteria = cfg.analysis.settle_criteria();
    assert_eq!(criteria.window, 5);

    let _ = fs::remove_file(&path);
}
