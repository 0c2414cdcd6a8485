use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::metrics::{SettleCriteria, Setpoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "AnalysisConfig::default_settle_band_c")]
    pub settle_band_c: f64,
    #[serde(default = "AnalysisConfig::default_settle_window")]
    pub settle_window: usize,
}

impl AnalysisConfig {
    fn default_settle_band_c() -> f64 {
        1.0
    }
    fn default_settle_window() -> usize {
        10
    }

    pub fn settle_criteria(&self) -> SettleCriteria {
        SettleCriteria {
            band_c: self.settle_band_c,
            window: self.settle_window,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            settle_band_c: Self::default_settle_band_c(),
            settle_window: Self::default_settle_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "ChartConfig::default_output")]
    pub output: String,
    #[serde(default = "ChartConfig::default_width")]
    pub width: u32,
    #[serde(default = "ChartConfig::default_height")]
    pub height: u32,
    #[serde(default = "ChartConfig::default_temp_tick_c")]
    pub temp_tick_c: f64,
    #[serde(default = "ChartConfig::default_pwm_full_scale")]
    pub pwm_full_scale: f64,
}

impl ChartConfig {
    fn default_output() -> String {
        "target/plots/pid_response.png".to_string()
    }
    fn default_width() -> u32 {
        1400
    }
    fn default_height() -> u32 {
        600
    }
    fn default_temp_tick_c() -> f64 {
        2.0
    }
    fn default_pwm_full_scale() -> f64 {
        1023.0
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            width: Self::default_width(),
            height: Self::default_height(),
            temp_tick_c: Self::default_temp_tick_c(),
            pwm_full_scale: Self::default_pwm_full_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_window")]
    pub window: bool,
}

impl DisplayConfig {
    fn default_window() -> bool {
        true
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window: Self::default_window(),
        }
    }
}

fn default_setpoints() -> Vec<Setpoint> {
    vec![
        Setpoint {
            curve: 1,
            target_c: 67.0,
        },
        Setpoint {
            curve: 2,
            target_c: 76.0,
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_setpoints")]
    pub setpoints: Vec<Setpoint>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            chart: ChartConfig::default(),
            display: DisplayConfig::default(),
            setpoints: default_setpoints(),
        }
    }
}

impl AppConfig {
    /// Defaults rendered as TOML with every line commented out, so the file
    /// documents the knobs without pinning them.
    fn commented_template(&self) -> Result<String, toml::ser::Error> {
        let text = toml::to_string_pretty(self)?;
        let mut commented = String::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                commented.push('\n');
            } else if trimmed.starts_with("[[") {
                // An uncommented array-of-tables header would add an empty entry.
                commented.push_str("# ");
                commented.push_str(line);
                commented.push('\n');
            } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                commented.push_str(line);
                commented.push('\n');
            } else {
                commented.push_str("# ");
                commented.push_str(line);
                commented.push('\n');
            }
        }
        Ok(commented)
    }

    /// A zero-sample settle window can never hold, so fall back to the default.
    fn validated(mut self) -> Self {
        if self.analysis.settle_window == 0 {
            let fallback = AnalysisConfig::default_settle_window();
            error!("analysis.settle_window must be at least 1; using {fallback}");
            self.analysis.settle_window = fallback;
        }
        self
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str::<Self>(&contents) {
                    Ok(cfg) => return cfg.validated(),
                    Err(err) => {
                        error!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    error!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match default_cfg.commented_template() {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    error!("Failed to write default config to {path}: {err}");
                } else {
                    info!("Wrote default config to {path}");
                }
            }
            Err(err) => {
                error!("Failed to serialize default config: {err}; continuing with defaults");
            }
        }
        default_cfg
    }
}
