//! Controller log table.
//!
//! The heater firmware prints one `;`-separated row per second on the serial
//! console: elapsed time, measured temperature, PWM duty and the index of the
//! setpoint curve being followed. A capture of one brewing run is compiled into
//! the binary so the analysis runs without any input file.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

/// Serial capture of a two-curve heating run (67 °C, then 76 °C).
pub const EMBEDDED_LOG: &str = include_str!("../data/pid_log.csv");

pub const COL_TIME: &str = "TempoSeg";
pub const COL_TEMP: &str = "TempAtual";
pub const COL_PWM: &str = "SaidaPWM";
pub const COL_CURVE: &str = "Curva";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read log {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed log: {0}")]
    Csv(#[from] csv::Error),
    #[error("log header has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("log contains no valid rows")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time_s: f64,
    pub temp_c: f64,
    pub pwm: f64,
    pub curve: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessLog {
    pub samples: Vec<Sample>,
}

struct Columns {
    time: usize,
    temp: usize,
    pwm: usize,
    curve: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LogError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LogError::MissingColumn(name))
        };
        Ok(Self {
            time: find(COL_TIME)?,
            temp: find(COL_TEMP)?,
            pwm: find(COL_PWM)?,
            curve: find(COL_CURVE)?,
        })
    }
}

fn numeric_field(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    let v = record.get(idx)?.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn curve_field(record: &csv::StringRecord, idx: usize) -> Option<u32> {
    let v = numeric_field(record, idx)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

/// Parsed samples plus the 1-based source line of every dropped row.
fn parse_rows(text: &str) -> Result<(Vec<Sample>, Vec<u64>), LogError> {
    let body = text.trim_start();
    let skipped_lines = text[..text.len() - body.len()].matches('\n').count() as u64;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let cols = Columns::locate(reader.headers()?)?;

    let mut samples = Vec::new();
    let mut dropped = Vec::new();
    for record in reader.records() {
        let record = record?;
        let parsed = (|| {
            Some(Sample {
                time_s: numeric_field(&record, cols.time)?,
                temp_c: numeric_field(&record, cols.temp)?,
                pwm: numeric_field(&record, cols.pwm)?,
                curve: curve_field(&record, cols.curve)?,
            })
        })();
        match parsed {
            Some(sample) => samples.push(sample),
            None => {
                let line = record.position().map_or(0, |p| p.line() + skipped_lines);
                warn!(
                    "dropping log line {}: {:?}",
                    line,
                    record.iter().collect::<Vec<_>>()
                );
                dropped.push(line);
            }
        }
    }
    Ok((samples, dropped))
}

impl ProcessLog {
    pub fn embedded() -> Result<Self, LogError> {
        Self::parse(EMBEDDED_LOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse a `;`-separated log with a header row.
    ///
    /// Fields are coerced to numbers; rows where any field fails to coerce are
    /// dropped rather than rejected, since serial captures routinely contain
    /// truncated or interleaved debug lines.
    pub fn parse(text: &str) -> Result<Self, LogError> {
        let (samples, dropped) = parse_rows(text)?;
        if samples.is_empty() {
            return Err(LogError::Empty);
        }
        debug!("parsed {} samples ({} dropped)", samples.len(), dropped.len());
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct curve ids in order of first appearance.
    pub fn curve_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for s in &self.samples {
            if !ids.contains(&s.curve) {
                ids.push(s.curve);
            }
        }
        ids
    }

    pub fn curve(&self, id: u32) -> Vec<Sample> {
        self.samples
            .iter()
            .filter(|s| s.curve == id)
            .copied()
            .collect()
    }

    /// Samples where the active curve changes. The first sample always counts.
    pub fn transitions(&self) -> Vec<Sample> {
        let mut prev: Option<u32> = None;
        let mut out = Vec::new();
        for s in &self.samples {
            if prev != Some(s.curve) {
                out.push(*s);
            }
            prev = Some(s.curve);
        }
        out
    }

    pub fn time_range(&self) -> (f64, f64) {
        min_max(self.samples.iter().map(|s| s.time_s))
    }

    pub fn temp_range(&self) -> (f64, f64) {
        min_max(self.samples.iter().map(|s| s.temp_c))
    }

    pub fn pwm_max(&self) -> f64 {
        self.samples.iter().map(|s| s.pwm).fold(0.0, f64::max)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo.is_finite() { (lo, hi) } else { (0.0, 0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_by_name() {
        let text = "Curva;SaidaPWM;TempAtual;TempoSeg\n2;500;70.5;12\n";
        let log = ProcessLog::parse(text).unwrap();
        assert_eq!(
            log.samples,
            vec![Sample {
                time_s: 12.0,
                temp_c: 70.5,
                pwm: 500.0,
                curve: 2,
            }]
        );
    }

    #[test]
    fn drops_rows_that_fail_to_coerce() {
        let text = "\n\nTempoSeg;TempAtual;SaidaPWM;Curva\n\
                    1;25.0;1023;1\n\
                    2;nan?;1023;1\n\
                    3;26.0;;1\n\
                    4;27.0;1000;1.5\n\
                    5;28.0;990\n\
                    6;29.0;980;1\n";
        let log = ProcessLog::parse(text).unwrap();
        let times: Vec<f64> = log.samples.iter().map(|s| s.time_s).collect();
        assert_eq!(times, vec![1.0, 6.0]);
    }

    #[test]
    fn dropped_rows_report_source_lines() {
        let text = "\n\nTempoSeg;TempAtual;SaidaPWM;Curva\n\
                    1;25.0;1023;1\n\
                    \n\
                    2;bad;1023;1\n\
                    3;26.0;1000;1\n\
                    4;27.0;;1\n";
        let (samples, dropped) = parse_rows(text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(dropped, vec![6, 8]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = ProcessLog::parse("TempoSeg;TempAtual;Curva\n1;2;1\n").unwrap_err();
        assert!(matches!(err, LogError::MissingColumn(COL_PWM)));
    }

    #[test]
    fn all_rows_dropped_is_empty() {
        let err = ProcessLog::parse("TempoSeg;TempAtual;SaidaPWM;Curva\nx;y;z;w\n").unwrap_err();
        assert!(matches!(err, LogError::Empty));
    }

    #[test]
    fn transitions_include_first_sample() {
        let text = "TempoSeg;TempAtual;SaidaPWM;Curva\n\
                    1;20;0;1\n2;21;0;1\n3;22;0;2\n4;23;0;2\n5;24;0;1\n";
        let log = ProcessLog::parse(text).unwrap();
        let at: Vec<(f64, u32)> = log
            .transitions()
            .iter()
            .map(|s| (s.time_s, s.curve))
            .collect();
        assert_eq!(at, vec![(1.0, 1), (3.0, 2), (5.0, 1)]);
        assert_eq!(log.curve_ids(), vec![1, 2]);
        assert_eq!(log.curve(1).len(), 3);
    }
}
