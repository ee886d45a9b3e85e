//! Plot data export.
//!
//! Each scenario produces two CSV files under the output directory:
//! `time_series/<id>.csv` (`time,prey,predator`) and `phase/<id>.csv`
//! (`prey,predator`). A run can additionally write `summary.json`.

use crate::integrator::SimulatedPopulations;
use crate::report::RunSummary;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct TimeSeriesRow {
    time: f64,
    prey: f64,
    predator: f64,
}

#[derive(Serialize)]
struct PhaseRow {
    prey: f64,
    predator: f64,
}

/// Paths written for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub time_series: PathBuf,
    pub phase: PathBuf,
}

/// Writes plot data for scenarios into a fixed output directory.
#[derive(Debug, Clone)]
pub struct PlotDataExporter {
    output_dir: PathBuf,
}

impl PlotDataExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        PlotDataExporter {
            output_dir: output_dir.into(),
        }
    }

    /// Writes both plot data files for scenario `id`.
    pub fn export(
        &self,
        id: usize,
        populations: &SimulatedPopulations,
    ) -> Result<ExportedFiles, ExportError> {
        let time_series = self.write_time_series(id, populations)?;
        let phase = self.write_phase(id, populations)?;
        Ok(ExportedFiles { time_series, phase })
    }

    /// Population versus time.
    pub fn write_time_series(
        &self,
        id: usize,
        populations: &SimulatedPopulations,
    ) -> Result<PathBuf, ExportError> {
        let path = self.prepare("time_series", id)?;
        let mut writer = csv::Writer::from_path(&path)?;

        for ((&time, &prey), &predator) in populations
            .time
            .iter()
            .zip(&populations.prey)
            .zip(&populations.predator)
        {
            writer.serialize(TimeSeriesRow {
                time,
                prey,
                predator,
            })?;
        }
        writer.flush()?;

        log::debug!("wrote {} rows to {}", populations.len(), path.display());
        Ok(path)
    }

    /// Predator versus prey.
    pub fn write_phase(
        &self,
        id: usize,
        populations: &SimulatedPopulations,
    ) -> Result<PathBuf, ExportError> {
        let path = self.prepare("phase", id)?;
        let mut writer = csv::Writer::from_path(&path)?;

        for (&prey, &predator) in populations.prey.iter().zip(&populations.predator) {
            writer.serialize(PhaseRow { prey, predator })?;
        }
        writer.flush()?;

        log::debug!("wrote {} rows to {}", populations.len(), path.display());
        Ok(path)
    }

    /// Writes the run summary as pretty-printed JSON.
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join("summary.json");
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    fn prepare(&self, kind: &str, id: usize) -> Result<PathBuf, ExportError> {
        let dir = self.output_dir.join(kind);
        fs::create_dir_all(&dir)?;
        Ok(dir.join(format!("{}.csv", id)))
    }
}

/// Errors raised while writing output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// File system error
    Io(String),
    /// CSV encoding error
    Csv(String),
    /// JSON encoding error
    Json(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(msg) => write!(f, "I/O error: {}", msg),
            ExportError::Csv(msg) => write!(f, "CSV error: {}", msg),
            ExportError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err.to_string())
    }
}
