//! Per-scenario analysis summaries and their console rendering.

use crate::integrator::{SimulatedPopulations, SimulationConfig};
use crate::model::ModelKind;
use crate::period::PeriodAnalyzer;
use crate::scenario::Scenario;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

const NOT_FOUND: &str = "No complete period was found.";

/// Rounds `value` to `decimal_places` for display.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let scale = 10_f64.powi(decimal_places as i32);
    (value * scale).round() / scale
}

fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::min)
}

fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::max)
}

/// Range and period of one population series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub min: f64,
    pub max: f64,
    pub period: Option<i64>,
}

impl PopulationSummary {
    fn from_series(values: &[f64], analyzer: &PeriodAnalyzer) -> Self {
        PopulationSummary {
            min: round_to(nan_min(values), 2),
            max: round_to(nan_max(values), 2),
            period: analyzer.period(values).ok(),
        }
    }
}

/// Everything printed for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario_id: usize,
    pub model: ModelKind,
    pub parameters: Vec<String>,
    pub prey: PopulationSummary,
    pub predator: PopulationSummary,
    /// First predator peak relative to the first prey peak
    pub predator_prey_lag: Option<i64>,
    /// Maximum-to-minimum offset, measured on the prey series
    pub min_to_max_time: Option<i64>,
}

impl ScenarioReport {
    /// Runs every analysis over `populations`.
    ///
    /// A missing period is an expected outcome and becomes `None`; it never
    /// fails the report.
    pub fn analyze(
        scenario: &Scenario,
        populations: &SimulatedPopulations,
        analyzer: &PeriodAnalyzer,
    ) -> Self {
        let prey = &populations.prey;
        let predator = &populations.predator;

        ScenarioReport {
            scenario_id: scenario.id,
            model: scenario.model.kind(),
            parameters: scenario.model.parameter_lines(),
            prey: PopulationSummary::from_series(prey, analyzer),
            predator: PopulationSummary::from_series(predator, analyzer),
            predator_prey_lag: analyzer.cross_series_lag(prey, predator).ok(),
            min_to_max_time: analyzer.min_to_max_time(prey).ok(),
        }
    }

    /// Number of analyses that found no complete period.
    pub fn missing_results(&self) -> usize {
        [
            self.prey.period,
            self.predator.period,
            self.predator_prey_lag,
            self.min_to_max_time,
        ]
        .iter()
        .filter(|value| value.is_none())
        .count()
    }

    /// Console block for this scenario.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("\n-------\n");
        for line in &self.parameters {
            out.push_str(line);
            out.push('\n');
        }

        let _ = writeln!(out, "\nScenario: {}", self.scenario_id);
        let _ = writeln!(out, "Min prey count: {:?}", self.prey.min);
        let _ = writeln!(out, "Max prey count: {:?}", self.prey.max);
        write_result(&mut out, "Prey period", self.prey.period);
        let _ = writeln!(out, "Min predator count: {:?}", self.predator.min);
        let _ = writeln!(out, "Max predator count: {:?}", self.predator.max);
        write_result(&mut out, "Predator period", self.predator.period);
        write_result(&mut out, "Predator-Prey Lag", self.predator_prey_lag);
        write_result(&mut out, "Predator min to max time", self.min_to_max_time);
        out
    }
}

fn write_result(out: &mut String, label: &str, value: Option<i64>) {
    let _ = match value {
        Some(steps) => writeln!(out, "{}: {}", label, steps),
        None => writeln!(out, "{}: {}", label, NOT_FOUND),
    };
}

/// Output of a full run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn new(config: SimulationConfig, reports: Vec<ScenarioReport>) -> Self {
        RunSummary {
            generated_at: Utc::now(),
            config,
            reports,
        }
    }

    /// Scenarios for which at least one analysis found a period.
    pub fn scenarios_with_period(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.missing_results() < 4)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::LotkaVolterraParameters;
    use crate::scenario::ScenarioModel;

    fn scenario() -> Scenario {
        let params = LotkaVolterraParameters::new(1.0, 0.5, 0.1, 0.5).unwrap();
        Scenario::new(3, ScenarioModel::Periodic(params))
    }

    fn populations(prey: Vec<f64>, predator: Vec<f64>) -> SimulatedPopulations {
        let time = (0..prey.len()).map(|i| i as f64).collect();
        SimulatedPopulations {
            time,
            prey,
            predator,
        }
    }

    fn spikes(len: usize, peaks: &[usize], base: f64, peak: f64) -> Vec<f64> {
        let mut values = vec![base; len];
        for &index in peaks {
            values[index] = peak;
        }
        values
    }

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(13.389, 2), 13.39);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_report_collects_all_results() {
        let mut prey = spikes(80, &[5, 55], 2.0, 9.0);
        prey[30] = 0.5;
        let predator = spikes(80, &[20, 70], 1.0, 4.0);

        let report = ScenarioReport::analyze(
            &scenario(),
            &populations(prey, predator),
            &PeriodAnalyzer::default(),
        );

        assert_eq!(report.scenario_id, 3);
        assert_eq!(report.model, ModelKind::Periodic);
        assert_eq!(report.prey.min, 0.5);
        assert_eq!(report.prey.max, 9.0);
        assert_eq!(report.prey.period, Some(50));
        assert_eq!(report.predator.period, Some(50));
        assert_eq!(report.predator_prey_lag, Some(15));
        assert_eq!(report.min_to_max_time, Some(25));
        assert_eq!(report.missing_results(), 0);
    }

    #[test]
    fn test_report_recovers_from_missing_periods() {
        let prey = spikes(40, &[5], 2.0, 9.0);
        let predator = spikes(40, &[10, 30], 1.0, 4.0);

        let report = ScenarioReport::analyze(
            &scenario(),
            &populations(prey, predator),
            &PeriodAnalyzer::default(),
        );

        assert_eq!(report.prey.period, None);
        assert_eq!(report.predator.period, Some(20));
        assert_eq!(report.predator_prey_lag, None);
        assert_eq!(report.min_to_max_time, None);
        assert_eq!(report.missing_results(), 3);
    }

    #[test]
    fn test_render_uses_fallback_text() {
        let prey = spikes(40, &[5], 2.0, 9.0);
        let predator = spikes(40, &[10, 30], 1.0, 4.0);
        let report = ScenarioReport::analyze(
            &scenario(),
            &populations(prey, predator),
            &PeriodAnalyzer::default(),
        );

        let text = report.render();
        assert!(text.starts_with("\n-------\nGrowth rate: 1.0\n"));
        assert!(text.contains("\nScenario: 3\n"));
        assert!(text.contains("Min prey count: 2.0\n"));
        assert!(text.contains("Max predator count: 4.0\n"));
        assert!(text.contains("Prey period: No complete period was found.\n"));
        assert!(text.contains("Predator period: 20\n"));
        assert!(text.contains("Predator-Prey Lag: No complete period was found.\n"));
        assert!(text.contains("Predator min to max time: No complete period was found.\n"));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let prey = spikes(40, &[5], 2.0, 9.0);
        let predator = spikes(40, &[10, 30], 1.0, 4.0);
        let report = ScenarioReport::analyze(
            &scenario(),
            &populations(prey, predator),
            &PeriodAnalyzer::default(),
        );
        let summary = RunSummary::new(SimulationConfig::default(), vec![report]);
        assert_eq!(summary.scenarios_with_period(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reports"][0]["model"], "periodic");
        assert_eq!(json["reports"][0]["predator"]["period"], 20);
        assert!(json["reports"][0]["prey"]["period"].is_null());
        assert!(json["generated_at"].is_string());
    }
}
