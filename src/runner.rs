//! End-to-end scenario execution: integrate, analyze, export.

use crate::export::{ExportError, PlotDataExporter};
use crate::integrator::{IntegrationError, SimulationConfig};
use crate::period::PeriodAnalyzer;
use crate::report::{RunSummary, ScenarioReport};
use crate::scenario::{Scenario, ScenarioError};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info};

/// Runs scenarios with a shared configuration.
///
/// Analysis outcomes never abort a run; a scenario without a complete period
/// is simply reported as such. Integration and export errors do abort it.
#[derive(Debug, Clone)]
pub struct Runner {
    config: SimulationConfig,
    analyzer: PeriodAnalyzer,
    exporter: Option<PlotDataExporter>,
    parallel: bool,
}

impl Runner {
    pub fn new(config: SimulationConfig) -> Self {
        Runner {
            config,
            analyzer: PeriodAnalyzer::default(),
            exporter: None,
            parallel: false,
        }
    }

    /// Writes plot data for every scenario through `exporter`.
    pub fn with_exporter(mut self, exporter: PlotDataExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Replaces the default precision and separation used for analysis.
    pub fn with_analyzer(mut self, analyzer: PeriodAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Runs scenarios on the rayon pool when `parallel` is set.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Integrates, analyzes and (optionally) exports one scenario.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<ScenarioReport, SimulationError> {
        let model = scenario.model.as_model();
        debug!(scenario = scenario.id, model = model.name(), "integrating");

        let populations = self.config.simulate(model)?;
        let report = ScenarioReport::analyze(scenario, &populations, &self.analyzer);

        if let Some(exporter) = &self.exporter {
            let files = exporter.export(scenario.id, &populations)?;
            debug!(
                scenario = scenario.id,
                time_series = %files.time_series.display(),
                phase = %files.phase.display(),
                "exported plot data"
            );
        }

        info!(
            scenario = scenario.id,
            missing = report.missing_results(),
            "scenario analyzed"
        );
        Ok(report)
    }

    /// Runs every scenario and collects the reports in scenario order.
    pub fn run(&self, scenarios: &[Scenario]) -> Result<RunSummary, SimulationError> {
        self.run_each(scenarios, |_| {})
    }

    /// Like [`Runner::run`], handing each report to `on_report` in scenario
    /// order.
    ///
    /// Sequential runs call `on_report` as soon as a scenario finishes.
    /// Parallel runs call it once all scenarios are done so that output
    /// blocks never interleave.
    pub fn run_each<F>(
        &self,
        scenarios: &[Scenario],
        mut on_report: F,
    ) -> Result<RunSummary, SimulationError>
    where
        F: FnMut(&ScenarioReport),
    {
        info!(
            scenarios = scenarios.len(),
            parallel = self.parallel,
            "starting run"
        );

        let reports = if self.parallel {
            let reports = scenarios
                .par_iter()
                .map(|scenario| self.run_scenario(scenario))
                .collect::<Result<Vec<_>, _>>()?;
            reports.iter().for_each(&mut on_report);
            reports
        } else {
            let mut reports = Vec::with_capacity(scenarios.len());
            for scenario in scenarios {
                let report = self.run_scenario(scenario)?;
                on_report(&report);
                reports.push(report);
            }
            reports
        };

        let summary = RunSummary::new(self.config, reports);
        info!(
            completed = summary.reports.len(),
            with_period = summary.scenarios_with_period(),
            "run finished"
        );
        Ok(summary)
    }
}

/// Errors that abort a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid integration settings
    Integration(IntegrationError),
    /// Scenario assembly or loading failed
    Scenario(ScenarioError),
    /// Output could not be written
    Export(ExportError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Integration(err) => write!(f, "{}", err),
            SimulationError::Scenario(err) => write!(f, "{}", err),
            SimulationError::Export(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<IntegrationError> for SimulationError {
    fn from(err: IntegrationError) -> Self {
        SimulationError::Integration(err)
    }
}

impl From<ScenarioError> for SimulationError {
    fn from(err: ScenarioError) -> Self {
        SimulationError::Scenario(err)
    }
}

impl From<ExportError> for SimulationError {
    fn from(err: ExportError) -> Self {
        SimulationError::Export(err)
    }
}
