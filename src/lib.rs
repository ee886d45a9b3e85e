pub mod parameters;
pub mod model;
pub mod integrator;
pub mod period;
pub mod scenario;
pub mod report;
pub mod export;
pub mod runner;


pub use parameters::{LotkaVolterraParameters, NonPeriodicParameters, ParameterError};
pub use model::{ModelKind, PopulationModel, UnknownModelKind};
pub use integrator::{integrate, IntegrationError, SimulatedPopulations, SimulationConfig, TimeGrid};
pub use period::{
    compute_cross_series_lag,
    compute_min_to_max_time,
    compute_period,
    PeriodAnalyzer,
    PeriodError,
    DECIMAL_PLACES,
    MIN_SEPARATION,
};
pub use scenario::{builtin_scenarios, Scenario, ScenarioError, ScenarioFile, ScenarioModel};
pub use report::{PopulationSummary, RunSummary, ScenarioReport};
pub use export::{ExportError, ExportedFiles, PlotDataExporter};
pub use runner::{Runner, SimulationError};
