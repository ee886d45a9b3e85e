//! Scenario definitions: built-in parameter sweeps and JSON scenario files.

use crate::integrator::SimulationConfig;
use crate::model::{ModelKind, PopulationModel};
use crate::parameters::{LotkaVolterraParameters, NonPeriodicParameters, ParameterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Model variant together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum ScenarioModel {
    Periodic(LotkaVolterraParameters),
    NonPeriodic(NonPeriodicParameters),
}

impl ScenarioModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            ScenarioModel::Periodic(_) => ModelKind::Periodic,
            ScenarioModel::NonPeriodic(_) => ModelKind::NonPeriodic,
        }
    }

    /// The parameters as an integrable model.
    pub fn as_model(&self) -> &dyn PopulationModel {
        match self {
            ScenarioModel::Periodic(params) => params,
            ScenarioModel::NonPeriodic(params) => params,
        }
    }

    /// Human-readable parameter listing, one `label: value` per line.
    pub fn parameter_lines(&self) -> Vec<String> {
        match self {
            ScenarioModel::Periodic(params) => vec![
                format!("Growth rate: {:?}", params.growth_rate_prey()),
                format!("Predation rate: {:?}", params.predation_rate()),
                format!(
                    "Predator reproduction rate: {:?}",
                    params.reproduction_rate_predator()
                ),
                format!("Death rate predator: {:?}", params.death_rate_predator()),
            ],
            ScenarioModel::NonPeriodic(params) => vec![
                format!("Growth rate: {:?}", params.growth_rate_prey()),
                format!(
                    "Reproduction rate predator: {:?}",
                    params.growth_rate_predator()
                ),
                format!(
                    "Carrying capacity prey: {:?}",
                    params.carrying_capacity_prey()
                ),
                format!(
                    "Carrying capacity predator: {:?}",
                    params.carrying_capacity_predator()
                ),
                format!(
                    "Predator effect on prey growth: {:?}",
                    params.predator_effect_on_prey_growth()
                ),
                format!(
                    "Prey effect on predator growth: {:?}",
                    params.prey_effect_on_predator_growth()
                ),
            ],
        }
    }
}

/// A numbered scenario; ids start at 1 and name the exported files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: usize,
    pub model: ScenarioModel,
}

impl Scenario {
    pub fn new(id: usize, model: ScenarioModel) -> Self {
        Scenario { id, model }
    }
}

fn number_scenarios(models: impl IntoIterator<Item = ScenarioModel>) -> Vec<Scenario> {
    models
        .into_iter()
        .enumerate()
        .map(|(index, model)| Scenario::new(index + 1, model))
        .collect()
}

fn ensure_same_length(lengths: &[usize]) -> Result<usize, ScenarioError> {
    let expected = lengths.first().copied().unwrap_or(0);
    if lengths.iter().any(|&len| len != expected) {
        return Err(ScenarioError::ColumnLengthMismatch(lengths.to_vec()));
    }
    Ok(expected)
}

/// Builds classic scenarios from per-parameter columns.
///
/// # Errors
/// Fails when the columns differ in length or any row holds invalid rates.
pub fn periodic_sweep(
    growth_rates: &[f64],
    predation_rates: &[f64],
    reproduction_rates: &[f64],
    death_rates: &[f64],
) -> Result<Vec<Scenario>, ScenarioError> {
    let rows = ensure_same_length(&[
        growth_rates.len(),
        predation_rates.len(),
        reproduction_rates.len(),
        death_rates.len(),
    ])?;

    let models = (0..rows)
        .map(|i| {
            LotkaVolterraParameters::new(
                growth_rates[i],
                predation_rates[i],
                reproduction_rates[i],
                death_rates[i],
            )
            .map(ScenarioModel::Periodic)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(number_scenarios(models))
}

/// Builds logistic scenarios from per-parameter columns.
///
/// # Errors
/// Fails when the columns differ in length or any row is invalid.
pub fn non_periodic_sweep(
    growth_rates: &[f64],
    reproduction_rates: &[f64],
    prey_capacities: &[f64],
    predator_capacities: &[f64],
    predator_effects: &[f64],
    prey_effects: &[f64],
) -> Result<Vec<Scenario>, ScenarioError> {
    let rows = ensure_same_length(&[
        growth_rates.len(),
        reproduction_rates.len(),
        prey_capacities.len(),
        predator_capacities.len(),
        predator_effects.len(),
        prey_effects.len(),
    ])?;

    let models = (0..rows)
        .map(|i| {
            NonPeriodicParameters::new(
                growth_rates[i],
                reproduction_rates[i],
                prey_capacities[i],
                predator_capacities[i],
                predator_effects[i],
                prey_effects[i],
            )
            .map(ScenarioModel::NonPeriodic)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(number_scenarios(models))
}

/// The built-in sweep for `kind`.
pub fn builtin_scenarios(kind: ModelKind) -> Result<Vec<Scenario>, ScenarioError> {
    match kind {
        ModelKind::Periodic => periodic_sweep(
            &[1.0, 1.5, 1.0, 1.0, 1.0],
            &[0.5, 0.5, 1.0, 0.5, 0.5],
            &[0.1, 0.1, 0.1, 0.2, 0.1],
            &[0.5, 0.5, 0.5, 0.5, 0.8],
        ),
        ModelKind::NonPeriodic => non_periodic_sweep(
            &[1.0, 1.5, 1.0, 1.0, 1.0, 1.0, 1.0],
            &[0.1, 0.1, 0.2, 0.1, 0.1, 0.1, 0.1],
            &[1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0],
            &[0.5, 0.5, 0.5, 0.5, 1.0, 0.5, 0.5],
            &[-0.3, -0.3, -0.3, -0.3, -0.3, -0.8, -0.3],
            &[0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.8],
        ),
    }
}

/// On-disk scenario description.
///
/// ```json
/// {
///   "config": { "initial_prey": 10.0, "substeps": 20 },
///   "scenarios": [
///     { "model": "periodic", "growth_rate_prey": 1.0, "predation_rate": 0.5,
///       "reproduction_rate_predator": 0.1, "death_rate_predator": 0.5 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub config: SimulationConfig,
    pub scenarios: Vec<ScenarioModel>,
}

impl ScenarioFile {
    /// Parses a scenario file from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(json)?;
        if file.scenarios.is_empty() {
            return Err(ScenarioError::Empty);
        }
        Ok(file)
    }

    /// Reads and parses a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScenarioError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Numbered scenarios in file order.
    pub fn scenarios(&self) -> Vec<Scenario> {
        number_scenarios(self.scenarios.iter().copied())
    }
}

/// Errors raised while assembling scenarios.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// Sweep columns have different lengths
    ColumnLengthMismatch(Vec<usize>),
    /// A row held invalid parameters
    InvalidParameters(ParameterError),
    /// Scenario file lists no scenarios
    Empty,
    /// Scenario file could not be read
    Io(String),
    /// Scenario file is not valid JSON for this schema
    Parse(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::ColumnLengthMismatch(lengths) => {
                write!(f, "Parameter columns differ in length: {:?}", lengths)
            }
            ScenarioError::InvalidParameters(err) => write!(f, "Invalid parameters: {}", err),
            ScenarioError::Empty => write!(f, "Scenario file contains no scenarios"),
            ScenarioError::Io(msg) => write!(f, "Failed to read scenario file: {}", msg),
            ScenarioError::Parse(msg) => write!(f, "Failed to parse scenario file: {}", msg),
        }
    }
}

impl std::error::Error for ScenarioError {}

impl From<ParameterError> for ScenarioError {
    fn from(err: ParameterError) -> Self {
        ScenarioError::InvalidParameters(err)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        ScenarioError::Parse(err.to_string())
    }
}
