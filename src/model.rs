//! Right-hand sides of the two predator-prey models.
//!
//! Classic form:
//!
//!   dx/dt = alpha x - beta x y
//!   dy/dt = delta x y - gamma y
//!
//! Logistic (non-periodic) form:
//!
//!   dx/dt = r_x x (K_x - x - a_xy y) / K_x
//!   dy/dt = r_y y (K_y - y - a_yx x) / K_y
//!
//! where x is the prey and y the predator population.

use crate::parameters::{LotkaVolterraParameters, NonPeriodicParameters};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A two-species population model that can be integrated in time.
pub trait PopulationModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Rates of change `(d prey / dt, d predator / dt)` at the given state.
    fn derivatives(&self, prey: f64, predator: f64) -> (f64, f64);
}

impl PopulationModel for LotkaVolterraParameters {
    fn name(&self) -> &'static str {
        "lotka_volterra"
    }

    fn derivatives(&self, prey: f64, predator: f64) -> (f64, f64) {
        let rate_of_change_of_prey =
            self.growth_rate_prey() * prey - self.predation_rate() * prey * predator;
        let rate_of_change_of_predator = self.reproduction_rate_predator() * prey * predator
            - self.death_rate_predator() * predator;

        (rate_of_change_of_prey, rate_of_change_of_predator)
    }
}

impl PopulationModel for NonPeriodicParameters {
    fn name(&self) -> &'static str {
        "logistic_lotka_volterra"
    }

    fn derivatives(&self, prey: f64, predator: f64) -> (f64, f64) {
        let capacity_prey = self.carrying_capacity_prey();
        let capacity_predator = self.carrying_capacity_predator();

        let rate_of_change_of_prey = self.growth_rate_prey()
            * prey
            * ((capacity_prey - prey - self.predator_effect_on_prey_growth() * predator)
                / capacity_prey);
        let rate_of_change_of_predator = self.growth_rate_predator()
            * predator
            * ((capacity_predator - predator - self.prey_effect_on_predator_growth() * prey)
                / capacity_predator);

        (rate_of_change_of_prey, rate_of_change_of_predator)
    }
}

/// Which model variant a scenario uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Classic Lotka-Volterra with closed periodic orbits
    Periodic,
    /// Logistic growth variant that settles instead of cycling
    NonPeriodic,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Periodic => "periodic",
            ModelKind::NonPeriodic => "non-periodic",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = UnknownModelKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "periodic" => Ok(ModelKind::Periodic),
            "non-periodic" => Ok(ModelKind::NonPeriodic),
            _ => Err(UnknownModelKind(s.to_string())),
        }
    }
}

/// Error returned when parsing an unsupported model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModelKind(pub String);

impl fmt::Display for UnknownModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' not allowed. Must be 'periodic' or 'non-periodic'",
            self.0
        )
    }
}

impl std::error::Error for UnknownModelKind {}
