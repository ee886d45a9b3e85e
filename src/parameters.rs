use serde::{Deserialize, Serialize};
use std::fmt;

/// Rate parameters of the classic (periodic) Lotka-Volterra model.
///
/// All rates are in arbitrary units and must be non-negative. Instances can
/// only be built through [`LotkaVolterraParameters::new`], including when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLotkaVolterraParameters")]
pub struct LotkaVolterraParameters {
    /// Prey growth rate (alpha)
    growth_rate_prey: f64,
    /// Rate at which predators remove prey (beta)
    predation_rate: f64,
    /// Predator reproduction per prey consumed (delta)
    reproduction_rate_predator: f64,
    /// Predator death rate (gamma)
    death_rate_predator: f64,
}

#[derive(Deserialize)]
struct RawLotkaVolterraParameters {
    growth_rate_prey: f64,
    predation_rate: f64,
    reproduction_rate_predator: f64,
    death_rate_predator: f64,
}

impl TryFrom<RawLotkaVolterraParameters> for LotkaVolterraParameters {
    type Error = ParameterError;

    fn try_from(raw: RawLotkaVolterraParameters) -> Result<Self, Self::Error> {
        LotkaVolterraParameters::new(
            raw.growth_rate_prey,
            raw.predation_rate,
            raw.reproduction_rate_predator,
            raw.death_rate_predator,
        )
    }
}

impl LotkaVolterraParameters {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    /// Returns [`ParameterError::Negative`] naming the first negative rate, or
    /// [`ParameterError::NotFinite`] for NaN/infinite input.
    pub fn new(
        growth_rate_prey: f64,
        predation_rate: f64,
        reproduction_rate_predator: f64,
        death_rate_predator: f64,
    ) -> Result<Self, ParameterError> {
        validate_rate("growth_rate_prey", growth_rate_prey)?;
        validate_rate("predation_rate", predation_rate)?;
        validate_rate("reproduction_rate_predator", reproduction_rate_predator)?;
        validate_rate("death_rate_predator", death_rate_predator)?;

        Ok(LotkaVolterraParameters {
            growth_rate_prey,
            predation_rate,
            reproduction_rate_predator,
            death_rate_predator,
        })
    }

    pub fn growth_rate_prey(&self) -> f64 {
        self.growth_rate_prey
    }

    pub fn predation_rate(&self) -> f64 {
        self.predation_rate
    }

    pub fn reproduction_rate_predator(&self) -> f64 {
        self.reproduction_rate_predator
    }

    pub fn death_rate_predator(&self) -> f64 {
        self.death_rate_predator
    }
}

/// Parameters of the logistic (non-periodic) competition form.
///
/// Interaction coefficients may be negative; a negative effect of predators
/// on prey growth is what makes the predator a predator. Carrying capacities
/// divide the growth terms and therefore must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNonPeriodicParameters")]
pub struct NonPeriodicParameters {
    growth_rate_prey: f64,
    growth_rate_predator: f64,
    carrying_capacity_prey: f64,
    carrying_capacity_predator: f64,
    predator_effect_on_prey_growth: f64,
    prey_effect_on_predator_growth: f64,
}

#[derive(Deserialize)]
struct RawNonPeriodicParameters {
    growth_rate_prey: f64,
    growth_rate_predator: f64,
    carrying_capacity_prey: f64,
    carrying_capacity_predator: f64,
    predator_effect_on_prey_growth: f64,
    prey_effect_on_predator_growth: f64,
}

impl TryFrom<RawNonPeriodicParameters> for NonPeriodicParameters {
    type Error = ParameterError;

    fn try_from(raw: RawNonPeriodicParameters) -> Result<Self, Self::Error> {
        NonPeriodicParameters::new(
            raw.growth_rate_prey,
            raw.growth_rate_predator,
            raw.carrying_capacity_prey,
            raw.carrying_capacity_predator,
            raw.predator_effect_on_prey_growth,
            raw.prey_effect_on_predator_growth,
        )
    }
}

impl NonPeriodicParameters {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    /// Returns [`ParameterError::NotFinite`] for NaN/infinite input and
    /// [`ParameterError::ZeroCarryingCapacity`] when either capacity is zero.
    pub fn new(
        growth_rate_prey: f64,
        growth_rate_predator: f64,
        carrying_capacity_prey: f64,
        carrying_capacity_predator: f64,
        predator_effect_on_prey_growth: f64,
        prey_effect_on_predator_growth: f64,
    ) -> Result<Self, ParameterError> {
        validate_finite("growth_rate_prey", growth_rate_prey)?;
        validate_finite("growth_rate_predator", growth_rate_predator)?;
        validate_capacity("carrying_capacity_prey", carrying_capacity_prey)?;
        validate_capacity("carrying_capacity_predator", carrying_capacity_predator)?;
        validate_finite("predator_effect_on_prey_growth", predator_effect_on_prey_growth)?;
        validate_finite("prey_effect_on_predator_growth", prey_effect_on_predator_growth)?;

        Ok(NonPeriodicParameters {
            growth_rate_prey,
            growth_rate_predator,
            carrying_capacity_prey,
            carrying_capacity_predator,
            predator_effect_on_prey_growth,
            prey_effect_on_predator_growth,
        })
    }

    pub fn growth_rate_prey(&self) -> f64 {
        self.growth_rate_prey
    }

    pub fn growth_rate_predator(&self) -> f64 {
        self.growth_rate_predator
    }

    pub fn carrying_capacity_prey(&self) -> f64 {
        self.carrying_capacity_prey
    }

    pub fn carrying_capacity_predator(&self) -> f64 {
        self.carrying_capacity_predator
    }

    pub fn predator_effect_on_prey_growth(&self) -> f64 {
        self.predator_effect_on_prey_growth
    }

    pub fn prey_effect_on_predator_growth(&self) -> f64 {
        self.prey_effect_on_predator_growth
    }
}

fn validate_finite(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NotFinite { name, value })
    }
}

fn validate_rate(name: &'static str, value: f64) -> Result<(), ParameterError> {
    validate_finite(name, value)?;
    if value < 0.0 {
        return Err(ParameterError::Negative { name, value });
    }
    Ok(())
}

fn validate_capacity(name: &'static str, value: f64) -> Result<(), ParameterError> {
    validate_finite(name, value)?;
    if value == 0.0 {
        return Err(ParameterError::ZeroCarryingCapacity { name });
    }
    Ok(())
}

/// Errors raised while constructing model parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A rate that must be non-negative was negative
    Negative { name: &'static str, value: f64 },
    /// A parameter was NaN or infinite
    NotFinite { name: &'static str, value: f64 },
    /// A carrying capacity was zero
    ZeroCarryingCapacity { name: &'static str },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::Negative { name, value } => {
                write!(f, "{} is not positive ({} < 0)", name, value)
            }
            ParameterError::NotFinite { name, value } => {
                write!(f, "{} must be finite (got {})", name, value)
            }
            ParameterError::ZeroCarryingCapacity { name } => {
                write!(f, "{} must be non-zero", name)
            }
        }
    }
}

impl std::error::Error for ParameterError {}
