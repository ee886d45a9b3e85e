//! Fixed-step time integration of population models.
//!
//! Populations are sampled on a uniform grid equivalent to
//! `linspace(start, end, samples)`. Between consecutive samples the state is
//! advanced with classic fourth-order Runge-Kutta over `substeps` equal
//! steps, so the output resolution and the integration accuracy can be tuned
//! independently.

use crate::model::PopulationModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniformly spaced sample times, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeGrid")]
pub struct TimeGrid {
    start: f64,
    end: f64,
    samples: usize,
}

#[derive(Deserialize)]
struct RawTimeGrid {
    start: f64,
    end: f64,
    samples: usize,
}

impl TryFrom<RawTimeGrid> for TimeGrid {
    type Error = IntegrationError;

    fn try_from(raw: RawTimeGrid) -> Result<Self, Self::Error> {
        TimeGrid::new(raw.start, raw.end, raw.samples)
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        TimeGrid {
            start: 0.0,
            end: 50.0,
            samples: 2000,
        }
    }
}

impl TimeGrid {
    /// Creates a grid of `samples` points from `start` to `end` inclusive.
    ///
    /// # Errors
    /// Returns [`IntegrationError::InvalidGrid`] when fewer than two samples
    /// are requested, the bounds are not finite, or `end <= start`.
    pub fn new(start: f64, end: f64, samples: usize) -> Result<Self, IntegrationError> {
        if samples < 2 {
            return Err(IntegrationError::InvalidGrid(format!(
                "at least 2 samples required, got {}",
                samples
            )));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(IntegrationError::InvalidGrid(format!(
                "bounds must be finite ({} .. {})",
                start, end
            )));
        }
        if end <= start {
            return Err(IntegrationError::InvalidGrid(format!(
                "end ({}) must be after start ({})",
                end, start
            )));
        }

        Ok(TimeGrid {
            start,
            end,
            samples,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Spacing between consecutive samples.
    pub fn step(&self) -> f64 {
        (self.end - self.start) / (self.samples - 1) as f64
    }

    /// All sample times; the last one is exactly `end`.
    pub fn points(&self) -> Vec<f64> {
        let step = self.step();
        let mut points: Vec<f64> = (0..self.samples)
            .map(|i| self.start + i as f64 * step)
            .collect();
        if let Some(last) = points.last_mut() {
            *last = self.end;
        }
        points
    }
}

/// Prey and predator populations sampled on a [`TimeGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPopulations {
    pub time: Vec<f64>,
    pub prey: Vec<f64>,
    pub predator: Vec<f64>,
}

impl SimulatedPopulations {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Integration settings shared by every scenario of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Prey population at the first sample
    pub initial_prey: f64,
    /// Predator population at the first sample
    pub initial_predator: f64,
    /// Output sample times
    pub time_grid: TimeGrid,
    /// RK4 steps taken between two output samples
    pub substeps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_prey: 10.0,
            initial_predator: 1.0,
            time_grid: TimeGrid::default(),
            substeps: 20,
        }
    }
}

impl SimulationConfig {
    /// Integrates `model` from this configuration's initial state.
    pub fn simulate<M>(&self, model: &M) -> Result<SimulatedPopulations, IntegrationError>
    where
        M: PopulationModel + ?Sized,
    {
        integrate(
            model,
            (self.initial_prey, self.initial_predator),
            &self.time_grid,
            self.substeps,
        )
    }
}

/// Integrates `model` over `grid` starting from `initial = (prey, predator)`.
///
/// The first sample is the initial state itself. Non-finite states are not
/// an error: they are logged once and carried through, leaving the analysis
/// to report that no period exists.
///
/// # Errors
/// Returns [`IntegrationError::InvalidInitialState`] for negative or
/// non-finite initial populations and [`IntegrationError::ZeroSubsteps`] when
/// `substeps` is zero.
pub fn integrate<M>(
    model: &M,
    initial: (f64, f64),
    grid: &TimeGrid,
    substeps: usize,
) -> Result<SimulatedPopulations, IntegrationError>
where
    M: PopulationModel + ?Sized,
{
    let (initial_prey, initial_predator) = initial;
    if !initial_prey.is_finite()
        || !initial_predator.is_finite()
        || initial_prey < 0.0
        || initial_predator < 0.0
    {
        return Err(IntegrationError::InvalidInitialState {
            prey: initial_prey,
            predator: initial_predator,
        });
    }
    if substeps == 0 {
        return Err(IntegrationError::ZeroSubsteps);
    }

    let time = grid.points();
    let dt = grid.step() / substeps as f64;

    let mut prey = Vec::with_capacity(grid.samples());
    let mut predator = Vec::with_capacity(grid.samples());
    prey.push(initial_prey);
    predator.push(initial_predator);

    let mut state = initial;
    let mut diverged = false;

    for sample in 1..grid.samples() {
        for _ in 0..substeps {
            state = rk4_step(model, state, dt);
        }

        if !diverged && !(state.0.is_finite() && state.1.is_finite()) {
            diverged = true;
            log::warn!(
                "{} diverged at t = {:.4} (sample {})",
                model.name(),
                time[sample],
                sample
            );
        }

        prey.push(state.0);
        predator.push(state.1);
    }

    log::debug!(
        "{}: integrated {} samples with dt = {:e}",
        model.name(),
        grid.samples(),
        dt
    );

    Ok(SimulatedPopulations {
        time,
        prey,
        predator,
    })
}

/// One classic RK4 step of size `dt`.
fn rk4_step<M>(model: &M, state: (f64, f64), dt: f64) -> (f64, f64)
where
    M: PopulationModel + ?Sized,
{
    let (x, y) = state;

    let (k1_x, k1_y) = model.derivatives(x, y);
    let (k2_x, k2_y) = model.derivatives(x + k1_x * dt / 2.0, y + k1_y * dt / 2.0);
    let (k3_x, k3_y) = model.derivatives(x + k2_x * dt / 2.0, y + k2_y * dt / 2.0);
    let (k4_x, k4_y) = model.derivatives(x + k3_x * dt, y + k3_y * dt);

    (
        x + dt / 6.0 * (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x),
        y + dt / 6.0 * (k1_y + 2.0 * k2_y + 2.0 * k3_y + k4_y),
    )
}

/// Errors raised before integration starts.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// Time grid could not be built
    InvalidGrid(String),
    /// Initial populations must be finite and non-negative
    InvalidInitialState { prey: f64, predator: f64 },
    /// At least one RK4 step per sample is required
    ZeroSubsteps,
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationError::InvalidGrid(msg) => write!(f, "Invalid time grid: {}", msg),
            IntegrationError::InvalidInitialState { prey, predator } => write!(
                f,
                "Invalid initial populations: prey = {}, predator = {}",
                prey, predator
            ),
            IntegrationError::ZeroSubsteps => write!(f, "substeps must be at least 1"),
        }
    }
}

impl std::error::Error for IntegrationError {}
