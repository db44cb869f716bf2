//! Wiener process engine
//!
//! [`WienerProcess`] owns a Brownian driver plus an ordered list of variable
//! definitions layered on top of it, and integrates all of them together
//! with one Euler-Maruyama step per grid transition:
//!
//! ```text
//! W_i = W_{i-1} + Z_{i-1} * sqrt(t_i - t_{i-1})
//! X_i = X_{i-1} + mu(t_i, S_{i-1}) dt + sigma(t_i, S_{i-1}) dW     (Ito process)
//! Y_i = f(t_i, S_i)                                              (derived)
//! ```
//!
//! # Evaluation order
//!
//! Within a step the driver is written first, then every definition in
//! registration order. A derived variable sees the current state as filled
//! in so far: the driver and every variable registered before it, but not
//! the ones registered after it (those still hold zero). Register a derived
//! variable after everything it reads. Ito drift and volatility only ever
//! see the previous state, so their order does not matter.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{PathError, Result};
use crate::path::Path;
use crate::state::{State, StateVariable};
use crate::time::{Time, TimeGrid};

/// Function of time and a state: `(t, state) -> value`.
pub type StateFunction = Box<dyn Fn(Time, &State) -> f64 + Send + Sync>;

/// How a registered variable gets its value at each step.
enum Definition {
    /// Reserved by [`WienerProcess::reserve_variable`], not defined yet
    Pending,
    /// Function of the current time and the current (partially filled) state
    Derived(StateFunction),
    /// `dX = drift dt + volatility dW`, both evaluated on the previous state
    Ito {
        drift: StateFunction,
        volatility: StateFunction,
    },
}

impl Definition {
    fn kind(&self) -> &'static str {
        match self {
            Definition::Pending => "pending",
            Definition::Derived(_) => "derived",
            Definition::Ito { .. } => "ito",
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A variable slot reserved ahead of its definition.
///
/// Lets a definition refer to its own slot, e.g. an Ito process whose
/// volatility is proportional to its previous value. Consumed when the
/// definition is attached.
#[must_use = "a reserved variable must be defined before generating paths"]
#[derive(Debug)]
pub struct PendingVariable {
    var: StateVariable,
}

impl PendingVariable {
    /// Handle the variable will have once defined.
    pub fn variable(&self) -> StateVariable {
        self.var
    }
}

/// Brownian driver plus derived variables and Ito processes.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rand::{rngs::StdRng, SeedableRng};
/// use wiener_paths::{StateVariable, TimeGrid, WienerProcess};
///
/// let grid = Arc::new(TimeGrid::uniform(0.0, 0.01, 101));
/// let mut process = WienerProcess::new(grid, 0.0);
///
/// let w = StateVariable::DRIVER;
/// let w_squared = process.add_derived_variable(move |_, s| s[w] * s[w], 0.0);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let path = process.generate_path(&mut rng).unwrap();
/// assert_eq!(path.num_times(), 101);
/// assert_eq!(path.state_size(), 2);
/// let last = path.final_state().unwrap();
/// assert!((last[w_squared] - last[w] * last[w]).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct WienerProcess {
    time_grid: Arc<TimeGrid>,
    /// Index 0 is the driver, index `k + 1` belongs to `definitions[k]`
    initial_values: Vec<f64>,
    definitions: Vec<Definition>,
}

impl WienerProcess {
    /// Creates an engine with only the driver registered.
    ///
    /// # Arguments
    /// * `time_grid` - Time points every generated path is aligned to
    /// * `initial_value` - Driver value at the first time point
    pub fn new(time_grid: Arc<TimeGrid>, initial_value: f64) -> Self {
        Self {
            time_grid,
            initial_values: vec![initial_value],
            definitions: Vec::new(),
        }
    }

    /// Grid shared by every path this engine generates.
    pub fn time_grid(&self) -> &Arc<TimeGrid> {
        &self.time_grid
    }

    /// Number of state slots, driver included.
    pub fn num_variables(&self) -> usize {
        self.initial_values.len()
    }

    /// Values seeded into the first state of every path.
    pub fn initial_values(&self) -> &[f64] {
        &self.initial_values
    }

    /// Registers a variable computed from the current time and state.
    ///
    /// `f` may read the driver and any variable registered earlier.
    pub fn add_derived_variable<F>(&mut self, f: F, initial_value: f64) -> StateVariable
    where
        F: Fn(Time, &State) -> f64 + Send + Sync + 'static,
    {
        self.push(Definition::Derived(Box::new(f)), initial_value)
    }

    /// Registers an Ito process `dX = drift dt + volatility dW`.
    ///
    /// Both functions are evaluated on the previous state.
    pub fn add_ito_process<D, V>(
        &mut self,
        drift: D,
        volatility: V,
        initial_value: f64,
    ) -> StateVariable
    where
        D: Fn(Time, &State) -> f64 + Send + Sync + 'static,
        V: Fn(Time, &State) -> f64 + Send + Sync + 'static,
    {
        let definition = Definition::Ito {
            drift: Box::new(drift),
            volatility: Box::new(volatility),
        };
        self.push(definition, initial_value)
    }

    /// Reserves the next slot so its definition can refer to itself.
    ///
    /// The slot takes part in evaluation order from the moment it is
    /// reserved. Paths cannot be generated until it is defined.
    pub fn reserve_variable(&mut self) -> PendingVariable {
        PendingVariable {
            var: self.push(Definition::Pending, 0.0),
        }
    }

    /// Attaches a derived definition to a reserved slot.
    pub fn define_derived<F>(
        &mut self,
        pending: PendingVariable,
        f: F,
        initial_value: f64,
    ) -> Result<StateVariable>
    where
        F: Fn(Time, &State) -> f64 + Send + Sync + 'static,
    {
        self.attach(pending, Definition::Derived(Box::new(f)), initial_value)
    }

    /// Attaches an Ito definition to a reserved slot.
    pub fn define_ito<D, V>(
        &mut self,
        pending: PendingVariable,
        drift: D,
        volatility: V,
        initial_value: f64,
    ) -> Result<StateVariable>
    where
        D: Fn(Time, &State) -> f64 + Send + Sync + 'static,
        V: Fn(Time, &State) -> f64 + Send + Sync + 'static,
    {
        let definition = Definition::Ito {
            drift: Box::new(drift),
            volatility: Box::new(volatility),
        };
        self.attach(pending, definition, initial_value)
    }

    fn push(&mut self, definition: Definition, initial_value: f64) -> StateVariable {
        let var = StateVariable::new(self.initial_values.len());
        debug!(index = var.index(), kind = definition.kind(), "registered state variable");
        self.initial_values.push(initial_value);
        self.definitions.push(definition);
        var
    }

    fn attach(
        &mut self,
        pending: PendingVariable,
        definition: Definition,
        initial_value: f64,
    ) -> Result<StateVariable> {
        let var = pending.var;
        let size = self.initial_values.len();
        // slot 0 is the driver and has no definition
        let slot = var
            .index()
            .checked_sub(1)
            .and_then(|k| self.definitions.get_mut(k))
            .ok_or(PathError::VariableOutOfRange {
                index: var.index(),
                size,
            })?;
        debug!(index = var.index(), kind = definition.kind(), "defined reserved variable");
        *slot = definition;
        self.initial_values[var.index()] = initial_value;
        Ok(var)
    }

    /// Standard normal draws needed for one path: one per grid transition.
    pub fn required_sample_count(&self) -> usize {
        self.time_grid.num_times().saturating_sub(1)
    }

    /// Generates one path, drawing the Brownian samples from `rng`.
    pub fn generate_path<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Path> {
        let samples: Vec<f64> = (0..self.required_sample_count())
            .map(|_| StandardNormal.sample(rng))
            .collect();
        self.generate_path_from_samples(&samples)
    }

    /// Generates one path from pre-drawn standard normal samples.
    ///
    /// `samples[i - 1]` drives the transition into time index `i`. Extra
    /// samples beyond [`required_sample_count`](Self::required_sample_count)
    /// are ignored.
    pub fn generate_path_from_samples(&self, samples: &[f64]) -> Result<Path> {
        let required = self.required_sample_count();
        if samples.len() < required {
            return Err(PathError::InsufficientSamples {
                required,
                supplied: samples.len(),
            });
        }
        if let Some(k) = self
            .definitions
            .iter()
            .position(|d| matches!(d, Definition::Pending))
        {
            return Err(PathError::UndefinedVariable { index: k + 1 });
        }

        let times = self.time_grid.times();
        debug!(
            num_times = times.len(),
            state_size = self.num_variables(),
            "generating path"
        );

        let mut path = Path::zeros(Arc::clone(&self.time_grid), self.num_variables());
        let initial = path.state_at_mut(0)?;
        for (i, value) in self.initial_values.iter().enumerate() {
            initial.set_value(StateVariable::new(i), *value)?;
        }

        let w = StateVariable::DRIVER;
        for it in 1..times.len() {
            let t = times[it];
            let dt = t - times[it - 1];
            let dw = samples[it - 1] * dt.sqrt();

            let (prev, cur) = path.transition_mut(it)?;
            cur.set_value(w, prev[w] + dw)?;

            for (k, definition) in self.definitions.iter().enumerate() {
                let var = StateVariable::new(k + 1);
                let value = match definition {
                    Definition::Derived(f) => f(t, &*cur),
                    Definition::Ito { drift, volatility } => {
                        prev[var] + dt * drift(t, prev) + dw * volatility(t, prev)
                    }
                    Definition::Pending => {
                        return Err(PathError::UndefinedVariable { index: var.index() })
                    }
                };
                cur.set_value(var, value)?;
            }
        }

        Ok(path)
    }

    /// Generates `n_paths` paths one after another from the same source.
    pub fn generate_paths<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_paths: usize,
    ) -> Result<Vec<Path>> {
        (0..n_paths).map(|_| self.generate_path(rng)).collect()
    }

    /// Generates `n_paths` paths in parallel with rayon.
    ///
    /// Path `i` is driven by its own `StdRng` seeded with `seed + i`, so the
    /// result depends only on `seed`, not on the number of threads.
    pub fn generate_paths_parallel(&self, n_paths: usize, seed: u64) -> Result<Vec<Path>> {
        (0..n_paths)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                self.generate_path(&mut rng)
            })
            .collect()
    }
}
