//! Monte Carlo check of the Ito identity `W² - t = ∫ 2W dW`
//!
//! Registers `f1 = W² - t` as a derived variable, `df2 = 2W dW` as an Ito
//! process and `f3 = f1 - f2` as a derived variable reading both. The mean
//! terminal `f3` over many paths should be close to zero.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::{parse_args, Experiment, ExperimentError};
use crate::{StateVariable, TimeGrid, WienerProcess};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ito-identity",
    about = "Mean terminal value of (W² - t) - ∫2W dW over many paths"
)]
pub struct ItoIdentityArgs {
    /// First time point
    #[arg(long, default_value_t = 0.0)]
    pub t0: f64,
    /// Number of time points
    #[arg(long, default_value_t = 1000)]
    pub num_times: usize,
    /// Time step
    #[arg(long, default_value_t = 1e-3)]
    pub step: f64,
    #[arg(long, default_value_t = 1984)]
    pub seed: u64,
    /// Number of paths, at least one
    #[arg(long, default_value = "100")]
    pub paths: NonZeroUsize,
    /// Generate paths on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,
}

/// The three variables of the identity, registered on a fresh engine.
pub struct ItoIdentityModel {
    pub process: WienerProcess,
    pub f1: StateVariable,
    pub f2: StateVariable,
    pub f3: StateVariable,
}

impl ItoIdentityModel {
    pub fn new(t0: f64, step: f64, num_times: usize) -> Self {
        let w0 = 0.0;
        let grid = Arc::new(TimeGrid::uniform(t0, step, num_times));
        let mut process = WienerProcess::new(grid, w0);
        let w = StateVariable::DRIVER;

        let f1 = process.add_derived_variable(move |t, s| s[w] * s[w] - t, w0 * w0 - t0);
        let f2 = process.add_ito_process(|_, _| 0.0, move |_, s| 2.0 * s[w], w0 * w0 - t0);
        let f3 = process.add_derived_variable(move |_, s| s[f1] - s[f2], 0.0);

        Self { process, f1, f2, f3 }
    }

    /// Mean terminal `f3` over `paths` paths seeded from `seed`.
    ///
    /// Fails if any path has no terminal state, i.e. on an empty grid.
    pub fn mean_terminal_gap(
        &self,
        paths: NonZeroUsize,
        seed: u64,
        parallel: bool,
    ) -> crate::Result<f64> {
        let generated = if parallel {
            self.process.generate_paths_parallel(paths.get(), seed)?
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            self.process.generate_paths(&mut rng, paths.get())?
        };

        let sum = generated
            .iter()
            .map(|p| Ok(p.state_at(p.num_times().saturating_sub(1))?[self.f3]))
            .sum::<crate::Result<f64>>()?;
        Ok(sum / generated.len() as f64)
    }
}

pub struct ItoIdentity;

impl Experiment for ItoIdentity {
    fn name(&self) -> &'static str {
        "ito-identity"
    }

    fn help(&self) -> String {
        ItoIdentityArgs::command().render_help().to_string()
    }

    fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), ExperimentError> {
        let args: ItoIdentityArgs = parse_args(self.name(), args)?;
        let model = ItoIdentityModel::new(args.t0, args.step, args.num_times);
        let mean = model.mean_terminal_gap(args.paths, args.seed, args.parallel)?;

        info!(paths = args.paths.get(), mean, "ito identity check finished");
        writeln!(out, "paths,mean_terminal_gap")?;
        writeln!(out, "{},{}", args.paths, mean)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let model = ItoIdentityModel::new(0.0, 1e-3, 10);
        assert_eq!(model.f1.index(), 1);
        assert_eq!(model.f2.index(), 2);
        assert_eq!(model.f3.index(), 3);
    }

    #[test]
    fn test_gap_with_fixed_samples() {
        // one step of size 1: f1 = z² - 1, f2 = 0 + 2 * 0 * z = 0
        let model = ItoIdentityModel::new(0.0, 1.0, 2);
        let path = model.process.generate_path_from_samples(&[3.0]).unwrap();
        let last = path.final_state().unwrap();
        assert_eq!(last[model.f1], 8.0);
        assert_eq!(last[model.f2], 0.0);
        assert_eq!(last[model.f3], 8.0);
    }

    #[test]
    fn test_parallel_mean_near_zero() {
        let model = ItoIdentityModel::new(0.0, 1e-3, 1000);
        let paths = NonZeroUsize::new(100).unwrap();
        let mean = model.mean_terminal_gap(paths, 1984, true).unwrap();
        assert!(mean.abs() < 0.1, "mean terminal gap = {}", mean);
    }

    #[test]
    fn test_run_writes_summary() {
        let args: Vec<String> = ["--paths", "10", "--num-times", "200"]
            .iter()
            .map(|a| a.to_string())
            .collect();
        let mut out = Vec::new();
        ItoIdentity.run(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "paths,mean_terminal_gap");
        assert!(lines[1].starts_with("10,"));
    }

    #[test]
    fn test_zero_paths_rejected() {
        let args = vec!["--paths".to_string(), "0".to_string()];
        let mut out = Vec::new();
        assert!(matches!(
            ItoIdentity.run(&args, &mut out),
            Err(ExperimentError::Args(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_sequential_and_parallel_average_every_path() {
        let model = ItoIdentityModel::new(0.0, 1e-2, 50);
        let paths = NonZeroUsize::new(7).unwrap();
        let mean = model.mean_terminal_gap(paths, 3, false).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let generated = model.process.generate_paths(&mut rng, 7).unwrap();
        let expected = generated
            .iter()
            .map(|p| p.final_state().unwrap()[model.f3])
            .sum::<f64>()
            / 7.0;
        assert_eq!(mean, expected);
        assert!(mean.is_finite());
    }

    #[test]
    fn test_empty_grid_is_an_error() {
        let model = ItoIdentityModel::new(0.0, 1e-2, 0);
        let paths = NonZeroUsize::new(2).unwrap();
        assert!(model.mean_terminal_gap(paths, 1, false).is_err());
    }
}
