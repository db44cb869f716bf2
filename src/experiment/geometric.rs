//! Geometric Brownian motion, closed form against Ito integration
//!
//! Tracks two variables on the same driver:
//! - `GB = exp((mu - sigma²/2) t + sigma W)`, computed directly
//! - `IGB` with `dIGB = mu IGB dt + sigma IGB dW`, integrated step by step
//!
//! Both start from the same value, so their paths should stay close for
//! small steps. Rows are written as CSV: `path,time,gb,igb`.

use std::io::Write;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::{parse_args, Experiment, ExperimentError};
use crate::{StateVariable, Time, TimeGrid, WienerProcess};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "geometric-brownian",
    about = "Sample paths of closed-form and Ito-integrated geometric Brownian motion"
)]
pub struct GeometricArgs {
    /// First time point
    #[arg(long, default_value_t = 0.0)]
    pub t0: f64,
    /// Number of time points
    #[arg(long, default_value_t = 100)]
    pub num_times: usize,
    /// Time step
    #[arg(long, default_value_t = 0.03)]
    pub step: f64,
    /// Initial value of the driver
    #[arg(long, default_value_t = 0.0)]
    pub initial_w: f64,
    /// Drift
    #[arg(long, default_value_t = 1.0)]
    pub mu: f64,
    /// Volatility
    #[arg(long, default_value_t = 0.2)]
    pub sigma: f64,
    #[arg(long, default_value_t = 624)]
    pub seed: u64,
    /// Number of paths
    #[arg(long, default_value_t = 5)]
    pub paths: usize,
}

pub struct GeometricBrownian;

impl Experiment for GeometricBrownian {
    fn name(&self) -> &'static str {
        "geometric-brownian"
    }

    fn help(&self) -> String {
        GeometricArgs::command().render_help().to_string()
    }

    fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), ExperimentError> {
        let args: GeometricArgs = parse_args(self.name(), args)?;
        let grid = Arc::new(TimeGrid::uniform(args.t0, args.step, args.num_times));
        let mut process = WienerProcess::new(grid, args.initial_w);

        let (mu, sigma) = (args.mu, args.sigma);
        let closed_form =
            move |t: Time, w: f64| ((mu - 0.5 * sigma * sigma) * t + sigma * w).exp();
        let x0 = closed_form(args.t0, args.initial_w);

        let w = StateVariable::DRIVER;
        let gb = process.add_derived_variable(move |t, s| closed_form(t, s[w]), x0);

        let pending = process.reserve_variable();
        let igb = pending.variable();
        process.define_ito(
            pending,
            move |_, s| mu * s[igb],
            move |_, s| sigma * s[igb],
            x0,
        )?;

        let mut rng = StdRng::seed_from_u64(args.seed);
        writeln!(out, "path,time,gb,igb")?;
        for ipath in 0..args.paths {
            let path = process.generate_path(&mut rng)?;
            for (t, state) in path.times().iter().zip(path.states()) {
                writeln!(out, "{},{},{},{}", ipath, t, state[gb], state[igb])?;
            }
        }

        info!(
            paths = args.paths,
            num_times = args.num_times,
            "geometric brownian paths written"
        );
        Ok(())
    }
}
