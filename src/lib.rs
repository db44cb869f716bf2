//! # Wiener Paths
//!
//! Monte Carlo sample paths of quantities driven by a single Brownian motion.
//!
//! A [`WienerProcess`] owns the driver `W` and any number of variables
//! layered on top of it, each either derived directly from the current
//! state or integrated as an Ito process. Every call to
//! [`WienerProcess::generate_path`] yields one independent [`Path`]: a
//! [`State`] per point of a shared [`TimeGrid`].
//!
//! ## Modules
//!
//! - [`time`] - Time grids
//! - [`state`] - State vectors and variable handles
//! - [`path`] - Simulated paths
//! - [`wiener`] - The Euler-Maruyama path engine
//! - [`experiment`] - Named experiments run by the `wiener-paths` binary
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rand::{rngs::StdRng, SeedableRng};
//! use wiener_paths::{StateVariable, TimeGrid, WienerProcess};
//!
//! let grid = Arc::new(TimeGrid::uniform(0.0, 1.0 / 252.0, 253));
//! let mut process = WienerProcess::new(grid, 0.0);
//!
//! // Geometric Brownian motion as an Ito process: dS = mu S dt + sigma S dW
//! let (mu, sigma) = (0.05, 0.2);
//! let pending = process.reserve_variable();
//! let s = pending.variable();
//! process
//!     .define_ito(pending, move |_, x| mu * x[s], move |_, x| sigma * x[s], 100.0)
//!     .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let path = process.generate_path(&mut rng).unwrap();
//! println!("Final price: {:.2}", path.final_state().unwrap()[s]);
//! # assert_eq!(path.state_at(0).unwrap()[StateVariable::DRIVER], 0.0);
//! ```

pub mod error;
pub mod experiment;
pub mod path;
pub mod state;
pub mod time;
pub mod wiener;

pub use error::{PathError, Result};
pub use path::Path;
pub use state::{State, StateVariable};
pub use time::{Time, TimeGrid};
pub use wiener::{PendingVariable, StateFunction, WienerProcess};
