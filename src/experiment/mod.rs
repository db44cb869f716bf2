//! Named experiments built on the path engine
//!
//! An [`ExperimentRegistry`] maps names to runnable [`Experiment`]s. The
//! registry is a plain value handed to the entry point; nothing registers
//! itself globally.

use std::collections::BTreeMap;
use std::io::Write;

use clap::Parser;
use thiserror::Error;

use crate::error::PathError;

pub mod geometric;
pub mod ito_identity;

pub use geometric::GeometricBrownian;
pub use ito_identity::ItoIdentity;

/// Errors raised while looking up or running an experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("could not find experiment by the name '{0}'")]
    Unknown(String),

    /// Bad experiment arguments, or a request for its help text
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("simulation failed: {0}")]
    Simulation(#[from] PathError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// A runnable unit that writes its results to `out`.
pub trait Experiment: Send + Sync {
    fn name(&self) -> &'static str;

    /// Full help text, including the experiment's own options.
    fn help(&self) -> String;

    /// Runs with `args`, the arguments given after `--` on the command line.
    fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), ExperimentError>;
}

/// Parses experiment arguments with the experiment name as `argv[0]`.
pub(crate) fn parse_args<A: Parser>(name: &str, args: &[String]) -> Result<A, ExperimentError> {
    let argv = std::iter::once(name.to_string()).chain(args.iter().cloned());
    Ok(A::try_parse_from(argv)?)
}

/// Name-ordered collection of experiments.
#[derive(Default)]
pub struct ExperimentRegistry {
    experiments: BTreeMap<&'static str, Box<dyn Experiment>>,
}

impl ExperimentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every experiment shipped with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GeometricBrownian));
        registry.register(Box::new(ItoIdentity));
        registry
    }

    /// Adds an experiment, returning the one it replaced, if any.
    pub fn register(&mut self, experiment: Box<dyn Experiment>) -> Option<Box<dyn Experiment>> {
        self.experiments.insert(experiment.name(), experiment)
    }

    /// Looks up an experiment by name.
    pub fn find(&self, name: &str) -> Result<&dyn Experiment, ExperimentError> {
        self.experiments
            .get(name)
            .map(|e| e.as_ref())
            .ok_or_else(|| ExperimentError::Unknown(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.experiments.keys().copied()
    }

    /// Writes the help text of every registered experiment.
    pub fn write_help(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Help for all available experiments:\n")?;
        for experiment in self.experiments.values() {
            writeln!(out, "{}", experiment.name())?;
            writeln!(out, "{}\n", experiment.help())?;
        }
        Ok(())
    }

    /// Number of registered experiments.
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Experiment for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn help(&self) -> String {
            "Writes its arguments back".to_string()
        }

        fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), ExperimentError> {
            writeln!(out, "{}", args.join(" "))?;
            Ok(())
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ExperimentRegistry::with_builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["geometric-brownian", "ito-identity"]);
    }

    #[test]
    fn test_find_unknown() {
        let registry = ExperimentRegistry::with_builtin();
        let err = registry.find("nope").err().unwrap();
        assert_eq!(err.to_string(), "could not find experiment by the name 'nope'");
    }

    #[test]
    fn test_register_and_run() {
        let mut registry = ExperimentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(Box::new(Echo)).is_none());
        assert!(registry.register(Box::new(Echo)).is_some());
        assert_eq!(registry.len(), 1);

        let mut out = Vec::new();
        registry
            .find("echo")
            .unwrap()
            .run(&["a".to_string(), "b".to_string()], &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a b\n");
    }

    #[test]
    fn test_write_help_lists_all() {
        let registry = ExperimentRegistry::with_builtin();
        let mut out = Vec::new();
        registry.write_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("geometric-brownian"));
        assert!(text.contains("ito-identity"));
    }
}
