//! State vectors
//!
//! A [`State`] holds one instant's value for every tracked variable. Slots
//! are addressed by [`StateVariable`] handles handed out by the engine;
//! slot 0 always belongs to the Wiener driver.

use std::ops::Index;

use crate::error::{PathError, Result};

/// Index of a tracked quantity inside a [`State`].
///
/// Handles are only meaningful for states produced by the engine that
/// returned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateVariable(usize);

impl StateVariable {
    /// The Wiener driver's slot.
    pub const DRIVER: StateVariable = StateVariable(0);

    /// Handle for slot `index`.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Slot position inside a state.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Fixed-length vector of real values, one per registered variable.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    values: Vec<f64>,
}

impl State {
    /// All-zero state with `size` slots.
    pub fn zeros(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// State seeded from explicit values; its size is `values.len()`.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of slots.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Returns the value stored for `var`, or a range error.
    pub fn value_at(&self, var: StateVariable) -> Result<f64> {
        self.values
            .get(var.0)
            .copied()
            .ok_or(PathError::VariableOutOfRange {
                index: var.0,
                size: self.values.len(),
            })
    }

    /// Overwrites the value stored for `var`.
    pub fn set_value(&mut self, var: StateVariable, value: f64) -> Result<()> {
        let size = self.values.len();
        let slot = self
            .values
            .get_mut(var.0)
            .ok_or(PathError::VariableOutOfRange { index: var.0, size })?;
        *slot = value;
        Ok(())
    }

    /// All values in slot order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Panicking access for use inside variable definitions, where a bad
/// handle is a programming error in the same way a bad slice index is.
impl Index<StateVariable> for State {
    type Output = f64;

    fn index(&self, var: StateVariable) -> &f64 {
        &self.values[var.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_state() {
        let mut state = State::zeros(5);
        assert_eq!(state.num_values(), 5);
        for i in 0..5 {
            let var = StateVariable::new(i);
            assert_eq!(state.value_at(var).unwrap(), 0.0);
            state.set_value(var, i as f64).unwrap();
            assert_eq!(state.value_at(var).unwrap(), i as f64);
        }
    }

    #[test]
    fn test_state_from_values() {
        let values = vec![1.0, 2.71828, 3.14159];
        let mut state = State::from_values(values.clone());
        assert_eq!(state.num_values(), values.len());
        for (i, v) in values.iter().enumerate() {
            let var = StateVariable::new(i);
            assert_eq!(state.value_at(var).unwrap(), *v);
            assert_eq!(state[var], *v);
            state.set_value(var, i as f64).unwrap();
            assert_eq!(state.value_at(var).unwrap(), i as f64);
        }
    }

    #[test]
    fn test_variable_out_of_range() {
        let mut state = State::zeros(2);
        let var = StateVariable::new(2);
        assert_eq!(
            state.value_at(var),
            Err(PathError::VariableOutOfRange { index: 2, size: 2 })
        );
        assert!(state.set_value(var, 1.0).is_err());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let state = State::zeros(1);
        let _ = state[StateVariable::new(1)];
    }

    #[test]
    fn test_driver_is_slot_zero() {
        assert_eq!(StateVariable::DRIVER.index(), 0);
        assert_eq!(StateVariable::DRIVER, StateVariable::new(0));
    }

    proptest! {
        #[test]
        fn set_then_get_returns_written_value(
            size in 1usize..64,
            slot in 0usize..64,
            value in proptest::num::f64::ANY,
        ) {
            let var = StateVariable::new(slot % size);
            let mut state = State::zeros(size);
            state.set_value(var, value).unwrap();
            let read = state.value_at(var).unwrap();
            prop_assert!(read == value || (read.is_nan() && value.is_nan()));
        }
    }
}
