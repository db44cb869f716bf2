//! Simulated paths
//!
//! A [`Path`] is one [`State`] per time point of a shared [`TimeGrid`].

use std::sync::Arc;

use crate::error::{PathError, Result};
use crate::state::{State, StateVariable};
use crate::time::{Time, TimeGrid};

/// Sequence of states aligned 1:1 with a time grid.
///
/// The path owns its states; the grid is shared read-only with the engine
/// that produced it and with every other path of that engine.
#[derive(Debug, Clone)]
pub struct Path {
    time_grid: Arc<TimeGrid>,
    state_size: usize,
    states: Vec<State>,
}

impl Path {
    /// Allocates a path of zero states, one per grid point.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use wiener_paths::{Path, TimeGrid};
    ///
    /// let grid = Arc::new(TimeGrid::uniform(0.0, 0.1, 3));
    /// let path = Path::zeros(grid, 2);
    /// assert_eq!(path.num_times(), 3);
    /// assert_eq!(path.state_size(), 2);
    /// ```
    pub fn zeros(time_grid: Arc<TimeGrid>, state_size: usize) -> Self {
        let states = (0..time_grid.num_times())
            .map(|_| State::zeros(state_size))
            .collect();
        Self {
            time_grid,
            state_size,
            states,
        }
    }

    /// Number of time points, equal to the grid's.
    pub fn num_times(&self) -> usize {
        self.states.len()
    }

    /// Number of values held by each state.
    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// Grid the path was generated against.
    pub fn time_grid(&self) -> &Arc<TimeGrid> {
        &self.time_grid
    }

    /// Time at `index`, read from the grid.
    pub fn time_at(&self, index: usize) -> Result<Time> {
        self.time_grid.time_at(index)
    }

    /// All time points of the grid.
    pub fn times(&self) -> &[Time] {
        self.time_grid.times()
    }

    /// State at time index `index`, or a range error.
    pub fn state_at(&self, index: usize) -> Result<&State> {
        let len = self.states.len();
        self.states
            .get(index)
            .ok_or(PathError::TimeIndexOutOfRange { index, len })
    }

    /// Mutable state at time index `index`, or a range error.
    pub fn state_at_mut(&mut self, index: usize) -> Result<&mut State> {
        let len = self.states.len();
        self.states
            .get_mut(index)
            .ok_or(PathError::TimeIndexOutOfRange { index, len })
    }

    /// Borrows the state before `index` immutably and the state at `index`
    /// mutably, which is what one integration step needs.
    pub(crate) fn transition_mut(&mut self, index: usize) -> Result<(&State, &mut State)> {
        let len = self.states.len();
        if index == 0 || index >= len {
            return Err(PathError::TimeIndexOutOfRange { index, len });
        }
        let (done, rest) = self.states.split_at_mut(index);
        Ok((&done[index - 1], &mut rest[0]))
    }

    /// All states in time order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// State at the last time point, if the path is not empty.
    pub fn final_state(&self) -> Option<&State> {
        self.states.last()
    }

    /// Collects one variable's values across all time points.
    pub fn values_of(&self, var: StateVariable) -> Result<Vec<f64>> {
        self.states.iter().map(|s| s.value_at(var)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_path() {
        let num_times = 3;
        let state_size = 2;
        let grid = Arc::new(TimeGrid::uniform(0.0, 0.1, num_times));
        let mut path = Path::zeros(Arc::clone(&grid), state_size);

        assert_eq!(path.num_times(), num_times);
        assert_eq!(path.state_size(), state_size);

        for it in 0..num_times {
            assert_eq!(path.state_at(it).unwrap().num_values(), state_size);
            assert_eq!(path.time_at(it).unwrap(), grid.time_at(it).unwrap());
            for iv in 0..state_size {
                let var = StateVariable::new(iv);
                let new_value = (it + iv * num_times) as f64;
                assert_eq!(path.state_at(it).unwrap().value_at(var).unwrap(), 0.0);
                path.state_at_mut(it).unwrap().set_value(var, new_value).unwrap();
                assert_eq!(path.state_at(it).unwrap().value_at(var).unwrap(), new_value);
            }
        }
    }

    #[test]
    fn test_out_of_range_state() {
        let grid = Arc::new(TimeGrid::uniform(0.0, 0.1, 3));
        let mut path = Path::zeros(grid, 1);
        assert_eq!(
            path.state_at(3).unwrap_err(),
            PathError::TimeIndexOutOfRange { index: 3, len: 3 }
        );
        assert!(path.state_at_mut(5).is_err());
        assert!(path.time_at(3).is_err());
    }

    #[test]
    fn test_transition_borrows_neighbours() {
        let grid = Arc::new(TimeGrid::uniform(0.0, 1.0, 3));
        let mut path = Path::zeros(grid, 1);
        path.state_at_mut(0)
            .unwrap()
            .set_value(StateVariable::DRIVER, 4.0)
            .unwrap();

        let (prev, cur) = path.transition_mut(1).unwrap();
        cur.set_value(StateVariable::DRIVER, prev[StateVariable::DRIVER] + 1.0)
            .unwrap();

        assert_eq!(path.values_of(StateVariable::DRIVER).unwrap(), vec![4.0, 5.0, 0.0]);
        assert!(path.transition_mut(0).is_err());
        assert!(path.transition_mut(3).is_err());
    }

    #[test]
    fn test_values_of_bad_variable() {
        let grid = Arc::new(TimeGrid::uniform(0.0, 1.0, 2));
        let path = Path::zeros(grid, 1);
        assert_eq!(
            path.values_of(StateVariable::new(1)),
            Err(PathError::VariableOutOfRange { index: 1, size: 1 })
        );
    }
}
