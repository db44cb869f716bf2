//! Time grids
//!
//! A [`TimeGrid`] is the ordered set of time points a path is simulated on.
//! Simulation assumes non-decreasing values, since every step uses
//! `dt = t[i] - t[i-1]`, but no ordering is enforced here.

use crate::error::{PathError, Result};

/// A point in time, in the same units as the grid step.
pub type Time = f64;

/// Ordered, indexed sequence of time points.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
}

impl TimeGrid {
    /// Creates a grid from explicit time points.
    ///
    /// # Example
    /// ```
    /// use wiener_paths::TimeGrid;
    ///
    /// let grid = TimeGrid::from_times(vec![0.0, 0.1, 0.2, 3.14]);
    /// assert_eq!(grid.num_times(), 4);
    /// ```
    pub fn from_times(times: Vec<Time>) -> Self {
        Self { times }
    }

    /// Creates a uniform grid with `t[i] = start + step * i`.
    ///
    /// Each point is computed directly from its index rather than by
    /// repeated addition, so there is no accumulated rounding drift.
    ///
    /// # Arguments
    /// * `start` - First time point
    /// * `step` - Spacing between consecutive points
    /// * `num_times` - Number of points
    pub fn uniform(start: Time, step: Time, num_times: usize) -> Self {
        let times = (0..num_times).map(|i| start + step * i as f64).collect();
        Self { times }
    }

    /// Number of time points.
    pub fn num_times(&self) -> usize {
        self.times.len()
    }

    /// True when the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the time at `index`, or a range error.
    pub fn time_at(&self, index: usize) -> Result<Time> {
        self.times
            .get(index)
            .copied()
            .ok_or(PathError::TimeIndexOutOfRange {
                index,
                len: self.times.len(),
            })
    }

    /// Overwrites the time at `index`.
    ///
    /// Meant for building grids by hand; a grid shared with an engine sits
    /// behind an `Arc` and cannot be changed while paths are generated.
    pub fn set_time_at(&mut self, index: usize, t: Time) -> Result<()> {
        let len = self.times.len();
        let slot = self
            .times
            .get_mut(index)
            .ok_or(PathError::TimeIndexOutOfRange { index, len })?;
        *slot = t;
        Ok(())
    }

    /// All time points in order.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Last time point, if any.
    pub fn final_time(&self) -> Option<Time> {
        self.times.last().copied()
    }
}
