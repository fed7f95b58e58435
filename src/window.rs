//! Index windows selecting the calibration or validation period of a series.
use crate::errors::HydroError;

/// A run of days `start..=end` within a daily series.  Both ends are inclusive.
///
/// Observed and simulated series may be offset from one another, so calibration takes one window
/// for each.  The two windows must cover the same number of days.
///
/// # Examples
/// ```
/// use exphydro::prelude::*;
/// let win = Window::new(2, 4)?;
/// let q = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(win.slice(&q)?, &[2.0, 3.0, 4.0]);
/// # Ok::<(), HydroError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: usize,
    end: usize,
}

impl Window {
    /// Window over days `start` through `end`, inclusive.
    pub fn new(start: usize, end: usize) -> Result<Self, HydroError> {
        if end < start {
            return Err(HydroError::WindowOrder { start, end });
        }
        Ok(Window { start, end })
    }

    /// Window from `start` through the last day of a series of length `len`.
    pub fn from_start(start: usize, len: usize) -> Result<Self, HydroError> {
        if len == 0 {
            return Err(HydroError::EmptySeries);
        }
        Window::new(start, len - 1)
    }

    /// First day of the window.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last day of the window (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of days in the window.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false, a window holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Select the window from `series`.  Fails if the window runs past the end of the series.
    pub fn slice<'a>(&self, series: &'a [f64]) -> Result<&'a [f64], HydroError> {
        if self.end >= series.len() {
            return Err(HydroError::WindowRange {
                end: self.end,
                len: series.len(),
            });
        }
        Ok(&series[self.start..=self.end])
    }

    /// Check that `self` and `other` cover the same number of days.
    pub fn matches(&self, other: &Window) -> Result<(), HydroError> {
        if self.len() != other.len() {
            return Err(HydroError::WindowMismatch {
                observed: self.len(),
                simulated: other.len(),
            });
        }
        Ok(())
    }
}
