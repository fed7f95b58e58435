//! Goodness-of-fit scores for comparing simulated to observed streamflow.
//!
//! Both scores are maximised, a perfect fit scores 1.0.  Callers select matching windows of the
//! observed and simulated series before scoring, see [Window](../window/struct.Window.html).
use crate::utils;
use log::warn;

/// Score of a parameter set that has not been evaluated, or of a simulation too degenerate to
/// score.  Lower than any real Kling-Gupta or Nash-Sutcliffe efficiency the calibrators expect.
pub const SENTINEL: f64 = -9999.0;

/// Kling-Gupta efficiency of `simulated` against `observed`.
///
/// Combines the Pearson correlation `r`, the variability ratio `alpha` (population standard
/// deviations) and the bias ratio `beta`:
/// `1 - sqrt((r - 1)^2 + (alpha - 1)^2 + (beta - 1)^2)`.
///
/// Returns [SENTINEL](constant.SENTINEL.html) when the simulated series has zero variance.
/// Both series must be the same length, otherwise the score is `NaN` and a warning is logged.
///
/// # Examples
///
/// ```rust
/// let obs = vec![1.0, 3.0, 2.0, 5.0];
/// assert_eq!(exphydro::objective::kling_gupta(&obs, &obs), 1.0);
/// ```
pub fn kling_gupta(observed: &[f64], simulated: &[f64]) -> f64 {
    if !same_length(observed, simulated) {
        return f64::NAN;
    }
    let xbar = utils::mean(observed);
    let ybar = utils::mean(simulated);
    let n = observed.len() as f64;

    let numer: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(x, y)| (x - xbar) * (y - ybar))
        .sum();
    let denom1 = utils::sum_squares(observed, xbar);
    let denom2 = utils::sum_squares(simulated, ybar);

    if denom2 == 0.0 {
        return SENTINEL;
    }

    let r = numer / (denom1 * denom2).sqrt();
    let alpha = (denom2 / n).sqrt() / (denom1 / n).sqrt();
    let beta = ybar / xbar;
    1.0 - ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt()
}

/// Nash-Sutcliffe efficiency of `simulated` against `observed`.
///
/// `1 - sum((obs - sim)^2) / sum((obs - mean(obs))^2)`.
///
/// There is no guard for a constant observed series: the score is `-inf` when the simulation
/// differs from it and `NaN` when it matches exactly.  Neither beats a finite best score in a
/// calibration.  Series of different lengths also score `NaN`, as for
/// [kling_gupta](fn.kling_gupta.html).
pub fn nash_sutcliffe(observed: &[f64], simulated: &[f64]) -> f64 {
    if !same_length(observed, simulated) {
        return f64::NAN;
    }
    let numer: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    let denom = utils::sum_squares(observed, utils::mean(observed));
    1.0 - numer / denom
}

fn same_length(observed: &[f64], simulated: &[f64]) -> bool {
    if observed.len() != simulated.len() {
        warn!(
            "Observed series of {} days does not match simulated series of {} days",
            observed.len(),
            simulated.len()
        );
        return false;
    }
    true
}
