//! Calibration of model parameters by Particle Swarm Optimisation and Monte Carlo search.
//!
//! Both searches maximise an objective function such as
//! [kling_gupta](../objective/fn.kling_gupta.html) over a calibration window.  They work with any
//! model implementing [Simulate](trait.Simulate.html) whose parameters implement
//! [Particle](trait.Particle.html), so lumped and distributed models calibrate the same way.
use crate::errors::HydroError;
use crate::window::Window;
use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

/// A model that produces a simulated series for a parameter set.
pub trait Simulate {
    /// Parameter set accepted by the model.
    type Params: Particle;

    /// Run the model with `params` and return the simulated series.
    fn simulate(&mut self, params: &Self::Params) -> Result<&[f64], HydroError>;
}

/// A parameter set that can take part in a swarm.
pub trait Particle: Clone {
    /// Objective function value of the last evaluation.
    fn objective(&self) -> f64;

    /// Record the objective function value of an evaluation.
    fn set_objective(&mut self, value: f64);

    /// Move every parameter towards the particle best `personal` and the swarm best `swarm`, with
    /// inertia weight `w`.
    fn update<R: Rng>(&mut self, personal: &Self, swarm: &Self, w: f64, rng: &mut R);
}

/// Best objective function value after one swarm iteration or Monte Carlo sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Iteration number, counting from 1.
    pub iteration: usize,
    /// Best objective function value so far.
    pub best: f64,
}

/// Result of a calibration: the best parameter set and the search history.
#[derive(Debug, Clone)]
pub struct Fit<P> {
    /// Best parameter set found, carrying its objective function value.
    pub best: P,
    /// Best objective function value after each iteration.
    pub history: Vec<Progress>,
}

/// Settings for the calibration searches.
///
/// Use the builder methods to change the defaults: 50 swarm iterations, stop after 5 iterations
/// improving by less than `1e-3`, inertia decaying linearly from 0.9 to 0.4.
///
/// # Examples
/// ```
/// use exphydro::prelude::*;
/// let cal = Calibration::new().iterations(100).tolerance(1e-4).stall_limit(10);
/// assert_eq!(cal.max_iterations(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    iterations: usize,
    tolerance: f64,
    stall_limit: usize,
    w_init: f64,
    w_end: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            iterations: 50,
            tolerance: 1e-3,
            stall_limit: 5,
            w_init: 0.9,
            w_end: 0.4,
        }
    }
}

impl Calibration {
    /// Calibration with default settings.
    pub fn new() -> Self {
        Calibration::default()
    }

    /// Maximum number of swarm iterations, at least one.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Smallest improvement of the swarm best that counts as progress.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Number of consecutive iterations without progress that ends the search.
    pub fn stall_limit(mut self, stall_limit: usize) -> Self {
        self.stall_limit = stall_limit;
        self
    }

    /// Inertia weight at the first and the last swarm iteration.
    pub fn inertia(mut self, w_init: f64, w_end: f64) -> Self {
        self.w_init = w_init;
        self.w_end = w_end;
        self
    }

    /// Maximum number of swarm iterations.
    pub fn max_iterations(&self) -> usize {
        self.iterations
    }

    /// Maximise `objf` with a particle swarm.
    ///
    /// Every particle in `params` is simulated and scored on each iteration, in order.  A
    /// particle that beats its own best, or the swarm best, is copied into that snapshot before
    /// it moves, so later particles in the same iteration already see the new swarm best.  The
    /// swarm best starts as a copy of the first particle.
    ///
    ///  - `observed` is scored over `obs_window`, the simulation over `sim_window`.  Both
    ///    windows must cover the same number of days.
    ///  - `rng` supplies the random weights of every velocity update.
    pub fn pso<M, F, R>(
        &self,
        model: &mut M,
        params: &mut [M::Params],
        observed: &[f64],
        objf: F,
        obs_window: Window,
        sim_window: Window,
        rng: &mut R,
    ) -> Result<Fit<M::Params>, HydroError>
    where
        M: Simulate,
        F: Fn(&[f64], &[f64]) -> f64,
        R: Rng,
    {
        check(params.len(), observed, obs_window, sim_window)?;

        let mut personal = params.to_vec();
        let mut swarm = params[0].clone();
        let mut history: Vec<Progress> = Vec::with_capacity(self.iterations);
        let mut w = self.w_init;
        let mut stall = 0;

        for j in 0..self.iterations {
            for i in 0..params.len() {
                let objval = score(model, &params[i], observed, &objf, obs_window, sim_window)?;
                params[i].set_objective(objval);
                debug!("Swarm iteration {}, particle {}: objective {}", j + 1, i + 1, objval);

                if objval > personal[i].objective() {
                    personal[i] = params[i].clone();
                }
                if objval > swarm.objective() {
                    swarm = params[i].clone();
                }

                params[i].update(&personal[i], &swarm, w, rng);
            }

            let best = swarm.objective();
            info!("Swarm iteration: {}, Best objfun value: {}", j + 1, best);
            if j > 0 && best - history[j - 1].best < self.tolerance {
                stall += 1;
            } else if j > 0 {
                stall = 0;
            }
            history.push(Progress {
                iteration: j + 1,
                best,
            });

            if stall == self.stall_limit {
                info!(
                    "Stopping after {} iterations without improvement of {}",
                    stall, self.tolerance
                );
                break;
            }

            if self.iterations > 1 {
                w -= (self.w_init - self.w_end) / (self.iterations - 1) as f64;
            }
        }

        Ok(Fit {
            best: swarm,
            history,
        })
    }

    /// Maximise `objf` by scoring each parameter set in `params` once and keeping the best.
    ///
    /// The objective of every set is recorded in place, so the whole sample can be inspected or
    /// written out afterwards.  Arguments as for [pso](#method.pso).
    pub fn montecarlo<M, F>(
        &self,
        model: &mut M,
        params: &mut [M::Params],
        observed: &[f64],
        objf: F,
        obs_window: Window,
        sim_window: Window,
    ) -> Result<Fit<M::Params>, HydroError>
    where
        M: Simulate,
        F: Fn(&[f64], &[f64]) -> f64,
    {
        check(params.len(), observed, obs_window, sim_window)?;

        let mut best: Option<M::Params> = None;
        let mut history = Vec::with_capacity(params.len());
        for (i, set) in params.iter_mut().enumerate() {
            let objval = score(model, set, observed, &objf, obs_window, sim_window)?;
            set.set_objective(objval);

            let improved = match &best {
                Some(b) => objval > b.objective(),
                None => true,
            };
            if improved {
                best = Some(set.clone());
            }
            let top = best.as_ref().map_or(objval, |b| b.objective());
            info!("Iteration: {}, Best objfun value: {}", i + 1, top);
            history.push(Progress {
                iteration: i + 1,
                best: top,
            });
        }

        let best = best.ok_or(HydroError::EmptyPopulation)?;
        Ok(Fit { best, history })
    }
}

// validate the population and windows before any simulation runs
fn check(
    population: usize,
    observed: &[f64],
    obs_window: Window,
    sim_window: Window,
) -> Result<(), HydroError> {
    if population == 0 {
        return Err(HydroError::EmptyPopulation);
    }
    obs_window.matches(&sim_window)?;
    obs_window.slice(observed)?;
    Ok(())
}

fn score<M, F>(
    model: &mut M,
    params: &M::Params,
    observed: &[f64],
    objf: &F,
    obs_window: Window,
    sim_window: Window,
) -> Result<f64, HydroError>
where
    M: Simulate,
    F: Fn(&[f64], &[f64]) -> f64,
{
    let simdata = model.simulate(params)?;
    let objval = objf(obs_window.slice(observed)?, sim_window.slice(simdata)?);
    if objval.is_nan() {
        warn!("Objective function is NaN, is the observed series constant?");
    }
    Ok(objval)
}

/// Maximise `objf` with a particle swarm using the default [Calibration](struct.Calibration.html)
/// settings, returning the best parameter set.
pub fn pso_maximise<M, F, R>(
    model: &mut M,
    params: &mut [M::Params],
    observed: &[f64],
    objf: F,
    obs_window: Window,
    sim_window: Window,
    rng: &mut R,
) -> Result<M::Params, HydroError>
where
    M: Simulate,
    F: Fn(&[f64], &[f64]) -> f64,
    R: Rng,
{
    Calibration::new()
        .pso(model, params, observed, objf, obs_window, sim_window, rng)
        .map(|fit| fit.best)
}

/// Maximise `objf` by Monte Carlo search over `params`, returning the best parameter set.
pub fn montecarlo_maximise<M, F>(
    model: &mut M,
    params: &mut [M::Params],
    observed: &[f64],
    objf: F,
    obs_window: Window,
    sim_window: Window,
) -> Result<M::Params, HydroError>
where
    M: Simulate,
    F: Fn(&[f64], &[f64]) -> f64,
{
    Calibration::new()
        .montecarlo(model, params, observed, objf, obs_window, sim_window)
        .map(|fit| fit.best)
}
