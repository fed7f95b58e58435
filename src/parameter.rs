//! Bounded model parameters and the particle swarm update rule.
use crate::calibration::Particle;
use crate::errors::HydroError;
use crate::objective::SENTINEL;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::Distribution;
use serde::Serialize;

/// Bounds of the baseflow recession parameter `f` (1/mm).
pub const F_BOUNDS: (f64, f64) = (0.0, 0.1);
/// Bounds of the soil bucket capacity `smax` (mm).
pub const SMAX_BOUNDS: (f64, f64) = (100.0, 1500.0);
/// Bounds of the maximum baseflow `qmax` (mm/day).
pub const QMAX_BOUNDS: (f64, f64) = (10.0, 50.0);
/// Bounds of the degree-day factor `ddf` (mm/day/deg C).
pub const DDF_BOUNDS: (f64, f64) = (0.0, 5.0);
/// Bounds of the snowfall threshold `mint` (deg C).
pub const MINT_BOUNDS: (f64, f64) = (-3.0, 0.0);
/// Bounds of the snowmelt threshold `maxt` (deg C).
pub const MAXT_BOUNDS: (f64, f64) = (0.0, 3.0);

// cognitive and social acceleration
const C1: f64 = 2.0;
const C2: f64 = 2.0;
// damping applied to a velocity that would carry a value out of bounds
const SAFETY: f64 = 0.9;

/// A scalar parameter bounded by `[lower, upper]`, with a velocity for particle swarm searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    lower: f64,
    upper: f64,
    value: f64,
    velocity: f64,
}

impl Parameter {
    /// Create a parameter with a value drawn uniformly from `[lower, upper]` and zero velocity.
    ///
    /// Fails with `InvalidBounds` if `lower > upper`, or if either bound or the width
    /// `upper - lower` is not finite.
    pub fn new<R: Rng>(lower: f64, upper: f64, rng: &mut R) -> Result<Self, HydroError> {
        if !(lower <= upper && (upper - lower).is_finite()) {
            return Err(HydroError::InvalidBounds { lower, upper });
        }
        Ok(Parameter::draw((lower, upper), rng))
    }

    // bounds already validated
    fn draw<R: Rng>((lower, upper): (f64, f64), rng: &mut R) -> Self {
        let value = Uniform::new_inclusive(lower, upper).sample(rng);
        Parameter {
            lower,
            upper,
            value,
            velocity: 0.0,
        }
    }

    /// Create a parameter with a known value.  `name` is only used for the error message.
    pub fn with_value(
        name: &'static str,
        (lower, upper): (f64, f64),
        value: f64,
    ) -> Result<Self, HydroError> {
        if !(lower <= upper && (upper - lower).is_finite()) {
            return Err(HydroError::InvalidBounds { lower, upper });
        }
        let mut par = Parameter {
            lower,
            upper,
            value: lower,
            velocity: 0.0,
        };
        par.assign(name, value)?;
        Ok(par)
    }

    fn assign(&mut self, name: &'static str, value: f64) -> Result<(), HydroError> {
        if !(value >= self.lower && value <= self.upper) {
            return Err(HydroError::OutOfBounds {
                name,
                value,
                lower: self.lower,
                upper: self.upper,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Pull the velocity towards the particle best `personal` and the swarm best `swarm`,
    /// with inertia `w`.  Draws two uniform random numbers from `rng`.
    pub fn update_velocity<R: Rng>(
        &mut self,
        personal: &Parameter,
        swarm: &Parameter,
        w: f64,
        rng: &mut R,
    ) {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.gen();
        self.velocity = w * self.velocity
            + C1 * r1 * (personal.value - self.value)
            + C2 * r2 * (swarm.value - self.value);
    }

    /// Move the value by the current velocity.
    ///
    /// A velocity that would carry the value past a bound is replaced by 90% of the distance to
    /// that bound, so the value approaches the wall without reaching past it.  The damped
    /// velocity is kept for the next update.
    pub fn update_value(&mut self) {
        if self.value + self.velocity < self.lower {
            self.velocity = SAFETY * (self.lower - self.value);
        }
        if self.value + self.velocity > self.upper {
            self.velocity = SAFETY * (self.upper - self.value);
        }
        self.value += self.velocity;
    }
}

/// Plain parameter values with their objective, for writing to csv and for the model equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterRecord {
    /// Baseflow recession decay (1/mm).
    pub f: f64,
    /// Soil bucket capacity (mm).
    pub smax: f64,
    /// Maximum baseflow (mm/day).
    pub qmax: f64,
    /// Degree-day factor (mm/day/deg C).
    pub ddf: f64,
    /// Snowfall threshold (deg C).
    pub mint: f64,
    /// Snowmelt threshold (deg C).
    pub maxt: f64,
    /// Objective function value.
    pub objective: f64,
}

/// One realisation of the six EXP-HYDRO parameters and its objective function value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Baseflow recession decay (1/mm).
    pub f: Parameter,
    /// Soil bucket capacity (mm).
    pub smax: Parameter,
    /// Maximum baseflow (mm/day).
    pub qmax: Parameter,
    /// Degree-day factor (mm/day/deg C).
    pub ddf: Parameter,
    /// Snowfall threshold (deg C).
    pub mint: Parameter,
    /// Snowmelt threshold (deg C).
    pub maxt: Parameter,
    objective: f64,
}

impl ParameterSet {
    /// Draw a random parameter set within the default bounds.  The objective starts at the
    /// unevaluated sentinel `-9999`.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        ParameterSet {
            f: Parameter::draw(F_BOUNDS, rng),
            smax: Parameter::draw(SMAX_BOUNDS, rng),
            qmax: Parameter::draw(QMAX_BOUNDS, rng),
            ddf: Parameter::draw(DDF_BOUNDS, rng),
            mint: Parameter::draw(MINT_BOUNDS, rng),
            maxt: Parameter::draw(MAXT_BOUNDS, rng),
            objective: SENTINEL,
        }
    }

    /// Draw `n` random parameter sets, an initial swarm or Monte Carlo population.
    pub fn population<R: Rng>(n: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| ParameterSet::new(rng)).collect()
    }

    /// Build a parameter set from known values, for single runs and validation.
    ///
    /// # Examples
    /// ```
    /// use exphydro::prelude::*;
    /// let params = ParameterSet::from_values(0.07, 200.0, 20.0, 2.0, -1.0, 1.0)?;
    /// assert_eq!(params.smax.value(), 200.0);
    /// # Ok::<(), HydroError>(())
    /// ```
    pub fn from_values(
        f: f64,
        smax: f64,
        qmax: f64,
        ddf: f64,
        mint: f64,
        maxt: f64,
    ) -> Result<Self, HydroError> {
        Ok(ParameterSet {
            f: Parameter::with_value("f", F_BOUNDS, f)?,
            smax: Parameter::with_value("smax", SMAX_BOUNDS, smax)?,
            qmax: Parameter::with_value("qmax", QMAX_BOUNDS, qmax)?,
            ddf: Parameter::with_value("ddf", DDF_BOUNDS, ddf)?,
            mint: Parameter::with_value("mint", MINT_BOUNDS, mint)?,
            maxt: Parameter::with_value("maxt", MAXT_BOUNDS, maxt)?,
            objective: SENTINEL,
        })
    }

    /// Overwrite all six values.  Values outside their bounds are rejected and leave the set
    /// unchanged.
    pub fn assign(
        &mut self,
        f: f64,
        smax: f64,
        qmax: f64,
        ddf: f64,
        mint: f64,
        maxt: f64,
    ) -> Result<(), HydroError> {
        let mut next = self.clone();
        next.f.assign("f", f)?;
        next.smax.assign("smax", smax)?;
        next.qmax.assign("qmax", qmax)?;
        next.ddf.assign("ddf", ddf)?;
        next.mint.assign("mint", mint)?;
        next.maxt.assign("maxt", maxt)?;
        *self = next;
        Ok(())
    }

    /// Objective function value of the last evaluation, `-9999` if never evaluated.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Current values and objective as a flat record.
    pub fn record(&self) -> ParameterRecord {
        ParameterRecord {
            f: self.f.value,
            smax: self.smax.value,
            qmax: self.qmax.value,
            ddf: self.ddf.value,
            mint: self.mint.value,
            maxt: self.maxt.value,
            objective: self.objective,
        }
    }

    fn parameters_mut(&mut self) -> [&mut Parameter; 6] {
        [
            &mut self.f,
            &mut self.smax,
            &mut self.qmax,
            &mut self.ddf,
            &mut self.mint,
            &mut self.maxt,
        ]
    }

    fn parameters(&self) -> [&Parameter; 6] {
        [
            &self.f,
            &self.smax,
            &self.qmax,
            &self.ddf,
            &self.mint,
            &self.maxt,
        ]
    }
}

impl Particle for ParameterSet {
    fn objective(&self) -> f64 {
        self.objective
    }

    fn set_objective(&mut self, value: f64) {
        self.objective = value;
    }

    fn update<R: Rng>(&mut self, personal: &Self, swarm: &Self, w: f64, rng: &mut R) {
        let personal = personal.parameters();
        let swarm = swarm.parameters();
        for (i, par) in self.parameters_mut().iter_mut().enumerate() {
            par.update_velocity(personal[i], swarm[i], w, rng);
            par.update_value();
        }
    }
}
