//! The lumped EXP-HYDRO model: a snow bucket and a soil bucket driven by daily forcing.
//!
//! Storage in each bucket changes as
//!
//! ```text
//! d(snow)/dt = snowfall - melt
//! d(soil)/dt = rain + melt - et - qsub - qsurf
//! ```
//!
//! and the system is integrated over whole days with [Rk4](../ode/struct.Rk4.html).
use crate::calibration::Simulate;
use crate::errors::HydroError;
use crate::forcing::Forcing;
use crate::ode::Rk4;
use crate::parameter::{ParameterRecord, ParameterSet};
use std::sync::Arc;

/// Split precipitation `p` into `(snow, rain)`.  All precipitation falls as snow below `mint`.
pub fn rain_snow_partition(p: f64, temp: f64, mint: f64) -> (f64, f64) {
    if temp < mint {
        (p, 0.0)
    } else {
        (0.0, p)
    }
}

/// Degree-day snowmelt from snow storage `snow`, limited to the snow available.
pub fn snow_bucket(snow: f64, temp: f64, ddf: f64, maxt: f64) -> f64 {
    if temp > maxt && snow > 0.0 {
        snow.min(ddf * (temp - maxt))
    } else {
        0.0
    }
}

/// Fluxes out of the soil bucket for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilFlux {
    /// Actual evapotranspiration (mm/day).
    pub et: f64,
    /// Subsurface flow, or baseflow (mm/day).
    pub qsub: f64,
    /// Surface flow, the overflow of a full bucket (mm/day).
    pub qsurf: f64,
}

/// Soil bucket fluxes at soil storage `soil`.
///  - Below zero the bucket is dry and nothing leaves it.
///  - Above `smax` evapotranspiration runs at `pet`, baseflow at `qmax`, and the excess runs off.
///  - In between, baseflow decays exponentially with the deficit `smax - soil` and
///    evapotranspiration scales with the fraction of `smax` filled.
pub fn soil_bucket(soil: f64, pet: f64, f: f64, smax: f64, qmax: f64) -> SoilFlux {
    if soil < 0.0 {
        SoilFlux {
            et: 0.0,
            qsub: 0.0,
            qsurf: 0.0,
        }
    } else if soil > smax {
        SoilFlux {
            et: pet,
            qsub: qmax,
            qsurf: soil - smax,
        }
    } else {
        SoilFlux {
            et: pet * (soil / smax),
            qsub: qmax * (-f * (smax - soil)).exp(),
            qsurf: 0.0,
        }
    }
}

/// Daily series written by a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    /// Simulated streamflow (mm/day).
    pub qsim: Vec<f64>,
    /// Simulated evapotranspiration (mm/day).
    pub et: Vec<f64>,
    /// Simulated snowmelt (mm/day).
    pub melt: Vec<f64>,
}

impl SimulationOutput {
    fn zeros(len: usize) -> Self {
        SimulationOutput {
            qsim: vec![0.0; len],
            et: vec![0.0; len],
            melt: vec![0.0; len],
        }
    }
}

/// Struct for recording bucket model inputs, state and output.
///
/// Create a model over shared forcing, then simulate it with as many parameter sets as needed.
/// Each simulation starts from the initial storage and overwrites the output series.
///
/// # Examples
/// ```
/// use exphydro::prelude::*;
/// use std::sync::Arc;
///
/// let forcing = Arc::new(Forcing::new(vec![5.0; 30], vec![8.0; 30], vec![2.0; 30])?);
/// let params = ParameterSet::from_values(0.07, 200.0, 20.0, 2.0, -1.0, 1.0)?;
/// let mut model = BucketModel::new(forcing).storage([0.0, 150.0]);
/// let qsim = model.simulate(&params);
/// assert_eq!(qsim.len(), 30);
/// # Ok::<(), HydroError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BucketModel {
    forcing: Arc<Forcing>,
    storage: [f64; 2],
    state: [f64; 2],
    output: SimulationOutput,
}

impl BucketModel {
    /// Create a model with empty snow and soil buckets.
    pub fn new(forcing: Arc<Forcing>) -> Self {
        let len = forcing.len();
        BucketModel {
            forcing,
            storage: [0.0, 0.0],
            state: [0.0, 0.0],
            output: SimulationOutput::zeros(len),
        }
    }

    /// Set the initial `[snow, soil]` storage (mm) used by every simulation.
    pub fn storage(mut self, storage: [f64; 2]) -> Self {
        self.storage = storage;
        self.state = storage;
        self
    }

    /// Forcing driving the model.
    pub fn forcing(&self) -> &Arc<Forcing> {
        &self.forcing
    }

    /// Number of simulated days.
    pub fn timespan(&self) -> usize {
        self.forcing.len()
    }

    /// `[snow, soil]` storage at the end of the last simulation.
    pub fn state(&self) -> [f64; 2] {
        self.state
    }

    /// Output series of the last simulation.
    pub fn output(&self) -> &SimulationOutput {
        &self.output
    }

    /// Simulate streamflow for `params` over the whole forcing period.
    pub fn simulate(&mut self, params: &ParameterSet) -> &[f64] {
        let para = params.record();
        let forcing = &self.forcing;
        let output = &mut self.output;
        self.state = Rk4::default().solve(
            |t, s| water_balance(forcing, output, &para, t, s),
            self.storage,
            forcing.len(),
        );
        &self.output.qsim
    }
}

/// Right hand side of the storage equations at time `t`.  Also writes the day's fluxes into
/// `output`, so later evaluations for the same day overwrite earlier ones.
fn water_balance(
    forcing: &Forcing,
    output: &mut SimulationOutput,
    para: &ParameterRecord,
    t: f64,
    s: &[f64; 2],
) -> [f64; 2] {
    // the integrator evaluates half days and one day past the end
    let tt = (t.round() as usize).min(forcing.len() - 1);

    let p = forcing.precipitation()[tt];
    let temp = forcing.temperature()[tt];
    let pet = forcing.pet()[tt];

    let (snowfall, rain) = rain_snow_partition(p, temp, para.mint);
    let melt = snow_bucket(s[0], temp, para.ddf, para.maxt);
    let soil = soil_bucket(s[1], pet, para.f, para.smax, para.qmax);

    output.qsim[tt] = soil.qsub + soil.qsurf;
    output.et[tt] = soil.et;
    output.melt[tt] = melt;

    [
        snowfall - melt,
        rain + melt - soil.et - soil.qsub - soil.qsurf,
    ]
}

impl Simulate for BucketModel {
    type Params = ParameterSet;

    fn simulate(&mut self, params: &ParameterSet) -> Result<&[f64], HydroError> {
        Ok(BucketModel::simulate(self, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference_params() -> ParameterSet {
        ParameterSet::from_values(0.07, 200.0, 20.0, 2.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn partition_threshold_is_rain() {
        assert_eq!(rain_snow_partition(4.0, -1.0, -1.0), (0.0, 4.0));
        assert_eq!(rain_snow_partition(4.0, -1.5, -1.0), (4.0, 0.0));
    }

    #[test]
    fn melt_limited_by_snow() {
        assert_eq!(snow_bucket(1.0, 10.0, 2.0, 1.0), 1.0);
        assert_eq!(snow_bucket(50.0, 3.0, 2.0, 1.0), 4.0);
        assert_eq!(snow_bucket(50.0, 1.0, 2.0, 1.0), 0.0);
        assert_eq!(snow_bucket(0.0, 10.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn soil_flux_at_empty_bucket() {
        let flux = soil_bucket(0.0, 3.0, 0.07, 200.0, 20.0);
        assert_eq!(flux.et, 0.0);
        assert_eq!(flux.qsurf, 0.0);
        assert_eq!(flux.qsub, 20.0 * (-0.07 * 200.0f64).exp());
        let dry = soil_bucket(-1e-12, 3.0, 0.07, 200.0, 20.0);
        assert_eq!(dry.qsub, 0.0);
        assert_eq!(dry.et, 0.0);
    }

    #[test]
    fn soil_flux_continuous_at_capacity() {
        let at = soil_bucket(200.0, 3.0, 0.07, 200.0, 20.0);
        assert_eq!(
            at,
            SoilFlux {
                et: 3.0,
                qsub: 20.0,
                qsurf: 0.0
            }
        );
        let above = soil_bucket(200.0 + 1e-9, 3.0, 0.07, 200.0, 20.0);
        assert_eq!(above.et, 3.0);
        assert_eq!(above.qsub, 20.0);
        assert_relative_eq!(above.qsurf, 1e-9, epsilon = 1e-12);
    }

    #[test]
    fn golden_trace_dry_soil() {
        // soil drains below zero inside the first step and stays dry
        let forcing = Arc::new(Forcing::new(vec![0.0; 5], vec![5.0; 5], vec![3.0; 5]).unwrap());
        let mut model = BucketModel::new(forcing);
        let q0 = 20.0 * (-0.07 * 200.0f64).exp();
        let qsim = model.simulate(&reference_params()).to_vec();
        assert_relative_eq!(qsim[0], q0, max_relative = 1e-12);
        assert_eq!(&qsim[1..], &[0.0; 4]);
        assert_eq!(model.output().et, vec![0.0; 5]);
        assert_eq!(model.output().melt, vec![0.0; 5]);
        let state = model.state();
        assert_eq!(state[0], 0.0);
        assert_relative_eq!(state[1], -q0 / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn golden_trace_snow_and_rain() {
        let forcing = Arc::new(
            Forcing::new(
                vec![10.0, 0.0, 5.0, 0.0, 0.0, 0.0],
                vec![5.0, -3.0, -2.0, 4.0, 6.0, 2.0],
                vec![3.0, 1.0, 0.5, 2.0, 3.0, 2.5],
            )
            .unwrap(),
        );
        let mut model = BucketModel::new(forcing).storage([0.0, 190.0]);
        model.simulate(&reference_params());
        let qsim = [
            9.93170607582819,
            5.863634346756738,
            4.0313812272314,
            3.4243016427391226,
            2.5648049171528333,
            1.5196798696057257,
        ];
        let et = [
            2.8499999999999996,
            0.9123598095346671,
            0.4427991707132016,
            1.7478807539199426,
            2.5598893171040267,
            2.039779897682296,
        ];
        let melt = [0.0, 0.0, 0.0, 2.111111111111111, 0.7916666666666667, 0.07421875];
        let out = model.output();
        for i in 0..6 {
            assert_relative_eq!(out.qsim[i], qsim[i], max_relative = 1e-10);
            assert_relative_eq!(out.et[i], et[i], max_relative = 1e-10);
            assert_relative_eq!(out.melt[i], melt[i], max_relative = 1e-10);
        }
        assert_relative_eq!(model.state()[0], 0.11132812500000003, max_relative = 1e-10);
        assert_relative_eq!(model.state()[1], 163.14187081968947, max_relative = 1e-10);
    }

    #[test]
    fn resimulation_overwrites_output() {
        let forcing = Arc::new(Forcing::new(vec![6.0; 20], vec![4.0; 20], vec![2.0; 20]).unwrap());
        let mut model = BucketModel::new(forcing).storage([0.0, 100.0]);
        let first = model.simulate(&reference_params()).to_vec();
        let other = ParameterSet::from_values(0.01, 120.0, 40.0, 2.0, -1.0, 1.0).unwrap();
        let second = model.simulate(&other).to_vec();
        assert_ne!(first, second);
        let again = model.simulate(&reference_params()).to_vec();
        assert_eq!(first, again);
    }

    proptest! {
        #[test]
        fn melt_bounded_by_snow(snow in 0.0..500.0f64, temp in -30.0..30.0f64, ddf in 0.0..5.0f64, maxt in 0.0..3.0f64) {
            let melt = snow_bucket(snow, temp, ddf, maxt);
            prop_assert!(melt >= 0.0);
            prop_assert!(melt <= snow);
        }
    }
}
