/*!
* # exphydro - A library for the EXP-HYDRO bucket model of catchment streamflow.
* EXP-HYDRO (Patil & Stieglitz, 2014) is a daily, conceptual rainfall-runoff model.  A catchment is a snow
* bucket on top of a soil bucket.  Precipitation falls as snow below a temperature threshold and as rain above it,
* snow melts by a degree-day factor, and the soil bucket loses water to evapotranspiration, to baseflow
* that decays exponentially as the bucket drains, and to surface runoff once the bucket is full.  Streamflow is
* the sum of baseflow and surface runoff.
*
* The six model parameters are calibrated against observed streamflow with a particle swarm or a Monte Carlo
* search, scored by the Kling-Gupta or Nash-Sutcliffe efficiency over a calibration window.  A distributed
* version runs one bucket model per pixel or sub-catchment in parallel and combines their streamflows.
*
*  ## Quick Start
*
* To use exphydro, add it to your `Cargo.toml`
* ```toml
* [dependencies]
* exphydro = "^0.1.0"
* ```
*
*  - Load the crate prelude in the preamble of your `main.rs`.
*  - Read forcing from whitespace-separated text files, one value per day, with
*    [Forcing::from_files](forcing/struct.Forcing.html#method.from_files).
*  - Calibrate over the first part of the record and score the best parameter set over the rest:
*
* ```rust
* use exphydro::prelude::*;
* use rand::rngs::StdRng;
* use rand::SeedableRng;
* use std::sync::Arc;
*
* fn main() -> Result<(), HydroError> {
*     // a wet and dry season, warm enough for rain
*     let p: Vec<f64> = (0..120).map(|i| if i % 30 < 15 { 6.0 } else { 0.5 }).collect();
*     let t = vec![10.0; 120];
*     let pet = vec![2.0; 120];
*     let forcing = Arc::new(Forcing::new(p, t, pet)?);
*     let mut model = BucketModel::new(forcing).storage([0.0, 150.0]);
*
*     // synthetic observations from a known parameter set
*     let truth = ParameterSet::from_values(0.05, 300.0, 25.0, 2.0, -1.0, 1.0)?;
*     let observed = model.simulate(&truth).to_vec();
*
*     let mut rng = StdRng::seed_from_u64(1);
*     let mut swarm = ParameterSet::population(10, &mut rng);
*     let cal = Window::new(0, 89)?;
*     let fit = Calibration::new().iterations(10).pso(
*         &mut model,
*         &mut swarm,
*         &observed,
*         kling_gupta,
*         cal,
*         cal,
*         &mut rng,
*     )?;
*     assert!(fit.best.objective() > SENTINEL);
*
*     // validation
*     let val = Window::new(90, 119)?;
*     let qsim = model.simulate(&fit.best);
*     let score = kling_gupta(val.slice(&observed)?, val.slice(qsim)?);
*     assert!(score <= 1.0);
*     Ok(())
* }
* ```
*
* Models and calibration settings use a builder pattern.  Start from
* [BucketModel::new](model/struct.BucketModel.html#method.new) or
* [Calibration::new](calibration/struct.Calibration.html#method.new) and chain the settings that differ
* from the defaults.
*
* ```rust
* use exphydro::prelude::*;
*
* let cal = Calibration::new().iterations(100).stall_limit(10);
* let same = Calibration::new().stall_limit(10).iterations(100);
* assert_eq!(cal, same);
* ```
*/

#![warn(missing_docs)]
pub mod calibration;
pub mod distributed;
pub mod errors;
pub mod forcing;
pub mod model;
pub mod monthly;
pub mod objective;
pub mod ode;
pub mod parameter;
pub mod plot;
pub mod utils;
pub mod window;

/// Common types and functions, `use exphydro::prelude::*;`.
pub mod prelude {
    pub use crate::calibration::{
        montecarlo_maximise, pso_maximise, Calibration, Fit, Particle, Progress, Simulate,
    };
    pub use crate::distributed::{Combine, DistributedModel, DistributedParameters};
    pub use crate::errors::HydroError;
    pub use crate::forcing::Forcing;
    pub use crate::model::{BucketModel, SimulationOutput};
    pub use crate::objective::{kling_gupta, nash_sutcliffe, SENTINEL};
    pub use crate::parameter::{Parameter, ParameterRecord, ParameterSet};
    pub use crate::plot;
    pub use crate::window::Window;
}
