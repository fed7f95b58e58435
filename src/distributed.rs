//! Spatially distributed EXP-HYDRO: one bucket model per pixel or sub-catchment.
//!
//! Pixels do not exchange water and there is no channel routing, all streamflow reaches the
//! outlet on the day it is generated.  Catchment streamflow is the combination of the pixel
//! streamflows chosen by [Combine](enum.Combine.html).
use crate::calibration::{Particle, Simulate};
use crate::errors::HydroError;
use crate::forcing::Forcing;
use crate::model::BucketModel;
use crate::objective::SENTINEL;
use crate::parameter::ParameterSet;
use log::warn;
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;

/// How pixel streamflows combine into catchment streamflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Combine {
    /// Fold pixels in order with `q = (q + q_i) / 2`.  Later pixels weigh more than earlier
    /// ones: with three pixels the weights are 1/4, 1/4 and 1/2.  Kept for compatibility with
    /// results from pixel-based EXP-HYDRO runs, prefer [Mean](#variant.Mean).
    RunningAverage,
    /// Arithmetic mean over all pixels.
    Mean,
    /// Area-weighted sum, one weight per sub-catchment.  Weights are normally the fraction of
    /// catchment area in each sub-catchment and sum to 1.
    Weighted(Vec<f64>),
}

impl Combine {
    fn reduce(&self, models: &[BucketModel], qsim: &mut [f64]) {
        match self {
            Combine::RunningAverage => {
                for (i, model) in models.iter().enumerate() {
                    let q = &model.output().qsim;
                    if i == 0 {
                        qsim.copy_from_slice(q);
                    } else {
                        for (acc, x) in qsim.iter_mut().zip(q) {
                            *acc = (*acc + x) * 0.5;
                        }
                    }
                }
            }
            Combine::Mean => {
                let n = models.len() as f64;
                for (t, acc) in qsim.iter_mut().enumerate() {
                    let sum: f64 = models.iter().map(|m| m.output().qsim[t]).sum();
                    *acc = sum / n;
                }
            }
            Combine::Weighted(weights) => {
                for (i, model) in models.iter().enumerate() {
                    let q = &model.output().qsim;
                    if i == 0 {
                        for (acc, x) in qsim.iter_mut().zip(q) {
                            *acc = weights[i] * x;
                        }
                    } else {
                        for (acc, x) in qsim.iter_mut().zip(q) {
                            *acc += weights[i] * x;
                        }
                    }
                }
            }
        }
    }
}

/// One EXP-HYDRO parameter set per pixel and the objective value of the whole catchment.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributedParameters {
    params: Vec<ParameterSet>,
    objective: f64,
}

impl DistributedParameters {
    /// Draw random parameter sets for `pixels` pixels.
    pub fn new<R: Rng>(pixels: usize, rng: &mut R) -> Self {
        DistributedParameters {
            params: ParameterSet::population(pixels, rng),
            objective: SENTINEL,
        }
    }

    /// Draw `n` random distributed parameter sets, an initial swarm.
    pub fn population<R: Rng>(n: usize, pixels: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| DistributedParameters::new(pixels, rng)).collect()
    }

    /// Build from known pixel parameter sets.
    pub fn from_sets(params: Vec<ParameterSet>) -> Result<Self, HydroError> {
        if params.is_empty() {
            return Err(HydroError::NoPixels);
        }
        Ok(DistributedParameters {
            params,
            objective: SENTINEL,
        })
    }

    /// Number of pixels.
    pub fn pixels(&self) -> usize {
        self.params.len()
    }

    /// Parameter sets, one per pixel.
    pub fn params(&self) -> &[ParameterSet] {
        &self.params
    }
}

impl Particle for DistributedParameters {
    fn objective(&self) -> f64 {
        self.objective
    }

    fn set_objective(&mut self, value: f64) {
        self.objective = value;
    }

    fn update<R: Rng>(&mut self, personal: &Self, swarm: &Self, w: f64, rng: &mut R) {
        for (i, par) in self.params.iter_mut().enumerate() {
            par.update(&personal.params[i], &swarm.params[i], w, rng);
        }
    }
}

/// Struct for recording pixel models and their combined streamflow.
#[derive(Debug, Clone)]
pub struct DistributedModel {
    models: Vec<BucketModel>,
    combine: Combine,
    qsim: Vec<f64>,
}

impl DistributedModel {
    /// Create `pixels` bucket models that all receive the same `forcing`.
    pub fn new(forcing: Arc<Forcing>, pixels: usize, combine: Combine) -> Result<Self, HydroError> {
        let models = (0..pixels)
            .map(|_| BucketModel::new(Arc::clone(&forcing)))
            .collect();
        DistributedModel::from_models(models, combine)
    }

    /// Create one bucket model per sub-catchment weight, combined by area-weighted sum.
    pub fn weighted(forcing: Arc<Forcing>, weights: Vec<f64>) -> Result<Self, HydroError> {
        let pixels = weights.len();
        DistributedModel::new(forcing, pixels, Combine::Weighted(weights))
    }

    /// Combine existing bucket models, which may have their own forcing and initial storage.
    /// All models must simulate the same number of days.
    pub fn from_models(models: Vec<BucketModel>, combine: Combine) -> Result<Self, HydroError> {
        let first = models.first().ok_or(HydroError::NoPixels)?;
        let timespan = first.timespan();
        if let Some(other) = models.iter().find(|m| m.timespan() != timespan) {
            return Err(HydroError::LengthMismatch {
                expected: timespan,
                found: other.timespan(),
            });
        }
        if let Combine::Weighted(weights) = &combine {
            if weights.len() != models.len() {
                return Err(HydroError::PixelMismatch {
                    expected: models.len(),
                    found: weights.len(),
                });
            }
            let total: f64 = weights.iter().sum();
            if (total - 1.0).abs() > 1e-6 {
                warn!("Sub-catchment weights sum to {}, not 1", total);
            }
        }
        Ok(DistributedModel {
            models,
            combine,
            qsim: vec![0.0; timespan],
        })
    }

    /// Number of pixels.
    pub fn pixels(&self) -> usize {
        self.models.len()
    }

    /// Pixel models, holding the output of the last simulation.
    pub fn models(&self) -> &[BucketModel] {
        &self.models
    }

    /// Combination rule.
    pub fn combine(&self) -> &Combine {
        &self.combine
    }

    /// Combined streamflow of the last simulation.
    pub fn qsim(&self) -> &[f64] {
        &self.qsim
    }

    /// Simulate every pixel with its own parameter set and combine the streamflows.
    ///
    /// Pixels run in parallel, each on its own output buffers.  Streamflows are combined in
    /// pixel order afterwards.
    pub fn simulate(&mut self, params: &DistributedParameters) -> Result<&[f64], HydroError> {
        if params.pixels() != self.models.len() {
            return Err(HydroError::PixelMismatch {
                expected: self.models.len(),
                found: params.pixels(),
            });
        }
        self.models
            .par_iter_mut()
            .zip(params.params.par_iter())
            .for_each(|(model, para)| {
                model.simulate(para);
            });
        self.combine.reduce(&self.models, &mut self.qsim);
        Ok(&self.qsim)
    }
}

impl Simulate for DistributedModel {
    type Params = DistributedParameters;

    fn simulate(&mut self, params: &DistributedParameters) -> Result<&[f64], HydroError> {
        DistributedModel::simulate(self, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::objective::kling_gupta;
    use crate::window::Window;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn forcing() -> Arc<Forcing> {
        let p = (0..40).map(|i| if i % 4 == 0 { 12.0 } else { 0.5 }).collect();
        let t = (0..40).map(|i| -4.0 + i as f64 * 0.3).collect();
        let pet = vec![2.0; 40];
        Arc::new(Forcing::new(p, t, pet).unwrap())
    }

    fn pixel_sets() -> Vec<ParameterSet> {
        vec![
            ParameterSet::from_values(0.07, 200.0, 20.0, 2.0, -1.0, 1.0).unwrap(),
            ParameterSet::from_values(0.02, 150.0, 35.0, 3.0, -2.0, 0.5).unwrap(),
            ParameterSet::from_values(0.09, 400.0, 12.0, 1.0, -0.5, 2.0).unwrap(),
        ]
    }

    fn lumped(sets: &[ParameterSet]) -> Vec<Vec<f64>> {
        sets.iter()
            .map(|p| BucketModel::new(forcing()).simulate(p).to_vec())
            .collect()
    }

    #[test]
    fn running_average_favours_last_pixel() {
        let sets = pixel_sets();
        let q = lumped(&sets);
        let mut model = DistributedModel::new(forcing(), 3, Combine::RunningAverage).unwrap();
        let params = DistributedParameters::from_sets(sets).unwrap();
        let qsim = model.simulate(&params).unwrap();
        for t in 0..40 {
            let expected = 0.25 * q[0][t] + 0.25 * q[1][t] + 0.5 * q[2][t];
            assert_relative_eq!(qsim[t], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn mean_weights_pixels_equally() {
        let sets = pixel_sets();
        let q = lumped(&sets);
        let mut model = DistributedModel::new(forcing(), 3, Combine::Mean).unwrap();
        let params = DistributedParameters::from_sets(sets).unwrap();
        let qsim = model.simulate(&params).unwrap();
        for t in 0..40 {
            let expected = (q[0][t] + q[1][t] + q[2][t]) / 3.0;
            assert_relative_eq!(qsim[t], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn weighted_sum_by_area() {
        let sets = pixel_sets();
        let q = lumped(&sets);
        let mut model = DistributedModel::weighted(forcing(), vec![0.2, 0.3, 0.5]).unwrap();
        let params = DistributedParameters::from_sets(sets).unwrap();
        let qsim = model.simulate(&params).unwrap();
        for t in 0..40 {
            let expected = 0.2 * q[0][t] + 0.3 * q[1][t] + 0.5 * q[2][t];
            assert_relative_eq!(qsim[t], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn single_pixel_matches_lumped_model() {
        let sets = vec![pixel_sets().remove(0)];
        let q = lumped(&sets);
        for combine in vec![Combine::RunningAverage, Combine::Mean, Combine::Weighted(vec![1.0])] {
            let mut model = DistributedModel::new(forcing(), 1, combine).unwrap();
            let params = DistributedParameters::from_sets(sets.clone()).unwrap();
            assert_eq!(model.simulate(&params).unwrap(), &q[0][..]);
        }
    }

    #[test]
    fn rejects_wrong_pixel_count() {
        let mut model = DistributedModel::new(forcing(), 2, Combine::Mean).unwrap();
        let params = DistributedParameters::from_sets(pixel_sets()).unwrap();
        assert_eq!(
            model.simulate(&params).unwrap_err(),
            HydroError::PixelMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_wrong_weight_count() {
        let err = DistributedModel::new(forcing(), 3, Combine::Weighted(vec![0.5, 0.5])).unwrap_err();
        assert_eq!(
            err,
            HydroError::PixelMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_models_of_unequal_length() {
        let short = Arc::new(Forcing::new(vec![1.0; 10], vec![1.0; 10], vec![1.0; 10]).unwrap());
        let models = vec![BucketModel::new(forcing()), BucketModel::new(short)];
        let err = DistributedModel::from_models(models, Combine::Mean).unwrap_err();
        assert_eq!(
            err,
            HydroError::LengthMismatch {
                expected: 40,
                found: 10
            }
        );
    }

    #[test]
    fn swarm_calibrates_pixels() {
        let mut rng = StdRng::seed_from_u64(1000);
        let truth = DistributedParameters::from_sets(pixel_sets()).unwrap();
        let mut model = DistributedModel::new(forcing(), 3, Combine::Mean).unwrap();
        let observed = model.simulate(&truth).unwrap().to_vec();
        let mut swarm = DistributedParameters::population(4, 3, &mut rng);
        let win = Window::new(5, 39).unwrap();
        let fit = Calibration::new()
            .iterations(4)
            .pso(&mut model, &mut swarm, &observed, kling_gupta, win, win, &mut rng)
            .unwrap();
        assert_eq!(fit.best.pixels(), 3);
        assert!(fit.best.objective() > SENTINEL);
        for set in fit.best.params() {
            assert!(set.smax.value() >= 100.0 && set.smax.value() <= 1500.0);
        }
    }
}
