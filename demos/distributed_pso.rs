//! Particle swarm calibration of a five pixel distributed model, then a validation run.
use exphydro::prelude::*;
use exphydro::utils;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let now = Instant::now();

    let forcing = Forcing::from_files("data/P_test.txt", "data/T_test.txt", "data/PET_test.txt")?;
    let qobs = utils::read_f64("data/Q_test.txt")?;

    let pixels = 5;
    let particles = 10;
    let mut model = DistributedModel::new(Arc::new(forcing), pixels, Combine::RunningAverage)?;

    let mut rng = StdRng::seed_from_u64(2014);
    let mut swarm = DistributedParameters::population(particles, pixels, &mut rng);

    let cal_obs = Window::new(365, 2557)?;
    let cal_sim = Window::new(365, 2557)?;
    let fit = Calibration::new().pso(
        &mut model,
        &mut swarm,
        &qobs,
        kling_gupta,
        cal_obs,
        cal_sim,
        &mut rng,
    )?;
    println!("Calibration run KGE value = {}", fit.best.objective());

    let val_obs = Window::from_start(cal_obs.end() + 1, qobs.len())?;
    let qsim = model.simulate(&fit.best)?.to_vec();
    let val_sim = Window::from_start(cal_sim.end() + 1, qsim.len())?;
    let kge = kling_gupta(val_obs.slice(&qobs)?, val_sim.slice(&qsim)?);
    println!("Independent run KGE value = {}", kge);
    println!("Total runtime: {:.2} seconds", now.elapsed().as_secs_f64());

    std::fs::create_dir_all("out")?;
    utils::record(&fit.history, "out/distributed_pso_history.csv")?;
    let pixel_params: Vec<ParameterRecord> =
        fit.best.params().iter().map(|p| p.record()).collect();
    utils::record(&pixel_params, "out/distributed_pso_best.csv")?;

    let from = Window::from_start(cal_obs.start(), qobs.len())?;
    let sim_from = Window::from_start(cal_sim.start(), qsim.len())?;
    plot::hydrograph(
        from.slice(&qobs)?,
        sim_from.slice(&qsim)?,
        "out/distributed_pso.png",
    )?;
    Ok(())
}
