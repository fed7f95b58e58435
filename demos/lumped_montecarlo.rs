//! Monte Carlo calibration of the lumped model, then a validation run.
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
    let mut model = BucketModel::new(Arc::new(forcing));

    let mut rng = StdRng::seed_from_u64(2014);
    let mut params = ParameterSet::population(5000, &mut rng);

    let cal_obs = Window::new(365, 2557)?;
    let cal_sim = Window::new(365, 2557)?;
    let fit = Calibration::new().montecarlo(
        &mut model,
        &mut params,
        &qobs,
        kling_gupta,
        cal_obs,
        cal_sim,
    )?;
    println!("Calibration run KGE value = {}", fit.best.objective());

    let val_obs = Window::from_start(cal_obs.end() + 1, qobs.len())?;
    let val_sim = Window::from_start(cal_sim.end() + 1, model.timespan())?;
    let qsim = model.simulate(&fit.best);
    let kge = kling_gupta(val_obs.slice(&qobs)?, val_sim.slice(qsim)?);
    println!("Independent run KGE value = {}", kge);
    println!("Total runtime: {:.2} seconds", now.elapsed().as_secs_f64());

    std::fs::create_dir_all("out")?;
    let records: Vec<ParameterRecord> = params.iter().map(|p| p.record()).collect();
    utils::record(&records, "out/lumped_montecarlo_sample.csv")?;
    utils::record(&fit.history, "out/lumped_montecarlo_history.csv")?;
    let from = Window::from_start(cal_obs.start(), qobs.len())?;
    let sim_from = Window::from_start(cal_sim.start(), qsim.len())?;
    plot::hydrograph(
        from.slice(&qobs)?,
        sim_from.slice(qsim)?,
        "out/lumped_montecarlo.png",
    )?;
    Ok(())
}
