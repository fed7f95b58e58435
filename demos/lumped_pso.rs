//! Particle swarm calibration of the lumped model, then a validation run.
use chrono::NaiveDate;
use exphydro::prelude::*;
use exphydro::{monthly, utils};
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
    let mut swarm = ParameterSet::population(10, &mut rng);

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
    println!("Calibrated parameters: {:?}", fit.best.record());

    let val_obs = Window::from_start(cal_obs.end() + 1, qobs.len())?;
    let val_sim = Window::from_start(cal_sim.end() + 1, model.timespan())?;
    let qsim = model.simulate(&fit.best).to_vec();
    let kge = kling_gupta(val_obs.slice(&qobs)?, val_sim.slice(&qsim)?);
    let nse = nash_sutcliffe(val_obs.slice(&qobs)?, val_sim.slice(&qsim)?);
    println!("Independent run KGE value = {}, NSE value = {}", kge, nse);
    println!("Total runtime: {:.2} seconds", now.elapsed().as_secs_f64());

    std::fs::create_dir_all("out")?;
    utils::record(&fit.history, "out/lumped_pso_history.csv")?;
    utils::record(&[fit.best.record()], "out/lumped_pso_best.csv")?;

    // sample record starts on 1 January
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).ok_or("invalid start date")?;
    utils::record(&monthly::summation(&qsim, start), "out/lumped_pso_monthly.csv")?;

    let from = Window::from_start(cal_obs.start(), qobs.len())?;
    let sim_from = Window::from_start(cal_sim.start(), qsim.len())?;
    plot::hydrograph(
        from.slice(&qobs)?,
        sim_from.slice(&qsim)?,
        "out/lumped_pso.png",
    )?;
    Ok(())
}
