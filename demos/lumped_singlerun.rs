//! Single run of the lumped model with hand-picked parameter values.
use exphydro::prelude::*;
use exphydro::utils;
use log::info;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let forcing = Forcing::from_files("data/P_test.txt", "data/T_test.txt", "data/PET_test.txt")?;
    let qobs = utils::read_f64("data/Q_test.txt")?;
    info!("Loaded {} days of forcing", forcing.len());

    // parameter descriptions in Patil and Stieglitz (2014)
    let params = ParameterSet::from_values(0.07, 200.0, 20.0, 2.0, -1.0, 1.0)?;
    let mut model = BucketModel::new(Arc::new(forcing));

    // observed and simulated series need not line up, hence two windows
    let obs_window = Window::new(365, 2557)?;
    let sim_window = Window::new(365, 2557)?;
    obs_window.matches(&sim_window)?;

    let qsim = model.simulate(&params);
    let kge = kling_gupta(obs_window.slice(&qobs)?, sim_window.slice(qsim)?);
    println!("KGE value = {}", kge);

    std::fs::create_dir_all("out")?;
    plot::hydrograph(
        obs_window.slice(&qobs)?,
        sim_window.slice(qsim)?,
        "out/lumped_singlerun.png",
    )?;
    Ok(())
}
