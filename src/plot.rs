//! Hydrographs of observed and simulated streamflow.
use plotters::prelude::*;

/// Draw `observed` and `simulated` daily streamflow against day number, saved as a PNG at `path`.
///
/// The series may differ in length, each is drawn over the days it covers.
pub fn hydrograph(
    observed: &[f64],
    simulated: &[f64],
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let obs: Vec<(f64, f64)> = observed
        .iter()
        .enumerate()
        .map(|(i, q)| (i as f64, *q))
        .collect();
    let sim: Vec<(f64, f64)> = simulated
        .iter()
        .enumerate()
        .map(|(i, q)| (i as f64, *q))
        .collect();

    let days = observed.len().max(simulated.len()).max(2) as f64 - 1.0;
    let qmax = observed
        .iter()
        .chain(simulated.iter())
        .filter(|q| q.is_finite())
        .fold(0.0, |a: f64, b| a.max(*b));
    let qmax = if qmax > 0.0 { qmax * 1.05 } else { 1.0 };

    let root = BitMapBackend::new(path, (1024, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    root.margin(10, 10, 10, 10);
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..days, 0.0..qmax)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .y_labels(5)
        .y_label_formatter(&|x| format!("{:.1}", x))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("Day")
        .y_desc("Streamflow (mm/day)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(obs, &BLUE))?
        .label("observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(LineSeries::new(sim, &RED))?
        .label("simulated")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
