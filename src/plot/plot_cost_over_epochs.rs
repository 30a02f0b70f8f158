use log::info;
use plotters::prelude::*;

/// Draw the per-epoch cost on a log scale into a PNG at `filename`.
pub fn plot_cost_over_epochs(
    costs: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if costs.is_empty() {
        return Err("no cost values to plot".into());
    }
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = costs.len();

    // Keep log10 defined for non-positive costs
    let log_costs: Vec<f64> = costs.iter().map(|&c| c.max(1e-10).log10()).collect();

    let y_min = log_costs.iter().cloned().fold(f64::INFINITY, f64::min).floor();
    let mut y_max = log_costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max).ceil();
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .caption("Validation Cost over Epochs (Log Scale)", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(1..epochs + 1, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Cost (Log Scale)")
        .y_label_formatter(&|y| format!("1e{:.0}", y))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            log_costs.iter().enumerate().map(|(epoch, &c)| (epoch + 1, c)),
            &BLUE,
        ))?
        .label("Cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!("cost plot saved as '{}'", filename);

    Ok(())
}
