//! Stacked bar demonstration.
//!
//! This demo shows:
//! - A category chart with two stacked bar series
//! - Per-cell color overrides on the top series
//! - Picking the bar under a pixel
//!
//! Run with: cargo run --example `stacked_bars_demo`

use gridscope::*;

fn main() -> Result<()> {
    init_logging();

    let mut chart = Chart3D::new(ChartOptions {
        chart_type: ChartType::Category,
        ..ChartOptions::default()
    })?;

    let sales = DataTable::from_rows(&[
        vec![3.0, 4.0, 2.0, 5.0],
        vec![2.0, 3.0, 4.0, 1.0],
        vec![1.0, 2.0, 3.0, 4.0],
    ])?;
    let mut bottom = GridSeries::new(
        "sales",
        GridSource::equidistant(sales, (0.0, 1.0), (0.0, 1.0))?,
    );
    bottom.set_representation(Representation::Bar);
    bottom.set_color_map(Some(ColorMapSettings::new("coolwarm", 0.0, 5.0)));

    let mut returns = DataTable::from_rows(&[
        vec![0.5, 0.0, 1.0, 0.5],
        vec![1.0, 0.5, 0.5, 0.0],
        vec![0.5, 1.5, 0.0, 1.0],
    ])?;
    returns.set_color(1, 2, Some(Color::rgb(220, 40, 40)))?;
    let mut top = GridSeries::new(
        "returns",
        GridSource::equidistant(returns, (0.0, 1.0), (0.0, 1.0))?,
    );
    top.set_representation(Representation::Bar);
    top.set_bar_width(0.3, 0.3);

    chart.add_series(bottom);
    let top_id = chart.add_series(top);

    let ranges = chart.axis_ranges()?;
    for axis in Axis::ALL {
        let (min, max) = ranges.range(axis);
        println!("{axis} axis: {min} .. {max}");
    }

    let frame = render_to_recording(&mut chart, 800, 600)?;
    println!("frame: {} draw calls", frame.draws().len());

    match chart.pick_bar(top_id, 400.0, 300.0)? {
        Some(hit) => println!(
            "bar {:?} (table cell {:?}) at distance {:.3}",
            hit.cell, hit.model_index, hit.distance
        ),
        None => println!("no bar under the center pixel"),
    }
    Ok(())
}
