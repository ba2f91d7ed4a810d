#![allow(clippy::cast_precision_loss)]
//! Surface demonstration on a smooth hill.
//!
//! This demo shows:
//! - An equidistant grid drawn as a surface with a mesh overlay
//! - A color map and a few iso-lines
//! - Picking the surface under the center of the viewport
//! - Clipping the surface from above
//!
//! Run with: cargo run --example `pyramid_demo`

use gridscope::*;

fn hill(rows: usize, columns: usize) -> Result<DataTable> {
    let mut table = DataTable::new(rows, columns);
    for i in 0..rows {
        for j in 0..columns {
            let x = i as f64 / (rows - 1) as f64 * 2.0 - 1.0;
            let y = j as f64 / (columns - 1) as f64 * 2.0 - 1.0;
            table.set_value(i, j, (-(x * x + y * y) * 3.0).exp())?;
        }
    }
    Ok(table)
}

fn main() -> Result<()> {
    init_logging();

    let grid = GridSource::equidistant(hill(64, 64)?, (-1.0, 2.0 / 63.0), (-1.0, 2.0 / 63.0))?;
    let mut series = GridSeries::new("hill", grid);
    series.set_representation(Representation::Surface);
    series.set_surface_mesh_enabled(true);
    series.set_color_map(Some(ColorMapSettings::new("viridis", 0.0, 1.0)));
    series.set_iso_levels(vec![0.25, 0.5, 0.75]);

    let mut chart = Chart3D::default();
    let id = chart.add_series(series);

    let frame = render_to_recording(&mut chart, 1024, 768)?;
    println!(
        "frame: {} draw calls, {} buffers, {} textures",
        frame.draws().len(),
        frame.live_buffer_count(),
        frame.live_texture_count()
    );

    for hit in chart.pick_surface(id, 512.0, 384.0)? {
        println!(
            "picked ({:.3}, {:.3}, {:.3}) at distance {:.3}",
            hit.position.x, hit.position.y, hit.position.z, hit.distance
        );
    }

    for level in [0.25, 0.5, 0.75] {
        let segments = chart.iso_lines(id, level)?;
        println!("iso-line {level}: {} segments", segments.len() / 2);
    }

    chart.set_clip_max(id, Axis::Z, 0.5)?;
    let mut backend = RecordingBackend::new();
    chart.render(&mut backend)?;
    if let Some(UniformValue::Vec3(max)) = backend.uniform(uniforms::CLIP_MAX) {
        println!("clip box top in the plot cube: {:.3}", max[2]);
    }
    Ok(())
}
