//! Basic integration tests for gridscope.
//!
//! These run the reference pyramid scenario end to end: a 3x3 equidistant
//! grid `z = [[0,1,0],[1,2,1],[0,1,0]]` drawn as a surface.

use gridscope::*;

fn pyramid_table() -> DataTable {
    DataTable::from_rows(&[
        vec![0.0, 1.0, 0.0],
        vec![1.0, 2.0, 1.0],
        vec![0.0, 1.0, 0.0],
    ])
    .unwrap()
}

fn pyramid_chart() -> (Chart3D, SeriesId) {
    init_logging();
    let grid = GridSource::equidistant(pyramid_table(), (0.0, 1.0), (0.0, 1.0)).unwrap();
    let mut series = GridSeries::new("pyramid", grid);
    series.set_representation(Representation::Surface);
    let mut chart = Chart3D::default();
    let id = chart.add_series(series);
    (chart, id)
}

fn geometry(chart: &Chart3D, id: SeriesId) -> Vec<TileGeometry> {
    let ranges = chart.axis_ranges().unwrap();
    let context = SeriesContext {
        ranges: &ranges,
        limits: &chart.options().limits,
        color_maps: chart.color_maps(),
        stack_below: &[],
    };
    chart.series(id).unwrap().build_geometry(&context).unwrap()
}

#[test]
fn test_pyramid_surface_geometry() {
    let (chart, id) = pyramid_chart();
    let tiles = geometry(&chart, id);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].vertex_count(), 9);
    assert_eq!(tiles[0].triangles().len(), 8);
}

#[test]
fn test_pyramid_auto_ranges() {
    let (chart, _) = pyramid_chart();
    let ranges = chart.axis_ranges().unwrap();
    assert_eq!(ranges.range(Axis::X), (0.0, 2.0));
    assert_eq!(ranges.range(Axis::Y), (0.0, 2.0));
    assert_eq!(ranges.range(Axis::Z), (0.0, 2.0));
}

#[test]
fn test_pyramid_iso_line_is_closed_around_peak() {
    let (chart, id) = pyramid_chart();
    let segments = chart.iso_lines(id, 1.5).unwrap();
    assert_eq!(segments.len() % 2, 0);

    let close = |a: &[f64; 3], b: &[f64; 3]| {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5 && (a[2] - b[2]).abs() < 1e-5
    };
    let mut corners: Vec<[f64; 3]> = Vec::new();
    for point in &segments {
        if !corners.iter().any(|c| close(c, point)) {
            corners.push(*point);
        }
    }
    // One crossing per edge leaving the peak, each shared by two segments
    assert_eq!(corners.len(), segments.len() / 2);
    for corner in &corners {
        assert_eq!(segments.iter().filter(|p| close(p, corner)).count(), 2);
    }
    for point in &segments {
        assert!((point[2] - 1.5).abs() < 1e-5);
        let distance = ((point[0] - 1.0).powi(2) + (point[1] - 1.0).powi(2)).sqrt();
        assert!(distance <= 0.5 + 1e-5);
    }
}

#[test]
fn test_iso_lines_outside_value_range() {
    let (chart, id) = pyramid_chart();
    assert!(chart.iso_lines(id, 2.5).unwrap().is_empty());
    assert!(chart.iso_lines(id, -0.5).unwrap().is_empty());
}

#[test]
fn test_rebuild_is_idempotent() {
    let (mut chart, id) = pyramid_chart();
    let mut backend = RecordingBackend::new();
    chart.rebuild(&mut backend).unwrap();
    let counts = |chart: &Chart3D| -> Vec<(usize, Option<usize>, Option<usize>)> {
        chart
            .series(id)
            .unwrap()
            .tile_buffers()
            .iter()
            .map(|t| {
                (
                    t.vertex_count,
                    t.indices.map(|(_, n)| n),
                    t.line_indices.map(|(_, n)| n),
                )
            })
            .collect()
    };
    let first = counts(&chart);
    chart.rebuild(&mut backend).unwrap();
    assert_eq!(first, counts(&chart));
    // The second rebuild replaced, not added to, the first one's buffers
    assert_eq!(
        backend.live_buffer_count(),
        chart.series(id).unwrap().resource_count()
    );
}

#[test]
fn test_point_mode_one_vertex_per_cell() {
    init_logging();
    let mut table = pyramid_table();
    table.set_color(0, 0, Some(Color::rgb(255, 0, 0))).unwrap();
    table.set_color(2, 1, Some(Color::rgb(0, 255, 0))).unwrap();
    let grid = GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap();
    let mut chart = Chart3D::default();
    let id = chart.add_series(GridSeries::new("points", grid));

    let tiles = geometry(&chart, id);
    let total: usize = tiles.iter().map(TileGeometry::vertex_count).sum();
    assert_eq!(total, 9);
    let colored: usize = tiles
        .iter()
        .filter(|t| matches!(t.kind, TileKind::Points(kind) if kind == CellKind::Colored))
        .map(TileGeometry::vertex_count)
        .sum();
    assert_eq!(colored, 2);
}

#[test]
fn test_explicit_axes_grid() {
    init_logging();
    // Row 0 holds y values, column 0 holds x values
    let table = DataTable::from_rows(&[
        vec![0.0, 10.0, 20.0],
        vec![1.0, 5.0, 6.0],
        vec![3.0, 7.0, 8.0],
    ])
    .unwrap();
    let grid = GridSource::explicit(table, 0, 0).unwrap();
    let mut series = GridSeries::new("explicit", grid);
    series.set_representation(Representation::Surface);
    let mut chart = Chart3D::default();
    chart.add_series(series);

    let ranges = chart.axis_ranges().unwrap();
    assert_eq!(ranges.range(Axis::X), (1.0, 3.0));
    assert_eq!(ranges.range(Axis::Y), (10.0, 20.0));
    assert_eq!(ranges.range(Axis::Z), (5.0, 8.0));
}

#[test]
fn test_options_json_round_trip() {
    let options = ChartOptions {
        chart_type: ChartType::Category,
        axis_ranges: [None, Some((0.0, 4.0)), None],
        ..ChartOptions::default()
    };
    let json = options.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["chart_type"], "Category");
    assert_eq!(value["limits"]["surface_tile_side"], 256);
    let parsed = ChartOptions::from_json(&json).unwrap();
    assert_eq!(parsed, options);
    let chart = Chart3D::new(parsed).unwrap();
    assert_eq!(chart.chart_type(), ChartType::Category);

    let broken = json.replace("8190", "0");
    assert!(matches!(
        ChartOptions::from_json(&broken),
        Err(GridscopeError::InvalidLimits(_))
    ));
}
