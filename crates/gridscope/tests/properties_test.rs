//! Property tests over random grids, driven through the chart API.

use gridscope::*;
use proptest::prelude::*;

fn grid_values() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2..8_usize, 2..8_usize).prop_flat_map(|(rows, columns)| {
        prop::collection::vec(prop::collection::vec(-10.0..10.0_f64, columns), rows)
    })
}

fn surface_chart(rows: &[Vec<f64>]) -> (Chart3D, SeriesId) {
    let table = DataTable::from_rows(rows).unwrap();
    let grid = GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap();
    let mut series = GridSeries::new("random", grid);
    series.set_representation(Representation::Surface);
    let mut chart = Chart3D::default();
    let id = chart.add_series(series);
    (chart, id)
}

proptest! {
    #[test]
    fn prop_iso_points_lie_on_level(rows in grid_values(), t in 0.05..0.95_f64) {
        let (chart, id) = surface_chart(&rows);
        let (min, max) = chart.axis_ranges().unwrap().range(Axis::Z);
        let level = min + t * (max - min);
        let segments = chart.iso_lines(id, level).unwrap();
        prop_assert_eq!(segments.len() % 2, 0);
        let tolerance = 1e-4 * (max - min).max(1.0);
        let x_max = (rows.len() - 1) as f64;
        let y_max = (rows[0].len() - 1) as f64;
        for point in &segments {
            prop_assert!((point[2] - level).abs() < tolerance);
            prop_assert!(point[0] >= -tolerance && point[0] <= x_max + tolerance);
            prop_assert!(point[1] >= -tolerance && point[1] <= y_max + tolerance);
        }
    }

    #[test]
    fn prop_rebuild_counts_are_stable(rows in grid_values()) {
        let (mut chart, id) = surface_chart(&rows);
        let mut backend = RecordingBackend::new();
        chart.rebuild(&mut backend).unwrap();
        let first: Vec<usize> = chart.series(id).unwrap().tile_buffers().iter().map(|t| t.vertex_count).collect();
        chart.rebuild(&mut backend).unwrap();
        let second: Vec<usize> = chart.series(id).unwrap().tile_buffers().iter().map(|t| t.vertex_count).collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.iter().sum::<usize>(), rows.len() * rows[0].len());
    }
}
