//! Screen-space picking.
//!
//! A pixel is unprojected through the inverse of `projection * view * model`,
//! which yields a ray directly in plot-cube space where the series geometry
//! lives.

use glam::Vec2;
use gridscope_core::{BarHit, Ray, Result, SurfaceHit};

use crate::chart::{Chart3D, SeriesId};

impl Chart3D {
    /// Returns the plot-cube ray under a pixel, or `None` for an empty viewport.
    pub fn screen_ray(&self, x: f32, y: f32) -> Option<Ray> {
        let inverse = self.plot_cube_to_clip().inverse();
        Ray::from_screen(Vec2::new(x, y), self.viewport(), inverse)
    }

    /// Returns every surface point of a series under the pixel, nearest first.
    ///
    /// Positions are in axis units. Points outside the series clip box are
    /// not reported, and neither is anything of a series the chart does not draw.
    pub fn pick_surface(&self, id: SeriesId, x: f32, y: f32) -> Result<Vec<SurfaceHit>> {
        let position = self.position_of(id)?;
        if !self.series(id).is_some_and(|series| self.is_drawn(series)) {
            return Ok(Vec::new());
        }
        let Some(ray) = self.screen_ray(x, y) else {
            return Ok(Vec::new());
        };
        self.with_context(position, |series, context| series.pick_surface(&ray, context))
    }

    /// Returns the bar of a series under the pixel, nearest to the camera.
    pub fn pick_bar(&self, id: SeriesId, x: f32, y: f32) -> Result<Option<BarHit>> {
        let position = self.position_of(id)?;
        if !self.series(id).is_some_and(|series| self.is_drawn(series)) {
            return Ok(None);
        }
        let Some(ray) = self.screen_ray(x, y) else {
            return Ok(None);
        };
        self.with_context(position, |series, context| series.pick_bar(&ray, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec3, Vec4};
    use gridscope_core::{Axis, DataTable, GridSource, Representation};
    use gridscope_series::GridSeries;

    fn project(chart: &Chart3D, point: glam::Vec3) -> (f32, f32) {
        let clip = chart.plot_cube_to_clip() * Vec4::new(point.x, point.y, point.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        let (width, height) = chart.viewport();
        (
            (ndc.x + 1.0) * width as f32 / 2.0,
            (1.0 - ndc.y) * height as f32 / 2.0,
        )
    }

    fn wave_chart() -> (Chart3D, SeriesId) {
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| (0..5).map(|j| f64::from(i * j) * 0.1).collect())
            .collect();
        let table = DataTable::from_rows(&rows).unwrap();
        let mut series = GridSeries::new(
            "wave",
            GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap(),
        );
        series.set_representation(Representation::Surface);
        let mut chart = Chart3D::default();
        let id = chart.add_series(series);
        (chart, id)
    }

    #[test]
    fn test_screen_ray_through_center() {
        let chart = Chart3D::default();
        let (width, height) = chart.viewport();
        let ray = chart
            .screen_ray(width as f32 / 2.0, height as f32 / 2.0)
            .unwrap();
        // The camera looks at the center of the plot cube
        let to_center = glam::Vec3::splat(0.5) - ray.origin;
        assert!(to_center.normalize().dot(ray.direction) > 0.9999);
    }

    #[test]
    fn test_pick_projected_vertex() {
        let (chart, id) = wave_chart();
        let ranges = chart.axis_ranges().unwrap();
        // Cell (2, 3) at x = 2, y = 3, z = 0.6
        let expected = DVec3::new(2.0, 3.0, 0.6);
        let (px, py) = project(&chart, ranges.normalize_point(expected));

        let hits = chart.pick_surface(id, px, py).unwrap();
        assert!(!hits.is_empty());
        assert!((hits[0].position - expected).length() < 1e-2);
    }

    #[test]
    fn test_pick_outside_misses() {
        let (chart, id) = wave_chart();
        assert!(chart.pick_surface(id, 0.0, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_pick_respects_clip() {
        let (mut chart, id) = wave_chart();
        let ranges = chart.axis_ranges().unwrap();
        let (px, py) = project(&chart, ranges.normalize_point(DVec3::new(2.0, 3.0, 0.6)));
        chart.set_clip_max(id, Axis::X, 1.5).unwrap();
        let hits = chart.pick_surface(id, px, py).unwrap();
        assert!(hits.iter().all(|hit| hit.position.x <= 1.5));
    }

    #[test]
    fn test_undrawn_series_is_not_pickable() {
        let (mut chart, id) = wave_chart();
        let ranges = chart.axis_ranges().unwrap();
        let (px, py) = project(&chart, ranges.normalize_point(DVec3::new(2.0, 3.0, 0.6)));
        assert!(!chart.pick_surface(id, px, py).unwrap().is_empty());

        chart.set_chart_type(gridscope_core::ChartType::Category);
        assert!(chart.pick_surface(id, px, py).unwrap().is_empty());
    }

    #[test]
    fn test_pick_bar_under_pixel() {
        let table = DataTable::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let mut series = GridSeries::new(
            "bars",
            GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap(),
        );
        series.set_representation(Representation::Bar);
        let mut chart = Chart3D::new(gridscope_core::ChartOptions {
            chart_type: gridscope_core::ChartType::Category,
            ..Default::default()
        })
        .unwrap();
        let id = chart.add_series(series);

        let ranges = chart.axis_ranges().unwrap();
        // Top face center of the bar at cell (1, 0)
        let (px, py) = project(&chart, ranges.normalize_point(DVec3::new(1.0, 0.0, 3.0)));
        let hit = chart.pick_bar(id, px, py).unwrap().unwrap();
        assert_eq!(hit.cell, (1, 0));
        assert_eq!(hit.model_index, (1, 0));
    }
}
