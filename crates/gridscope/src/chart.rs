//! The 3D chart: an ordered list of grid series sharing axes and a camera.

use glam::{Mat4, Vec3};
use gridscope_core::{
    Axis, AxisRanges, ChartOptions, ChartType, GridSource, GridscopeError, Representation, Result,
};
use gridscope_render::{uniforms, Camera, ColorMapRegistry, RenderBackend, UniformValue};
use gridscope_series::{GridSeries, SeriesContext};

/// Identifies a series within its chart.
///
/// Ids are never reused, so an id stays invalid once its series is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u64);

/// Matrices pushed to the backend on the last render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PushedMatrices {
    model_view: Mat4,
    projection: Mat4,
    camera: Mat4,
}

/// A 3D chart of grid series.
///
/// Series order is drawing order and, for bars, stacking order: each visible
/// bar series stands on the visible bar series added before it.
pub struct Chart3D {
    options: ChartOptions,
    series: Vec<(SeriesId, GridSeries)>,
    next_id: u64,
    color_maps: ColorMapRegistry,
    camera: Camera,
    viewport: (u32, u32),

    // State of the last rebuild and render pass
    built_ranges: Option<AxisRanges>,
    force_rebuild: bool,
    pushed: Option<PushedMatrices>,
}

impl Chart3D {
    /// Creates an empty chart.
    pub fn new(options: ChartOptions) -> Result<Self> {
        options.limits.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn chart_type(&self) -> ChartType {
        self.options.chart_type
    }

    /// Switches between scatter and category charts.
    ///
    /// Series whose representation does not fit the new type stay registered
    /// but are no longer built or drawn.
    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.options.chart_type = chart_type;
        self.force_rebuild = true;
    }

    /// Fixes the range of one axis, or restores auto-ranging with `None`.
    pub fn set_axis_range(&mut self, axis: Axis, range: Option<(f64, f64)>) {
        self.options.axis_ranges[axis.index()] = range;
    }

    pub fn color_maps(&self) -> &ColorMapRegistry {
        &self.color_maps
    }

    /// Registry of color maps series can refer to by name.
    pub fn color_maps_mut(&mut self) -> &mut ColorMapRegistry {
        self.force_rebuild = true;
        &mut self.color_maps
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Sets the viewport size in pixels and updates the camera aspect ratio.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        if width > 0 && height > 0 {
            self.camera.set_aspect_ratio(width as f32 / height as f32);
        }
    }

    /// Appends a series on top of the existing ones.
    pub fn add_series(&mut self, series: GridSeries) -> SeriesId {
        let id = SeriesId(self.next_id);
        self.next_id += 1;
        log::debug!("added series '{}' as {:?}", series.name(), id);
        self.series.push((id, series));
        self.force_rebuild = true;
        id
    }

    /// Removes a series and deletes its GPU resources.
    pub fn remove_series(&mut self, id: SeriesId, backend: &mut dyn RenderBackend) -> Result<GridSeries> {
        let position = self.position(id)?;
        let (_, mut series) = self.series.remove(position);
        series.release(backend)?;
        self.force_rebuild = true;
        Ok(series)
    }

    fn position(&self, id: SeriesId) -> Result<usize> {
        self.series
            .iter()
            .position(|(candidate, _)| *candidate == id)
            .ok_or(GridscopeError::UnknownSeries(id.0))
    }

    pub fn series(&self, id: SeriesId) -> Option<&GridSeries> {
        self.series.iter().find(|(candidate, _)| *candidate == id).map(|(_, s)| s)
    }

    /// Mutable access to a series. Changes are picked up by the next render.
    pub fn series_mut(&mut self, id: SeriesId) -> Option<&mut GridSeries> {
        self.series
            .iter_mut()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, s)| s)
    }

    /// Ids of every series, bottom first.
    pub fn series_ids(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.series.iter().map(|(id, _)| *id)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Returns true if the series is built and drawn by this chart.
    pub fn is_drawn(&self, series: &GridSeries) -> bool {
        !series.is_hidden() && self.options.chart_type.supports(series.representation())
    }

    fn is_stacked_bar(&self, series: &GridSeries) -> bool {
        series.representation() == Representation::Bar && self.is_drawn(series)
    }

    /// Grid sources of the visible bar series below position `position`.
    pub(crate) fn stack_below(&self, position: usize) -> Vec<&GridSource> {
        self.series[..position]
            .iter()
            .map(|(_, s)| s)
            .filter(|s| self.is_stacked_bar(s))
            .map(GridSeries::source)
            .collect()
    }

    /// Computes the axis ranges from the drawn series and the overrides.
    ///
    /// Each auto-ranged axis covers the union of the series bounds. Axes no
    /// drawn series contributes to fall back to `[0, 1]`.
    pub fn axis_ranges(&self) -> Result<AxisRanges> {
        let mut union: [Option<(f64, f64)>; 3] = [None; 3];
        for (position, (_, series)) in self.series.iter().enumerate() {
            if !self.is_drawn(series) {
                continue;
            }
            let bounds = series.axis_bounds(&self.stack_below(position))?;
            for (slot, (min, max)) in union.iter_mut().zip(bounds) {
                *slot = Some(match *slot {
                    Some((lo, hi)) => (lo.min(min), hi.max(max)),
                    None => (min, max),
                });
            }
        }

        let mut ranges = AxisRanges::default();
        for axis in Axis::ALL {
            let index = axis.index();
            if let Some((min, max)) = self.options.axis_ranges[index].or(union[index]) {
                ranges.set_range(axis, min, max);
            }
        }
        Ok(ranges)
    }

    /// Returns true if the next render has to rebuild geometry.
    pub fn needs_rebuild(&self) -> Result<bool> {
        if self.force_rebuild || self.series.iter().any(|(_, s)| s.needs_rebuild()) {
            return Ok(true);
        }
        Ok(self.built_ranges != Some(self.axis_ranges()?))
    }

    /// Rebuilds every series from scratch.
    ///
    /// Series the chart does not draw only release their resources.
    pub fn rebuild(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        let ranges = self.axis_ranges()?;
        let limits = self.options.limits;
        for position in 0..self.series.len() {
            let (below, rest) = self.series.split_at_mut(position);
            let series = &mut rest[0].1;
            let chart_type = self.options.chart_type;
            if !chart_type.supports(series.representation()) {
                log::debug!(
                    "skipping series '{}': {:?} is not drawn in a {:?} chart",
                    series.name(),
                    series.representation(),
                    chart_type
                );
                series.skip(backend)?;
                continue;
            }

            let stack: Vec<&GridSource> = below
                .iter()
                .map(|(_, s)| s)
                .filter(|s| {
                    s.representation() == Representation::Bar
                        && !s.is_hidden()
                        && chart_type.supports(s.representation())
                })
                .map(GridSeries::source)
                .collect();
            let context = SeriesContext {
                ranges: &ranges,
                limits: &limits,
                color_maps: &self.color_maps,
                stack_below: &stack,
            };
            series.rebuild(backend, &context)?;
        }
        log::info!("rebuilt chart with {} series", self.series.len());
        self.built_ranges = Some(ranges);
        self.force_rebuild = false;
        Ok(())
    }

    /// Maps the `[0, 1]` plot cube onto a unit cube centered at the origin.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::splat(-0.5))
    }

    /// Returns `projection * view * model`, mapping plot-cube points to clip space.
    pub fn plot_cube_to_clip(&self) -> Mat4 {
        self.camera.view_projection_matrix() * self.model_matrix()
    }

    /// Rebuilds if needed, then draws every visible series.
    ///
    /// Matrices are pushed only when they differ from the previous pass.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        if self.needs_rebuild()? {
            self.rebuild(backend)?;
        }

        let view = self.camera.view_matrix();
        let matrices = PushedMatrices {
            model_view: view * self.model_matrix(),
            projection: self.camera.projection_matrix(),
            camera: view,
        };
        if self.pushed != Some(matrices) {
            backend.set_uniform(uniforms::MODEL_VIEW, UniformValue::Mat4(matrices.model_view))?;
            backend.set_uniform(uniforms::PROJECTION, UniformValue::Mat4(matrices.projection))?;
            backend.set_uniform(uniforms::CAMERA, UniformValue::Mat4(matrices.camera))?;
            self.pushed = Some(matrices);
        }

        let Some(ranges) = self.built_ranges else {
            return Ok(());
        };
        let chart_type = self.options.chart_type;
        for (_, series) in &mut self.series {
            if chart_type.supports(series.representation()) {
                series.draw(backend, &ranges)?;
            }
        }
        Ok(())
    }

    /// Deletes the GPU resources of every series.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        for (_, series) in &mut self.series {
            series.release(backend)?;
        }
        self.built_ranges = None;
        self.pushed = None;
        self.force_rebuild = true;
        Ok(())
    }

    /// Drops every GPU handle without deleting it, forcing a full rebuild on
    /// the next render.
    pub fn clear_gpu_resources(&mut self) {
        for (_, series) in &mut self.series {
            series.clear_gpu_resources();
        }
        self.built_ranges = None;
        self.pushed = None;
        self.force_rebuild = true;
    }

    /// Sets the lower clip bound of a series, in axis units.
    pub fn set_clip_min(&mut self, id: SeriesId, axis: Axis, value: f64) -> Result<()> {
        let position = self.position(id)?;
        self.series[position].1.set_clip_min(axis, value);
        Ok(())
    }

    /// Sets the upper clip bound of a series, in axis units.
    pub fn set_clip_max(&mut self, id: SeriesId, axis: Axis, value: f64) -> Result<()> {
        let position = self.position(id)?;
        self.series[position].1.set_clip_max(axis, value);
        Ok(())
    }

    /// Applies a clip update sent by an interactive client with a raw axis tag.
    pub fn apply_client_clip_update(
        &mut self,
        id: SeriesId,
        raw_axis: u32,
        is_max: bool,
        value: f64,
    ) -> Result<()> {
        let position = self.position(id)?;
        self.series[position]
            .1
            .apply_client_clip_update(raw_axis, is_max, value)
    }

    /// Returns the iso-line segments of a surface series at `level`, as point
    /// pairs in axis units.
    pub fn iso_lines(&self, id: SeriesId, level: f64) -> Result<Vec<[f64; 3]>> {
        let position = self.position(id)?;
        let ranges = self.axis_ranges()?;
        let stack = self.stack_below(position);
        let context = SeriesContext {
            ranges: &ranges,
            limits: &self.options.limits,
            color_maps: &self.color_maps,
            stack_below: &stack,
        };
        self.series[position].1.iso_lines(level, &context)
    }

    pub(crate) fn with_context<T>(
        &self,
        position: usize,
        f: impl FnOnce(&GridSeries, &SeriesContext<'_>) -> Result<T>,
    ) -> Result<T> {
        let ranges = self.axis_ranges()?;
        let stack = self.stack_below(position);
        let context = SeriesContext {
            ranges: &ranges,
            limits: &self.options.limits,
            color_maps: &self.color_maps,
            stack_below: &stack,
        };
        f(&self.series[position].1, &context)
    }

    pub(crate) fn position_of(&self, id: SeriesId) -> Result<usize> {
        self.position(id)
    }
}

impl Default for Chart3D {
    fn default() -> Self {
        Self {
            options: ChartOptions::default(),
            series: Vec::new(),
            next_id: 0,
            color_maps: ColorMapRegistry::new(),
            camera: Camera::new(4.0 / 3.0),
            viewport: (800, 600),
            built_ranges: None,
            force_rebuild: true,
            pushed: None,
        }
    }
}
