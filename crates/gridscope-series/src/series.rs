//! A grid series: one grid source drawn with one representation.
//!
//! The series owns its settings, its clip box and the GPU resources of its
//! last build. Every rebuild releases those resources first and uploads the
//! tiles produced by the mesh builder from scratch.

use glam::Vec3;
use gridscope_core::{
    Axis, AxisRanges, BarHit, ClipBox, ClipUniforms, Color, ColorMapSettings, EngineLimits, GridSource, MeshPen,
    Ray, Representation, Result, SeriesOptions, SurfaceHit, MIN_EXTENT,
};
use gridscope_render::{
    attributes, uniforms, BufferHandle, ColorMapRegistry, RenderBackend, ResourceArena,
    TextureHandle, UniformValue, VertexAttribute, PALETTE_TEXTURE_SIZE,
};

use crate::isolines::iso_segments;
use crate::mesh::{bar_stack_heights, build_tiles, MeshInput, TileGeometry, TileKind};
use crate::picking;

/// Inputs shared by every series of a chart during a rebuild or a query.
#[derive(Clone, Copy)]
pub struct SeriesContext<'a> {
    pub ranges: &'a AxisRanges,
    pub limits: &'a EngineLimits,
    pub color_maps: &'a ColorMapRegistry,
    /// Visible bar series drawn below this one, bottom first.
    pub stack_below: &'a [&'a GridSource],
}

impl<'a> SeriesContext<'a> {
    fn mesh_input(&self, options: &'a SeriesOptions) -> MeshInput<'a> {
        MeshInput {
            options,
            ranges: self.ranges,
            limits: self.limits,
            stack_below: self.stack_below,
        }
    }
}

/// Buffers of one uploaded tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBuffers {
    pub kind: TileKind,
    pub vertex_count: usize,
    pub positions: BufferHandle,
    pub sizes: Option<BufferHandle>,
    pub colors: Option<BufferHandle>,
    pub tex_coords: Option<BufferHandle>,
    /// Triangle indices and their count.
    pub indices: Option<(BufferHandle, usize)>,
    /// Line indices and their count.
    pub line_indices: Option<(BufferHandle, usize)>,
}

impl TileBuffers {
    fn attributes(&self) -> Vec<VertexAttribute> {
        let mut bound = vec![VertexAttribute::new(attributes::POSITION, self.positions, 3)];
        if let Some(sizes) = self.sizes {
            bound.push(VertexAttribute::new(attributes::SIZE, sizes, 1));
        }
        if let Some(colors) = self.colors {
            bound.push(VertexAttribute::new(attributes::COLOR, colors, 4));
        }
        if let Some(tex_coords) = self.tex_coords {
            bound.push(VertexAttribute::new(attributes::TEX_COORD, tex_coords, 2));
        }
        bound
    }
}

/// Line buffer of one iso level.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoLineBuffers {
    pub level: f64,
    /// `None` when the level does not cross the surface.
    pub positions: Option<BufferHandle>,
    pub vertex_count: usize,
}

/// Generations the last build was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStamp {
    pub grid: u64,
    pub settings: u64,
}

/// A named grid source plus everything needed to draw it.
pub struct GridSeries {
    name: String,
    source: GridSource,
    options: SeriesOptions,
    clip: ClipBox,
    /// Plot-cube clip corners and the ranges they were computed for.
    clip_cache: Option<(AxisRanges, ClipUniforms)>,
    iso_levels: Vec<f64>,
    settings_generation: u64,

    // GPU resources of the last build
    arena: ResourceArena,
    tiles: Vec<TileBuffers>,
    iso_lines: Vec<IsoLineBuffers>,
    palette: Option<TextureHandle>,
    built: Option<ChangeStamp>,
}

impl GridSeries {
    /// Creates a series with default options.
    pub fn new(name: impl Into<String>, source: GridSource) -> Self {
        Self::with_options(name, source, SeriesOptions::default())
    }

    pub fn with_options(name: impl Into<String>, source: GridSource, options: SeriesOptions) -> Self {
        Self {
            name: name.into(),
            source,
            options,
            clip: ClipBox::new(),
            clip_cache: None,
            iso_levels: Vec::new(),
            settings_generation: 0,
            arena: ResourceArena::new(),
            tiles: Vec::new(),
            iso_lines: Vec::new(),
            palette: None,
            built: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &GridSource {
        &self.source
    }

    /// Mutable access to the grid. Mutations bump the grid generation.
    pub fn source_mut(&mut self) -> &mut GridSource {
        &mut self.source
    }

    pub fn options(&self) -> &SeriesOptions {
        &self.options
    }

    /// Replaces every option at once.
    pub fn set_options(&mut self, options: SeriesOptions) {
        self.options = options;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.settings_generation += 1;
    }

    pub fn representation(&self) -> Representation {
        self.options.representation
    }

    pub fn set_representation(&mut self, representation: Representation) {
        self.options.representation = representation;
        self.invalidate();
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.options.point_size = size;
        self.invalidate();
    }

    /// Sets the bar footprint as a fraction of the category spacing per axis.
    pub fn set_bar_width(&mut self, x: f64, y: f64) {
        self.options.bar_width_x = x;
        self.options.bar_width_y = y;
        self.invalidate();
    }

    pub fn set_surface_mesh_enabled(&mut self, enabled: bool) {
        self.options.surface_mesh_enabled = enabled;
        self.invalidate();
    }

    pub fn set_mesh_pen(&mut self, pen: MeshPen) {
        self.options.mesh_pen = pen;
        self.invalidate();
    }

    pub fn set_color_map(&mut self, color_map: Option<ColorMapSettings>) {
        self.options.color_map = color_map;
        self.invalidate();
    }

    pub fn set_iso_line_color(&mut self, color: Color) {
        self.options.iso_line_color = color;
        self.invalidate();
    }

    pub fn is_hidden(&self) -> bool {
        self.options.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.options.hidden = hidden;
        self.invalidate();
    }

    pub fn iso_levels(&self) -> &[f64] {
        &self.iso_levels
    }

    /// Adds an iso level (axis units) drawn with the surface.
    pub fn add_iso_level(&mut self, level: f64) {
        self.iso_levels.push(level);
        self.invalidate();
    }

    pub fn set_iso_levels(&mut self, levels: Vec<f64>) {
        self.iso_levels = levels;
        self.invalidate();
    }

    /// Returns the generations of the grid and the settings right now.
    pub fn change_stamp(&self) -> ChangeStamp {
        ChangeStamp {
            grid: self.source.generation(),
            settings: self.settings_generation,
        }
    }

    /// Returns true if the grid or a setting changed since the last rebuild.
    pub fn needs_rebuild(&self) -> bool {
        self.built != Some(self.change_stamp())
    }

    pub fn clip(&self) -> &ClipBox {
        &self.clip
    }

    pub fn set_clip_min(&mut self, axis: Axis, value: f64) {
        self.clip.set_clip_min(axis, value);
    }

    pub fn set_clip_max(&mut self, axis: Axis, value: f64) {
        self.clip.set_clip_max(axis, value);
    }

    /// Applies a clip update coming from an interactive client.
    pub fn apply_client_clip_update(&mut self, raw_axis: u32, is_max: bool, value: f64) -> Result<()> {
        self.clip.apply_client_update(raw_axis, is_max, value)
    }

    /// Returns the axis-unit extent the series wants on every axis.
    ///
    /// Bars live on categories, so their x/y ranges are `[-0.5, N - 0.5]` and
    /// their z range runs from 0 to the tallest stacked bar.
    #[allow(clippy::cast_precision_loss)]
    pub fn axis_bounds(&self, stack_below: &[&GridSource]) -> Result<[(f64, f64); 3]> {
        match self.options.representation {
            Representation::Bar => {
                let (nx, ny) = self.source.cell_count();
                let top = bar_stack_heights(&self.source, stack_below)?
                    .iter()
                    .fold(0.0_f64, |max, &(_, top)| max.max(top));
                Ok([
                    (-0.5, nx as f64 - 0.5),
                    (-0.5, ny as f64 - 0.5),
                    (0.0, top),
                ])
            }
            Representation::Point | Representation::Surface => Ok([
                self.source.bounds(Axis::X)?,
                self.source.bounds(Axis::Y)?,
                self.source.bounds(Axis::Z)?,
            ]),
        }
    }

    /// Builds the tile geometry without touching the backend.
    pub fn build_geometry(&self, context: &SeriesContext<'_>) -> Result<Vec<TileGeometry>> {
        build_tiles(&self.source, &context.mesh_input(&self.options))
    }

    /// Discards every resource of the previous build and uploads fresh ones.
    ///
    /// Hidden series only release their resources.
    pub fn rebuild(&mut self, backend: &mut dyn RenderBackend, context: &SeriesContext<'_>) -> Result<()> {
        if self.options.hidden {
            log::debug!("series '{}' is hidden, nothing to build", self.name);
            return self.skip(backend);
        }
        self.release(backend)?;
        let stamp = self.change_stamp();

        let geometry = self.build_geometry(context)?;
        for tile in &geometry {
            let buffers = self.upload_tile(backend, tile)?;
            self.tiles.push(buffers);
        }

        if let Some(settings) = &self.options.color_map {
            match context.color_maps.get(&settings.name) {
                Some(map) => {
                    let rgba = map.texture_rgba(PALETTE_TEXTURE_SIZE);
                    self.palette =
                        Some(self.arena.texture(backend, 1, PALETTE_TEXTURE_SIZE, &rgba)?);
                }
                None => log::warn!(
                    "series '{}' uses unknown color map '{}'",
                    self.name,
                    settings.name
                ),
            }
        }

        if self.options.representation == Representation::Surface {
            for &level in &self.iso_levels {
                let segments = iso_segments(&geometry, context.ranges.normalize(Axis::Z, level) as f32);
                let positions = if segments.is_empty() {
                    None
                } else {
                    Some(self.arena.vertex_buffer(backend, &segments)?)
                };
                self.iso_lines.push(IsoLineBuffers {
                    level,
                    positions,
                    vertex_count: segments.len(),
                });
            }
        }

        log::info!(
            "rebuilt series '{}': {} tiles, {} vertices, {} iso levels",
            self.name,
            self.tiles.len(),
            self.tiles.iter().map(|t| t.vertex_count).sum::<usize>(),
            self.iso_lines.len()
        );
        self.built = Some(stamp);
        Ok(())
    }

    fn upload_tile(&mut self, backend: &mut dyn RenderBackend, tile: &TileGeometry) -> Result<TileBuffers> {
        let arena = &mut self.arena;
        let positions = arena.vertex_buffer(backend, &tile.positions)?;
        let sizes = if tile.sizes.is_empty() {
            None
        } else {
            Some(arena.vertex_buffer(backend, &tile.sizes)?)
        };
        let colors = if tile.colors.is_empty() {
            None
        } else {
            Some(arena.vertex_buffer(backend, &tile.colors)?)
        };
        let tex_coords = if tile.tex_coords.is_empty() {
            None
        } else {
            Some(arena.vertex_buffer(backend, &tile.tex_coords)?)
        };
        let indices = if tile.indices.is_empty() {
            None
        } else {
            Some((arena.index_buffer(backend, &tile.indices)?, tile.indices.len()))
        };
        let line_indices = if tile.line_indices.is_empty() {
            None
        } else {
            Some((
                arena.index_buffer(backend, &tile.line_indices)?,
                tile.line_indices.len(),
            ))
        };
        Ok(TileBuffers {
            kind: tile.kind,
            vertex_count: tile.vertex_count(),
            positions,
            sizes,
            colors,
            tex_coords,
            indices,
            line_indices,
        })
    }

    /// Deletes every resource created by the last build.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.arena.release(backend)?;
        self.tiles.clear();
        self.iso_lines.clear();
        self.palette = None;
        self.built = None;
        Ok(())
    }

    /// Drops the handles of the last build without deleting them.
    ///
    /// Used when switching to a new backend; the next rebuild starts clean.
    pub fn clear_gpu_resources(&mut self) {
        self.arena.forget();
        self.tiles.clear();
        self.iso_lines.clear();
        self.palette = None;
        self.built = None;
    }

    /// Releases the resources of a series its chart does not draw and records
    /// the current state as handled.
    pub fn skip(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.release(backend)?;
        self.built = Some(self.change_stamp());
        Ok(())
    }

    pub fn tile_buffers(&self) -> &[TileBuffers] {
        &self.tiles
    }

    pub fn iso_line_buffers(&self) -> &[IsoLineBuffers] {
        &self.iso_lines
    }

    pub fn palette(&self) -> Option<TextureHandle> {
        self.palette
    }

    /// Number of live resources owned by the series.
    pub fn resource_count(&self) -> usize {
        self.arena.buffer_count() + self.arena.texture_count()
    }

    /// Plot-cube offset and scale of the color map range.
    fn color_map_transform(&self, ranges: &AxisRanges) -> (f32, f32) {
        match &self.options.color_map {
            Some(map) => {
                let offset = ranges.normalize(Axis::Z, map.min);
                let span = ranges.normalize(Axis::Z, map.max) - offset;
                let scale = if span.abs() < MIN_EXTENT {
                    1.0 / MIN_EXTENT
                } else {
                    1.0 / span
                };
                (offset as f32, scale as f32)
            }
            None => (0.0, 1.0),
        }
    }

    fn set_pen(backend: &mut dyn RenderBackend, color: Color, width: f32) -> Result<()> {
        backend.set_uniform(uniforms::COLOR, UniformValue::Vec4(color.to_unit_array()))?;
        backend.set_uniform(uniforms::LINE_WIDTH, UniformValue::Float(width))?;
        Ok(())
    }

    /// Returns the clip corners in plot-cube units.
    ///
    /// Recomputed only when the clip box changed or the ranges moved.
    fn clip_uniforms(&mut self, ranges: &AxisRanges) -> ClipUniforms {
        let dirty = self.clip.take_dirty();
        match self.clip_cache {
            Some((cached, clip)) if !dirty.any() && cached == *ranges => clip,
            _ => {
                let clip = self.clip.uniforms(ranges);
                self.clip_cache = Some((*ranges, clip));
                clip
            }
        }
    }

    /// Issues the draw calls of the last build.
    ///
    /// Uniforms live in one namespace shared by every series, so the clip
    /// corners are pushed before each series draws.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, ranges: &AxisRanges) -> Result<()> {
        if self.options.hidden {
            return Ok(());
        }

        let clip = self.clip_uniforms(ranges);
        backend.set_uniform(uniforms::CLIP_MIN, UniformValue::Vec3(clip.min))?;
        backend.set_uniform(uniforms::CLIP_MAX, UniformValue::Vec3(clip.max))?;

        if self.options.representation != Representation::Bar {
            let (offset, scale) = self.color_map_transform(ranges);
            backend.set_uniform(uniforms::OFFSET, UniformValue::Float(offset))?;
            backend.set_uniform(uniforms::SCALE_FACTOR, UniformValue::Float(scale))?;
        }
        if let Some(palette) = self.palette {
            backend.set_uniform(uniforms::SAMPLER, UniformValue::Texture(palette))?;
        }

        let pen = self.options.mesh_pen;
        for tile in &self.tiles {
            let bound = tile.attributes();
            match tile.kind {
                TileKind::Surface => {
                    if let Some((indices, count)) = tile.indices {
                        backend.draw_triangle_strip(&bound, indices, count)?;
                    }
                    if self.options.surface_mesh_enabled {
                        if let Some((lines, count)) = tile.line_indices {
                            Self::set_pen(backend, pen.color, pen.line_width())?;
                            backend.draw_line_strip(&bound, lines, count)?;
                        }
                    }
                }
                TileKind::Points(_) => backend.draw_points(&bound, tile.vertex_count)?,
                TileKind::Bars(_) => {
                    if let Some((indices, count)) = tile.indices {
                        backend.draw_triangles(&bound, indices, count)?;
                    }
                    if let Some((edges, count)) = tile.line_indices {
                        Self::set_pen(backend, pen.color, pen.line_width())?;
                        backend.draw_lines(&bound, Some(edges), count)?;
                    }
                }
            }
        }

        let drawn_levels: Vec<_> = self
            .iso_lines
            .iter()
            .filter_map(|iso| iso.positions.map(|p| (p, iso.vertex_count)))
            .collect();
        if !drawn_levels.is_empty() {
            Self::set_pen(backend, self.options.iso_line_color, pen.line_width())?;
            for (positions, count) in drawn_levels {
                let bound = [VertexAttribute::new(attributes::POSITION, positions, 3)];
                backend.draw_lines(&bound, None, count)?;
            }
        }
        Ok(())
    }

    /// Intersects a plot-cube ray with the surface, nearest hit first.
    ///
    /// Returns nothing unless the series is a visible surface.
    pub fn pick_surface(&self, ray: &Ray, context: &SeriesContext<'_>) -> Result<Vec<SurfaceHit>> {
        if self.options.hidden || self.options.representation != Representation::Surface {
            return Ok(Vec::new());
        }
        let tiles = self.build_geometry(context)?;
        Ok(picking::pick_surface(&tiles, ray, context.ranges, &self.clip))
    }

    /// Returns the bar nearest to the ray origin.
    pub fn pick_bar(&self, ray: &Ray, context: &SeriesContext<'_>) -> Result<Option<BarHit>> {
        if self.options.hidden || self.options.representation != Representation::Bar {
            return Ok(None);
        }
        let tiles = self.build_geometry(context)?;
        picking::pick_bar(&tiles, ray, context.ranges, &self.clip, &self.source)
    }

    /// Returns the iso-line segments of `level` (axis units) as point pairs in
    /// axis units.
    pub fn iso_lines(&self, level: f64, context: &SeriesContext<'_>) -> Result<Vec<[f64; 3]>> {
        if self.options.representation != Representation::Surface {
            return Ok(Vec::new());
        }
        let tiles = self.build_geometry(context)?;
        let normalized = context.ranges.normalize(Axis::Z, level) as f32;
        Ok(iso_segments(&tiles, normalized)
            .into_iter()
            .map(|p| context.ranges.denormalize_point(Vec3::from_array(p)).to_array())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::CellKind;
    use gridscope_core::DataTable;
    use gridscope_render::{Primitive, RecordingBackend};

    fn pyramid() -> GridSource {
        let table = DataTable::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 2.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap()
    }

    struct Fixture {
        ranges: AxisRanges,
        limits: EngineLimits,
        color_maps: ColorMapRegistry,
    }

    impl Fixture {
        fn new(ranges: AxisRanges) -> Self {
            Self {
                ranges,
                limits: EngineLimits::default(),
                color_maps: ColorMapRegistry::new(),
            }
        }

        fn context(&self) -> SeriesContext<'_> {
            SeriesContext {
                ranges: &self.ranges,
                limits: &self.limits,
                color_maps: &self.color_maps,
                stack_below: &[],
            }
        }
    }

    fn surface_series() -> GridSeries {
        let mut series = GridSeries::new("pyramid", pyramid());
        series.set_representation(Representation::Surface);
        series
    }

    #[test]
    fn test_rebuild_uploads_surface() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        assert!(series.needs_rebuild());

        series.rebuild(&mut backend, &fixture.context()).unwrap();
        assert!(!series.needs_rebuild());
        let tiles = series.tile_buffers();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].vertex_count, 9);
        assert_eq!(backend.floats(tiles[0].positions).unwrap().len(), 27);
        let (strip, count) = tiles[0].indices.unwrap();
        assert_eq!(count, 14);
        assert_eq!(backend.indices(strip).unwrap().len(), 14);
        // positions, strip, mesh lines
        assert_eq!(backend.live_buffer_count(), 3);
    }

    #[test]
    fn test_rebuild_releases_previous_resources() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        let first: Vec<_> = series.tile_buffers().iter().map(|t| t.vertex_count).collect();
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        let second: Vec<_> = series.tile_buffers().iter().map(|t| t.vertex_count).collect();

        assert_eq!(first, second);
        assert_eq!(backend.live_buffer_count(), 3);
        assert_eq!(backend.deleted_buffer_count(), 3);
    }

    #[test]
    fn test_setters_invalidate() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.rebuild(&mut backend, &fixture.context()).unwrap();

        series.set_point_size(4.0);
        assert!(series.needs_rebuild());
        series.rebuild(&mut backend, &fixture.context()).unwrap();

        series.source_mut().table_mut().set_value(0, 0, 5.0).unwrap();
        assert!(series.needs_rebuild());
    }

    #[test]
    fn test_draw_surface_with_mesh() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_surface_mesh_enabled(true);
        series.set_mesh_pen(MeshPen {
            color: Color::WHITE,
            width: 0.0,
        });
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        series.draw(&mut backend, &fixture.ranges).unwrap();

        assert_eq!(backend.draws_of(Primitive::TriangleStrip).count(), 1);
        let lines: Vec<_> = backend.draws_of(Primitive::LineStrip).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].count, 18);
        assert_eq!(
            backend.uniform(uniforms::LINE_WIDTH),
            Some(UniformValue::Float(1.0))
        );
        assert_eq!(
            backend.uniform(uniforms::OFFSET),
            Some(UniformValue::Float(0.0))
        );
        assert_eq!(
            backend.uniform(uniforms::SCALE_FACTOR),
            Some(UniformValue::Float(1.0))
        );
    }

    fn clip_max_z(backend: &RecordingBackend) -> f32 {
        match backend.uniform(uniforms::CLIP_MAX) {
            Some(UniformValue::Vec3(max)) => max[2],
            other => panic!("unexpected clip max {other:?}"),
        }
    }

    #[test]
    fn test_clip_uniforms_pushed_every_draw() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.rebuild(&mut backend, &fixture.context()).unwrap();

        let pushes = |backend: &RecordingBackend| {
            backend
                .uniform_log()
                .iter()
                .filter(|(name, _)| name == uniforms::CLIP_MAX)
                .count()
        };
        series.draw(&mut backend, &fixture.ranges).unwrap();
        series.draw(&mut backend, &fixture.ranges).unwrap();
        assert_eq!(pushes(&backend), 2);
        assert_eq!(clip_max_z(&backend), f32::INFINITY);

        series.set_clip_max(Axis::Z, 1.0);
        series.draw(&mut backend, &fixture.ranges).unwrap();
        assert!((clip_max_z(&backend) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clip_follows_axis_ranges() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_clip_max(Axis::Z, 1.0);
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        series.draw(&mut backend, &fixture.ranges).unwrap();
        assert!((clip_max_z(&backend) - 0.5).abs() < 1e-6);

        // The clip box is untouched, only the z range grows
        let taller = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 4.0)));
        series.rebuild(&mut backend, &taller.context()).unwrap();
        series.draw(&mut backend, &taller.ranges).unwrap();
        assert!((clip_max_z(&backend) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_clip_pushed_to_fresh_backend() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut series = surface_series();
        series.set_clip_max(Axis::Z, 1.0);

        let mut first = RecordingBackend::new();
        series.rebuild(&mut first, &fixture.context()).unwrap();
        series.draw(&mut first, &fixture.ranges).unwrap();

        series.clear_gpu_resources();
        let mut second = RecordingBackend::new();
        series.rebuild(&mut second, &fixture.context()).unwrap();
        series.draw(&mut second, &fixture.ranges).unwrap();
        assert!((clip_max_z(&second) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clip_does_not_leak_between_series() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut clipped = surface_series();
        let mut open = surface_series();
        clipped.rebuild(&mut backend, &fixture.context()).unwrap();
        open.rebuild(&mut backend, &fixture.context()).unwrap();
        clipped.draw(&mut backend, &fixture.ranges).unwrap();
        open.draw(&mut backend, &fixture.ranges).unwrap();

        clipped.set_clip_max(Axis::Z, 1.0);
        clipped.draw(&mut backend, &fixture.ranges).unwrap();
        assert!((clip_max_z(&backend) - 0.5).abs() < 1e-6);
        open.draw(&mut backend, &fixture.ranges).unwrap();
        assert_eq!(clip_max_z(&backend), f32::INFINITY);
    }

    #[test]
    fn test_invalid_limits_fail_rebuild() {
        let mut fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        fixture.limits = EngineLimits {
            surface_tile_side: 1,
            ..EngineLimits::default()
        };
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        assert!(series.rebuild(&mut backend, &fixture.context()).is_err());
        assert!(series.iso_lines(1.0, &fixture.context()).is_err());

        fixture.limits = EngineLimits {
            item_buffer_limit: 0,
            ..EngineLimits::default()
        };
        series.set_representation(Representation::Bar);
        assert!(series.rebuild(&mut backend, &fixture.context()).is_err());
    }

    #[test]
    fn test_hidden_series_is_skipped() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_hidden(true);
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        series.draw(&mut backend, &fixture.ranges).unwrap();
        assert!(series.tile_buffers().is_empty());
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn test_color_map_palette_and_uniforms() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 4.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_color_map(Some(ColorMapSettings::new("viridis", 1.0, 3.0)));
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        let palette = series.palette().unwrap();
        assert_eq!(backend.texture(palette).unwrap().height, PALETTE_TEXTURE_SIZE);

        series.draw(&mut backend, &fixture.ranges).unwrap();
        assert_eq!(
            backend.uniform(uniforms::SAMPLER),
            Some(UniformValue::Texture(palette))
        );
        assert_eq!(
            backend.uniform(uniforms::OFFSET),
            Some(UniformValue::Float(0.25))
        );
        assert_eq!(
            backend.uniform(uniforms::SCALE_FACTOR),
            Some(UniformValue::Float(2.0))
        );
    }

    #[test]
    fn test_unknown_color_map_is_not_fatal() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_color_map(Some(ColorMapSettings::new("no-such-map", 0.0, 1.0)));
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        assert!(series.palette().is_none());
        assert_eq!(series.tile_buffers().len(), 1);
    }

    #[test]
    fn test_iso_level_buffers() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = surface_series();
        series.set_iso_levels(vec![1.5, 3.0]);
        series.rebuild(&mut backend, &fixture.context()).unwrap();

        let iso = series.iso_line_buffers();
        assert_eq!(iso.len(), 2);
        assert_eq!(iso[0].vertex_count, 12);
        assert!(iso[1].positions.is_none());

        series.draw(&mut backend, &fixture.ranges).unwrap();
        let lines: Vec<_> = backend
            .draws_of(Primitive::Lines)
            .filter(|d| d.indices.is_none())
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].count, 12);
    }

    #[test]
    fn test_iso_lines_in_axis_units() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let series = surface_series();
        let segments = series.iso_lines(1.5, &fixture.context()).unwrap();
        assert_eq!(segments.len(), 12);
        assert!(segments.iter().all(|p| (p[2] - 1.5).abs() < 1e-5));
        assert!(series.iso_lines(2.5, &fixture.context()).unwrap().is_empty());
    }

    #[test]
    fn test_bar_draw_calls() {
        let table = DataTable::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let grid = GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap();
        let mut series = GridSeries::new("bars", grid);
        series.set_representation(Representation::Bar);
        let bounds = series.axis_bounds(&[]).unwrap();
        assert_eq!(bounds[0], (-0.5, 1.5));
        assert_eq!(bounds[2], (0.0, 4.0));

        let fixture = Fixture::new(AxisRanges::new(bounds[0], bounds[1], bounds[2]));
        let mut backend = RecordingBackend::new();
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        assert_eq!(series.tile_buffers()[0].kind, TileKind::Bars(CellKind::Simple));
        series.draw(&mut backend, &fixture.ranges).unwrap();

        let triangles: Vec<_> = backend.draws_of(Primitive::Triangles).collect();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].count, 4 * 36);
        let edges: Vec<_> = backend.draws_of(Primitive::Lines).collect();
        assert_eq!(edges[0].count, 4 * 24);
        assert!(backend.uniform(uniforms::OFFSET).is_none());
    }

    #[test]
    fn test_points_use_size_attribute() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let mut backend = RecordingBackend::new();
        let mut series = GridSeries::new("points", pyramid());
        series.rebuild(&mut backend, &fixture.context()).unwrap();
        series.draw(&mut backend, &fixture.ranges).unwrap();

        let points: Vec<_> = backend.draws_of(Primitive::Points).collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].count, 9);
        assert!(points[0]
            .attributes
            .iter()
            .any(|a| a.name == attributes::SIZE && a.components == 1));
    }

    #[test]
    fn test_pick_surface_only_for_surfaces() {
        let fixture = Fixture::new(AxisRanges::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::NEG_Z);
        let series = surface_series();
        assert_eq!(series.pick_surface(&ray, &fixture.context()).unwrap().len(), 1);

        let points = GridSeries::new("points", pyramid());
        assert!(points.pick_surface(&ray, &fixture.context()).unwrap().is_empty());
        assert!(points.pick_bar(&ray, &fixture.context()).unwrap().is_none());
    }
}
