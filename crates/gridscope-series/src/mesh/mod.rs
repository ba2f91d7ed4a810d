//! Vertex and index generation for every representation.
//!
//! The builders are pure: they read the grid source and write fresh
//! [`TileGeometry`] values, one per tile produced by the partitioner. All
//! positions are normalized into the `[0, 1]` plot cube.

mod bars;
mod points;
mod surface;

pub use bars::{bar_stack_heights, BAR_EDGE_INDICES, BAR_TRIANGLE_INDICES, ZERO_BAR_COMPENSATION};
pub use surface::{mesh_line_indices, strip_indices, strip_triangles};

use gridscope_core::{AxisRanges, EngineLimits, GridSource, Representation, Result, SeriesOptions};

use crate::partition::{self, CellKind};

/// What a tile holds and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Triangle strip plus optional mesh line strip.
    Surface,
    /// Point sprites.
    Points(CellKind),
    /// Triangle list plus outline edge list.
    Bars(CellKind),
}

/// Geometry of one tile, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGeometry {
    pub kind: TileKind,
    pub positions: Vec<[f32; 3]>,
    /// Point sizes, one per vertex (points only).
    pub sizes: Vec<f32>,
    /// Unnormalized RGBA colors, one per vertex (colored pools only).
    pub colors: Vec<[f32; 4]>,
    /// Palette coordinates, one per vertex (bars only).
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle strip (surfaces) or triangle list (bars).
    pub indices: Vec<u16>,
    /// Mesh line strip (surfaces) or edge list (bars).
    pub line_indices: Vec<u16>,
    /// Grid cell of each point or bar, in buffer order.
    pub cells: Vec<(usize, usize)>,
}

impl TileGeometry {
    pub(crate) fn new(kind: TileKind) -> Self {
        Self {
            kind,
            positions: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            line_indices: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the triangles of the tile as vertex index triples.
    ///
    /// Degenerate strip triangles are skipped.
    pub fn triangles(&self) -> Vec<[u16; 3]> {
        match self.kind {
            TileKind::Surface => strip_triangles(&self.indices).collect(),
            TileKind::Bars(_) => self
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            TileKind::Points(_) => Vec::new(),
        }
    }
}

/// Everything the builders need besides the grid itself.
#[derive(Debug, Clone, Copy)]
pub struct MeshInput<'a> {
    pub options: &'a SeriesOptions,
    pub ranges: &'a AxisRanges,
    pub limits: &'a EngineLimits,
    /// Bar series drawn below this one, bottom first.
    pub stack_below: &'a [&'a GridSource],
}

/// Builds the geometry of every tile of a grid.
pub fn build_tiles(grid: &GridSource, input: &MeshInput<'_>) -> Result<Vec<TileGeometry>> {
    let (nx, ny) = grid.cell_count();
    match input.options.representation {
        Representation::Surface => partition::surface_tiles(nx, ny, input.limits)?
            .iter()
            .map(|tile| surface::build(grid, tile, input.ranges))
            .collect(),
        Representation::Point => partition::item_tiles(grid, input.limits)?
            .iter()
            .map(|tile| points::build(grid, tile, input))
            .collect(),
        Representation::Bar => {
            let heights = bar_stack_heights(grid, input.stack_below)?;
            partition::item_tiles(grid, input.limits)?
                .iter()
                .map(|tile| bars::build(grid, tile, &heights, input))
                .collect()
        }
    }
}
