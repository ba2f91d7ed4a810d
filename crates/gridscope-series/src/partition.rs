//! Splitting grids into tiles that fit the hardware buffer limits.
//!
//! Surfaces are cut into a 2-D grid of rectangular tiles whose side is at
//! most `surface_tile_side` vertices; neighbouring tiles share one row or
//! column so the surface stays closed. Points and bars are linearized in
//! row-major order and cut into runs of at most `item_buffer_limit` cells,
//! with cells that carry an explicit color kept in their own runs.

use gridscope_core::{EngineLimits, GridSource, Result};

/// A rectangular block of surface vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTile {
    /// First grid row covered.
    pub x_start: usize,
    /// First grid column covered.
    pub y_start: usize,
    /// Number of grid rows covered.
    pub x_len: usize,
    /// Number of grid columns covered.
    pub y_len: usize,
}

impl SurfaceTile {
    pub fn vertex_count(&self) -> usize {
        self.x_len * self.y_len
    }
}

/// Vertex pool a cell is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Colored through the series color map.
    Simple,
    /// Carries its own color.
    Colored,
}

/// A run of cells drawn from one vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTile {
    pub kind: CellKind,
    /// Logical `(i, j)` of every cell, in buffer order.
    pub cells: Vec<(usize, usize)>,
}

/// Number of tiles needed along one surface axis.
fn surface_tile_count(n: usize, side: usize) -> usize {
    n.div_ceil(side - 1)
}

fn surface_spans(n: usize, side: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..surface_tile_count(n, side)).map(move |k| {
        let start = k * (side - 1);
        (start, side.min(n - start))
    })
}

/// Tiles an `nx x ny` surface.
pub fn surface_tiles(nx: usize, ny: usize, limits: &EngineLimits) -> Result<Vec<SurfaceTile>> {
    limits.validate()?;
    let side = limits.surface_tile_side;
    let tiles: Vec<SurfaceTile> = surface_spans(nx, side)
        .flat_map(|(x_start, x_len)| {
            surface_spans(ny, side).map(move |(y_start, y_len)| SurfaceTile {
                x_start,
                y_start,
                x_len,
                y_len,
            })
        })
        .collect();
    log::debug!("surface {nx}x{ny} split into {} tiles", tiles.len());
    Ok(tiles)
}

/// Tiles the cells of a grid for point or bar rendering.
///
/// Simple tiles come first, then colored tiles.
pub fn item_tiles(grid: &GridSource, limits: &EngineLimits) -> Result<Vec<ItemTile>> {
    limits.validate()?;
    let limit = limits.item_buffer_limit;
    let (simple_count, colored_count) = grid.count_cell_kinds()?;
    let mut simple = Vec::with_capacity(simple_count);
    let mut colored = Vec::with_capacity(colored_count);

    let (nx, ny) = grid.cell_count();
    for i in 0..nx {
        for j in 0..ny {
            if grid.color_override_at(i, j)?.is_some() {
                colored.push((i, j));
            } else {
                simple.push((i, j));
            }
        }
    }

    let mut tiles = Vec::with_capacity(simple_count.div_ceil(limit) + colored_count.div_ceil(limit));
    for (kind, cells) in [(CellKind::Simple, simple), (CellKind::Colored, colored)] {
        tiles.extend(cells.chunks(limit).map(|chunk| ItemTile {
            kind,
            cells: chunk.to_vec(),
        }));
    }
    log::debug!(
        "{simple_count} simple and {colored_count} colored cells split into {} tiles",
        tiles.len()
    );
    Ok(tiles)
}
