//! Point tiles: one vertex per cell, no topology.

use glam::DVec3;
use gridscope_core::{GridSource, Result};

use super::{MeshInput, TileGeometry, TileKind};
use crate::partition::{CellKind, ItemTile};

pub(super) fn build(grid: &GridSource, tile: &ItemTile, input: &MeshInput<'_>) -> Result<TileGeometry> {
    let mut geometry = TileGeometry::new(TileKind::Points(tile.kind));
    geometry.positions.reserve(tile.cells.len());
    geometry.sizes.reserve(tile.cells.len());

    for &(i, j) in &tile.cells {
        let cell = grid.cell(i, j)?;
        let position = input.ranges.normalize_point(DVec3::new(cell.x, cell.y, cell.z));
        geometry.positions.push(position.to_array());
        geometry
            .sizes
            .push(cell.size.unwrap_or(input.options.point_size));
        if tile.kind == CellKind::Colored {
            if let Some(color) = cell.color {
                geometry.colors.push(color.to_f32_array());
            }
        }
    }
    geometry.cells.clone_from(&tile.cells);
    Ok(geometry)
}
