//! Bar tiles: one box of 8 vertices and 12 triangles per cell.
//!
//! Bars sit on the categorical x/y grid: cell `(i, j)` is centered on
//! category `i` along X and `j` along Y. Bars of stacked series start where
//! the series below them end.

use gridscope_core::{Axis, GridSource, GridscopeError, MIN_EXTENT, Result};

use super::{MeshInput, TileGeometry, TileKind};
use crate::partition::{CellKind, ItemTile};

/// Height given to bars whose value is zero or negative, so they stay visible.
pub const ZERO_BAR_COMPENSATION: f64 = 0.001;

/// Two triangles per face, for the 8 box corners.
pub const BAR_TRIANGLE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3, // back
    4, 5, 1, 4, 1, 0, // left
    3, 2, 6, 3, 6, 7, // right
    7, 6, 5, 7, 5, 4, // front
    4, 0, 3, 4, 3, 7, // bottom
    1, 5, 6, 1, 6, 2, // top
];

/// The 12 box edges as line pairs.
pub const BAR_EDGE_INDICES: [u16; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, 4, 5, 5, 6, 6, 7, 7, 4, 0, 4, 1, 5, 2, 6, 3, 7,
];

fn stacked_value(value: f64) -> f64 {
    if value <= 0.0 {
        ZERO_BAR_COMPENSATION
    } else {
        value
    }
}

/// Computes `(base, top)` of every bar in axis units, in row-major cell order.
///
/// `stack_below` lists the series drawn under this one; each must have the
/// same dimensions as `grid`.
pub fn bar_stack_heights(grid: &GridSource, stack_below: &[&GridSource]) -> Result<Vec<(f64, f64)>> {
    let dims = grid.cell_count();
    for other in stack_below {
        if other.cell_count() != dims {
            return Err(GridscopeError::StackDimensionMismatch {
                expected: dims,
                actual: other.cell_count(),
            });
        }
    }

    let (nx, ny) = dims;
    let mut heights = Vec::with_capacity(nx * ny);
    for i in 0..nx {
        for j in 0..ny {
            let mut base = 0.0;
            for other in stack_below {
                base += stacked_value(other.value_at(i, j)?);
            }
            heights.push((base, base + stacked_value(grid.value_at(i, j)?)));
        }
    }
    Ok(heights)
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn build(
    grid: &GridSource,
    tile: &ItemTile,
    heights: &[(f64, f64)],
    input: &MeshInput<'_>,
) -> Result<TileGeometry> {
    let ranges = input.ranges;
    let options = input.options;
    let ny = grid.cell_count().1;
    let half_width = options.bar_width_x / ranges.extent(Axis::X) / 2.0;
    let half_depth = options.bar_width_y / ranges.extent(Axis::Y) / 2.0;

    let mut geometry = TileGeometry::new(TileKind::Bars(tile.kind));
    geometry.positions.reserve(tile.cells.len() * 8);
    geometry.tex_coords.reserve(tile.cells.len() * 8);
    geometry.indices.reserve(tile.cells.len() * BAR_TRIANGLE_INDICES.len());
    geometry.line_indices.reserve(tile.cells.len() * BAR_EDGE_INDICES.len());

    for (k, &(i, j)) in tile.cells.iter().enumerate() {
        let (base, top) = heights[i * ny + j];
        let x = ranges.normalize(Axis::X, i as f64);
        let y = ranges.normalize(Axis::Y, j as f64);
        let z0 = ranges.normalize(Axis::Z, base);
        let z1 = ranges.normalize(Axis::Z, top);

        let corners = [
            (x - half_width, y + half_depth, z0),
            (x - half_width, y + half_depth, z1),
            (x + half_width, y + half_depth, z1),
            (x + half_width, y + half_depth, z0),
            (x - half_width, y - half_depth, z0),
            (x - half_width, y - half_depth, z1),
            (x + half_width, y - half_depth, z1),
            (x + half_width, y - half_depth, z0),
        ];
        geometry
            .positions
            .extend(corners.iter().map(|&(cx, cy, cz)| [cx as f32, cy as f32, cz as f32]));

        let cell = grid.cell(i, j)?;
        let tex_v = match (&options.color_map, tile.kind) {
            (Some(map), CellKind::Simple) => {
                let extent = map.max - map.min;
                let extent = if extent.abs() < MIN_EXTENT { MIN_EXTENT } else { extent };
                ((cell.z - map.min) / extent) as f32
            }
            _ => 0.0,
        };
        geometry.tex_coords.extend([[0.0, tex_v]; 8]);
        if let (CellKind::Colored, Some(color)) = (tile.kind, cell.color) {
            geometry.colors.extend([color.to_f32_array(); 8]);
        }

        let offset = (k * 8) as u16;
        geometry
            .indices
            .extend(BAR_TRIANGLE_INDICES.iter().map(|&index| offset + index));
        geometry
            .line_indices
            .extend(BAR_EDGE_INDICES.iter().map(|&index| offset + index));
    }
    geometry.cells.clone_from(&tile.cells);
    Ok(geometry)
}
