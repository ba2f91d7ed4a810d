//! Surface tiles: one vertex per cell, drawn as a boustrophedon triangle strip.

use glam::DVec3;
use gridscope_core::{AxisRanges, GridSource, Result};

use super::{TileGeometry, TileKind};
use crate::partition::SurfaceTile;

/// Triangle-strip indices over an `nx x ny` vertex block.
///
/// Each row pair is walked in alternating direction. The last index of a row
/// pair is repeated once, so the turn to the next row only produces
/// degenerate triangles. The strip holds `(nx - 1) * (2 * ny + 1)` indices.
#[allow(clippy::cast_possible_truncation)]
pub fn strip_indices(nx: usize, ny: usize) -> Vec<u16> {
    let mut strip = Vec::with_capacity(nx.saturating_sub(1) * (2 * ny + 1));
    if ny == 0 {
        return strip;
    }
    let mut forward = true;
    for i in 0..nx.saturating_sub(1) {
        let row = i * ny;
        let next = (i + 1) * ny;
        if forward {
            for j in 0..ny {
                strip.push((row + j) as u16);
                strip.push((next + j) as u16);
            }
            strip.push((next + ny - 1) as u16);
        } else {
            for j in (0..ny).rev() {
                strip.push((row + j) as u16);
                strip.push((next + j) as u16);
            }
            strip.push(next as u16);
        }
        forward = !forward;
    }
    strip
}

/// Wireframe indices over an `nx x ny` vertex block, as one line strip.
///
/// Rows are walked first in alternating direction, then columns, starting
/// from the column where the row walk ended. The strip holds `2 * nx * ny`
/// indices.
#[allow(clippy::cast_possible_truncation)]
pub fn mesh_line_indices(nx: usize, ny: usize) -> Vec<u16> {
    let mut lines = Vec::with_capacity(2 * nx * ny);
    let mut forward = true;
    for i in 0..nx {
        if forward {
            lines.extend((0..ny).map(|j| (i * ny + j) as u16));
        } else {
            lines.extend((0..ny).rev().map(|j| (i * ny + j) as u16));
        }
        forward = !forward;
    }

    let columns: Box<dyn Iterator<Item = usize>> = if forward {
        Box::new(0..ny)
    } else {
        Box::new((0..ny).rev())
    };
    let mut downward = true;
    for j in columns {
        if downward {
            lines.extend((0..nx).rev().map(|i| (i * ny + j) as u16));
        } else {
            lines.extend((0..nx).map(|i| (i * ny + j) as u16));
        }
        downward = !downward;
    }
    lines
}

/// Expands a triangle strip into triangles, skipping degenerate ones.
pub fn strip_triangles(strip: &[u16]) -> impl Iterator<Item = [u16; 3]> + '_ {
    strip
        .windows(3)
        .map(|w| [w[0], w[1], w[2]])
        .filter(|&[a, b, c]| a != b && b != c && a != c)
}

pub(super) fn build(
    grid: &GridSource,
    tile: &SurfaceTile,
    ranges: &AxisRanges,
) -> Result<TileGeometry> {
    let mut geometry = TileGeometry::new(TileKind::Surface);
    geometry.positions.reserve(tile.vertex_count());
    for i in tile.x_start..tile.x_start + tile.x_len {
        let x = grid.x_at(i)?;
        for j in tile.y_start..tile.y_start + tile.y_len {
            let point = DVec3::new(x, grid.y_at(j)?, grid.value_at(i, j)?);
            geometry.positions.push(ranges.normalize_point(point).to_array());
        }
    }
    geometry.indices = strip_indices(tile.x_len, tile.y_len);
    geometry.line_indices = mesh_line_indices(tile.x_len, tile.y_len);
    Ok(geometry)
}
