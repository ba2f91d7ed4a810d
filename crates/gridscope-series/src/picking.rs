//! Ray picking against surface and bar tiles.
//!
//! Rays are expressed in plot-cube space, the space the tile positions live
//! in. Hits are converted back to axis units and discarded when they fall
//! outside the clip box.

use glam::Vec3;
use gridscope_core::{AxisRanges, BarHit, ClipBox, GridSource, Ray, Result, SurfaceHit};

use crate::mesh::{TileGeometry, TileKind, BAR_TRIANGLE_INDICES};

/// Hits closer than this along the ray are the same point seen through
/// neighbouring triangles.
const DUPLICATE_HIT_EPSILON: f32 = 1e-6;

fn vertex(tile: &TileGeometry, index: u16) -> Vec3 {
    Vec3::from_array(tile.positions[usize::from(index)])
}

/// Returns every intersection of the ray with the surface tiles, nearest first.
pub fn pick_surface(
    tiles: &[TileGeometry],
    ray: &Ray,
    ranges: &AxisRanges,
    clip: &ClipBox,
) -> Vec<SurfaceHit> {
    let mut hits = Vec::new();
    for tile in tiles.iter().filter(|t| t.kind == TileKind::Surface) {
        for [a, b, c] in tile.triangles() {
            let Some(hit) = ray.intersect_triangle(vertex(tile, a), vertex(tile, b), vertex(tile, c))
            else {
                continue;
            };
            let position = ranges.denormalize_point(ray.at(hit.t));
            if clip.contains(position) {
                hits.push(SurfaceHit {
                    distance: hit.t,
                    position,
                });
            }
        }
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits.dedup_by(|later, earlier| later.distance - earlier.distance < DUPLICATE_HIT_EPSILON);
    hits
}

/// Returns the bar closest to the ray origin, if any.
pub fn pick_bar(
    tiles: &[TileGeometry],
    ray: &Ray,
    ranges: &AxisRanges,
    clip: &ClipBox,
    grid: &GridSource,
) -> Result<Option<BarHit>> {
    let mut best_distance = f32::INFINITY;
    let mut best_cell = None;

    for tile in tiles.iter().filter(|t| matches!(t.kind, TileKind::Bars(_))) {
        let bars = tile.indices.chunks_exact(BAR_TRIANGLE_INDICES.len());
        for (bar, &cell) in bars.zip(&tile.cells) {
            for triangle in bar.chunks_exact(3) {
                let Some(hit) = ray.intersect_triangle(
                    vertex(tile, triangle[0]),
                    vertex(tile, triangle[1]),
                    vertex(tile, triangle[2]),
                ) else {
                    continue;
                };
                if hit.t < best_distance && clip.contains(ranges.denormalize_point(ray.at(hit.t))) {
                    best_distance = hit.t;
                    best_cell = Some(cell);
                }
            }
        }
    }

    match best_cell {
        Some(cell) => Ok(Some(BarHit {
            distance: best_distance,
            cell,
            model_index: grid.table_position(cell.0, cell.1)?,
        })),
        None => Ok(None),
    }
}
