//! Iso-line extraction from surface tiles.

use glam::Vec3;

use crate::mesh::{TileGeometry, TileKind};

/// Interpolates the point where edge `a -> b` crosses `level`, if it does.
///
/// Only a strict sign change of `z - level` counts as a crossing.
fn edge_crossing(a: Vec3, b: Vec3, level: f32) -> Option<Vec3> {
    let da = a.z - level;
    let db = b.z - level;
    if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
        Some(a + (b - a) * (da / (da - db)))
    } else {
        None
    }
}

/// Returns the segments where the surface crosses `level`.
///
/// `level` is a plot-cube z value. The result is a flat list of point pairs,
/// one pair per segment, ready to be drawn as a line list.
pub fn iso_segments(tiles: &[TileGeometry], level: f32) -> Vec<[f32; 3]> {
    let mut segments = Vec::new();
    for tile in tiles.iter().filter(|t| t.kind == TileKind::Surface) {
        for triangle in tile.triangles() {
            let [a, b, c] = triangle.map(|i| Vec3::from_array(tile.positions[usize::from(i)]));
            let crossings: Vec<Vec3> = [(a, b), (b, c), (c, a)]
                .into_iter()
                .filter_map(|(p, q)| edge_crossing(p, q, level))
                .collect();
            if let [start, end] = crossings.as_slice() {
                segments.push(start.to_array());
                segments.push(end.to_array());
            }
        }
    }
    segments
}
