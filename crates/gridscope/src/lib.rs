//! gridscope: a Rust-native 3D chart engine for tabular grid data.
//!
//! A table of values is read as a height field over an (x, y) grid and drawn
//! as points, a surface or bars. The engine builds the GPU geometry, picks
//! points and bars under the mouse, extracts iso-lines and clips everything
//! against a per-series box.
//!
//! # Quick Start
//!
//! ```no_run
//! use gridscope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let table = DataTable::from_rows(&[
//!         vec![0.0, 1.0, 0.0],
//!         vec![1.0, 2.0, 1.0],
//!         vec![0.0, 1.0, 0.0],
//!     ])?;
//!     let grid = GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0))?;
//!
//!     let mut series = GridSeries::new("pyramid", grid);
//!     series.set_representation(Representation::Surface);
//!
//!     let mut chart = Chart3D::default();
//!     let id = chart.add_series(series);
//!
//!     let mut backend = RecordingBackend::new();
//!     chart.render(&mut backend)?;
//!     let contour = chart.iso_lines(id, 1.5)?;
//!     println!("{} contour segments", contour.len() / 2);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`GridSource`] adapts a [`DataTable`] to grid cells, either with
//!   explicit axis values stored in a reserved row and column, or with
//!   equidistant abscissas.
//! - [`GridSeries`] owns one grid source plus its options, clip box and the
//!   GPU resources of its last build.
//! - [`Chart3D`] orders series, computes shared axis ranges, owns the camera
//!   and drives rebuilds and draw calls through a [`RenderBackend`].

mod chart;
mod headless;
mod picking;

pub use chart::{Chart3D, SeriesId};
pub use headless::render_to_recording;

// Re-export core types
pub use gridscope_core::{
    Axis, AxisRanges, BarHit, CellSample, ChartOptions, ChartType, ClipBox, Color,
    ColorMapSettings, DataTable, EngineLimits, GridShape, GridSource, GridscopeError, MeshPen,
    Ray, Representation, Result, SeriesOptions, SurfaceHit, BAR_BUFFER_LIMIT, SURFACE_SIDE_LIMIT,
};
pub use gridscope_core::{DVec3, Mat4, Vec2, Vec3, Vec4};

// Re-export render types
pub use gridscope_render::{
    attributes, uniforms, BufferHandle, Camera, ColorMap, ColorMapRegistry, DrawRecord, Primitive,
    ProjectionMode, RecordingBackend, RenderBackend, RenderError, TextureHandle, UniformValue,
    VertexAttribute,
};

// Re-export the geometry engine
pub use gridscope_series::{CellKind, GridSeries, SeriesContext, TileGeometry, TileKind};

/// Initializes logging from `RUST_LOG`, ignoring repeated calls.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
