//! Core types for gridscope-rs.
//!
//! This crate holds the value types shared by every layer of the grid-data
//! geometry engine:
//! - [`DataTable`] and [`GridSource`], the uniform view over explicit-axis and
//!   equidistant grids
//! - [`AxisRanges`] for mapping axis units into the normalized plot cube
//! - [`ClipBox`] with lazily recomputed clip uniforms
//! - [`Ray`] and ray/triangle intersection for picking
//! - Configuration options and the error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Grid indices are far below 2^52
#![allow(clippy::cast_precision_loss)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]

pub mod axis;
pub mod clip;
pub mod color;
pub mod error;
pub mod grid;
pub mod options;
pub mod pick;
pub mod plot_cube;
pub mod ray;
pub mod table;

pub use axis::Axis;
pub use clip::{ClipBox, ClipDirty, ClipUniforms};
pub use color::Color;
pub use error::{GridscopeError, Result};
pub use grid::{CellSample, GridShape, GridSource};
pub use options::{
    ChartOptions, ChartType, ColorMapSettings, EngineLimits, MeshPen, Representation,
    SeriesOptions, BAR_BUFFER_LIMIT, MAX_ITEM_BUFFER_LIMIT, SURFACE_SIDE_LIMIT,
};
pub use pick::{BarHit, SurfaceHit};
pub use plot_cube::{AxisRanges, MIN_EXTENT};
pub use ray::{Ray, TriangleHit};
pub use table::DataTable;

// Re-export glam types for convenience
pub use glam::{DVec3, Mat4, Vec2, Vec3, Vec4};
