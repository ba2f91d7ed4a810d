//! Grid-data geometry engine for gridscope-rs.
//!
//! This crate turns a [`GridSource`](gridscope_core::GridSource) into GPU
//! geometry and answers queries against it:
//! - Buffer partitioning into index-addressable tiles
//! - Mesh building for points, surfaces and bars
//! - Ray picking of surfaces and bars
//! - Iso-line extraction
//!
//! [`GridSeries`] ties these together with a render backend.

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod isolines;
pub mod mesh;
pub mod partition;
pub mod picking;
pub mod series;

pub use isolines::iso_segments;
pub use mesh::{build_tiles, MeshInput, TileGeometry, TileKind};
pub use partition::{item_tiles, surface_tiles, CellKind, ItemTile, SurfaceTile};
pub use picking::{pick_bar, pick_surface};
pub use series::{ChangeStamp, GridSeries, IsoLineBuffers, SeriesContext, TileBuffers};
