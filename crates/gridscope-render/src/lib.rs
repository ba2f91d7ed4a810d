//! Rendering boundary for gridscope-rs.
//!
//! The geometry engine never talks to a GPU API directly. This crate provides:
//! - The [`RenderBackend`] trait with opaque buffer and texture handles
//! - [`ResourceArena`] for the destroy-all-then-rebuild discipline
//! - [`RecordingBackend`], an in-memory backend for headless use and tests
//! - Camera and color map systems

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod arena;
pub mod backend;
pub mod buffer;
pub mod camera;
pub mod color_maps;
pub mod error;
pub mod recording;

pub use arena::ResourceArena;
pub use backend::{
    attributes, uniforms, BufferHandle, Primitive, RenderBackend, TextureHandle, UniformValue,
    VertexAttribute,
};
pub use camera::{Camera, ProjectionMode};
pub use color_maps::{ColorMap, ColorMapRegistry, PALETTE_TEXTURE_SIZE};
pub use error::{RenderError, RenderResult};
pub use recording::{BufferData, DrawRecord, RecordingBackend, TextureData};
