//! The rendering API consumed by the geometry engine.
//!
//! GPU objects are opaque integer handles into a table owned by the backend.
//! The engine never assumes a handle survives a rebuild: every series
//! deletes what it created before creating new resources.

use glam::Mat4;

use crate::error::RenderResult;

/// Handle of a vertex or index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Handle of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Names of the uniforms set by the engine.
pub mod uniforms {
    /// Model-view matrix.
    pub const MODEL_VIEW: &str = "uMVMatrix";
    /// Projection matrix.
    pub const PROJECTION: &str = "uPMatrix";
    /// Camera matrix.
    pub const CAMERA: &str = "uCMatrix";
    /// Offset of the color map range in the plot cube.
    pub const OFFSET: &str = "uOffset";
    /// Scale of the color map range in the plot cube.
    pub const SCALE_FACTOR: &str = "uScaleFactor";
    /// Color map texture.
    pub const SAMPLER: &str = "uSampler";
    /// Color of lines (mesh, bar outlines, iso-lines).
    pub const COLOR: &str = "uColor";
    /// Width of lines in pixels.
    pub const LINE_WIDTH: &str = "uLineWidth";
    /// Lower corner of the clip box, in plot-cube coordinates.
    pub const CLIP_MIN: &str = "uMinPt";
    /// Upper corner of the clip box, in plot-cube coordinates.
    pub const CLIP_MAX: &str = "uMaxPt";
}

/// Names of the vertex attributes bound by the engine.
pub mod attributes {
    pub const POSITION: &str = "aVertexPosition";
    pub const SIZE: &str = "aPointSize";
    pub const COLOR: &str = "aColor";
    pub const TEX_COORD: &str = "aTextureCoord";
}

/// A value assigned to a named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Mat4),
    Texture(TextureHandle),
}

/// A vertex buffer bound to a named shader attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub buffer: BufferHandle,
    /// Number of floats per vertex.
    pub components: u8,
}

impl VertexAttribute {
    pub fn new(name: &'static str, buffer: BufferHandle, components: u8) -> Self {
        Self {
            name,
            buffer,
            components,
        }
    }
}

/// Draw primitives understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

/// An opaque GPU rendering API.
pub trait RenderBackend {
    /// Creates an empty vertex buffer.
    fn create_vertex_buffer(&mut self) -> RenderResult<BufferHandle>;

    /// Replaces the contents of a vertex buffer.
    fn upload_floats(&mut self, buffer: BufferHandle, data: &[f32]) -> RenderResult<()>;

    /// Creates an empty index buffer.
    fn create_index_buffer(&mut self) -> RenderResult<BufferHandle>;

    /// Replaces the contents of an index buffer.
    fn upload_indices(&mut self, buffer: BufferHandle, data: &[u16]) -> RenderResult<()>;

    /// Draws `count` indices as a triangle list.
    fn draw_triangles(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()>;

    /// Draws `count` indices as a triangle strip.
    fn draw_triangle_strip(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()>;

    /// Draws `count` indices as independent line segments.
    ///
    /// Without an index buffer the first `count` vertices are paired in order.
    fn draw_lines(
        &mut self,
        attributes: &[VertexAttribute],
        indices: Option<BufferHandle>,
        count: usize,
    ) -> RenderResult<()>;

    /// Draws `count` indices as one connected line strip.
    fn draw_line_strip(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()>;

    /// Draws `count` vertices as points.
    fn draw_points(&mut self, attributes: &[VertexAttribute], count: usize) -> RenderResult<()>;

    /// Creates an RGBA8 texture.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8])
        -> RenderResult<TextureHandle>;

    /// Assigns a named uniform.
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()>;

    fn delete_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()>;

    fn delete_texture(&mut self, texture: TextureHandle) -> RenderResult<()>;
}
