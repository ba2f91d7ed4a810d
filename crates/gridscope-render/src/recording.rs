//! An in-memory backend that records every call.
//!
//! Used for headless runs and tests: buffer contents are kept so geometry can
//! be inspected after a rebuild, draw calls and uniform assignments are logged
//! in order, and stale handles are reported as errors like a real driver would.

use std::collections::{BTreeMap, HashMap};

use crate::backend::{
    BufferHandle, Primitive, RenderBackend, TextureHandle, UniformValue, VertexAttribute,
};
use crate::error::{RenderError, RenderResult};

/// Contents of a live buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    Vertex(Vec<f32>),
    Index(Vec<u16>),
}

/// A live texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub primitive: Primitive,
    pub attributes: Vec<VertexAttribute>,
    pub indices: Option<BufferHandle>,
    pub count: usize,
}

/// A backend keeping everything in memory.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_handle: u32,
    buffers: BTreeMap<u32, BufferData>,
    textures: BTreeMap<u32, TextureData>,
    uniforms: HashMap<String, UniformValue>,
    uniform_log: Vec<(String, UniformValue)>,
    draws: Vec<DrawRecord>,
    deleted_buffers: usize,
    deleted_textures: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Returns the contents of a live buffer.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&BufferData> {
        self.buffers.get(&handle.0)
    }

    /// Returns the floats of a live vertex buffer.
    pub fn floats(&self, handle: BufferHandle) -> Option<&[f32]> {
        match self.buffers.get(&handle.0) {
            Some(BufferData::Vertex(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns the indices of a live index buffer.
    pub fn indices(&self, handle: BufferHandle) -> Option<&[u16]> {
        match self.buffers.get(&handle.0) {
            Some(BufferData::Index(data)) => Some(data),
            _ => None,
        }
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureData> {
        self.textures.get(&handle.0)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn deleted_buffer_count(&self) -> usize {
        self.deleted_buffers
    }

    pub fn deleted_texture_count(&self) -> usize {
        self.deleted_textures
    }

    /// Returns the last value assigned to a uniform.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    /// Uniform assignments since the last [`clear_frame`](Self::clear_frame).
    pub fn uniform_log(&self) -> &[(String, UniformValue)] {
        &self.uniform_log
    }

    /// Draw calls since the last [`clear_frame`](Self::clear_frame).
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn draws_of(&self, primitive: Primitive) -> impl Iterator<Item = &DrawRecord> {
        self.draws.iter().filter(move |d| d.primitive == primitive)
    }

    /// Forgets the draw and uniform logs, keeping resources and uniform values.
    pub fn clear_frame(&mut self) {
        self.draws.clear();
        self.uniform_log.clear();
    }

    fn check_attributes(&self, attributes: &[VertexAttribute]) -> RenderResult<()> {
        for attribute in attributes {
            match self.buffers.get(&attribute.buffer.0) {
                Some(BufferData::Vertex(_)) => {}
                Some(BufferData::Index(_)) => {
                    return Err(RenderError::BufferKindMismatch {
                        handle: attribute.buffer.0,
                        expected: "vertex",
                    })
                }
                None => return Err(RenderError::UnknownBuffer(attribute.buffer.0)),
            }
        }
        Ok(())
    }

    fn check_indices(&self, indices: BufferHandle) -> RenderResult<()> {
        match self.buffers.get(&indices.0) {
            Some(BufferData::Index(_)) => Ok(()),
            Some(BufferData::Vertex(_)) => Err(RenderError::BufferKindMismatch {
                handle: indices.0,
                expected: "index",
            }),
            None => Err(RenderError::UnknownBuffer(indices.0)),
        }
    }

    fn record(
        &mut self,
        primitive: Primitive,
        attributes: &[VertexAttribute],
        indices: Option<BufferHandle>,
        count: usize,
    ) -> RenderResult<()> {
        self.check_attributes(attributes)?;
        if let Some(indices) = indices {
            self.check_indices(indices)?;
        }
        self.draws.push(DrawRecord {
            primitive,
            attributes: attributes.to_vec(),
            indices,
            count,
        });
        Ok(())
    }
}

impl RenderBackend for RecordingBackend {
    fn create_vertex_buffer(&mut self) -> RenderResult<BufferHandle> {
        let id = self.allocate();
        self.buffers.insert(id, BufferData::Vertex(Vec::new()));
        Ok(BufferHandle(id))
    }

    fn upload_floats(&mut self, buffer: BufferHandle, data: &[f32]) -> RenderResult<()> {
        match self.buffers.get_mut(&buffer.0) {
            Some(BufferData::Vertex(contents)) => {
                contents.clear();
                contents.extend_from_slice(data);
                Ok(())
            }
            Some(BufferData::Index(_)) => Err(RenderError::BufferKindMismatch {
                handle: buffer.0,
                expected: "vertex",
            }),
            None => Err(RenderError::UnknownBuffer(buffer.0)),
        }
    }

    fn create_index_buffer(&mut self) -> RenderResult<BufferHandle> {
        let id = self.allocate();
        self.buffers.insert(id, BufferData::Index(Vec::new()));
        Ok(BufferHandle(id))
    }

    fn upload_indices(&mut self, buffer: BufferHandle, data: &[u16]) -> RenderResult<()> {
        match self.buffers.get_mut(&buffer.0) {
            Some(BufferData::Index(contents)) => {
                contents.clear();
                contents.extend_from_slice(data);
                Ok(())
            }
            Some(BufferData::Vertex(_)) => Err(RenderError::BufferKindMismatch {
                handle: buffer.0,
                expected: "index",
            }),
            None => Err(RenderError::UnknownBuffer(buffer.0)),
        }
    }

    fn draw_triangles(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()> {
        self.record(Primitive::Triangles, attributes, Some(indices), count)
    }

    fn draw_triangle_strip(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()> {
        self.record(Primitive::TriangleStrip, attributes, Some(indices), count)
    }

    fn draw_lines(
        &mut self,
        attributes: &[VertexAttribute],
        indices: Option<BufferHandle>,
        count: usize,
    ) -> RenderResult<()> {
        self.record(Primitive::Lines, attributes, indices, count)
    }

    fn draw_line_strip(
        &mut self,
        attributes: &[VertexAttribute],
        indices: BufferHandle,
        count: usize,
    ) -> RenderResult<()> {
        self.record(Primitive::LineStrip, attributes, Some(indices), count)
    }

    fn draw_points(&mut self, attributes: &[VertexAttribute], count: usize) -> RenderResult<()> {
        self.record(Primitive::Points, attributes, None, count)
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> RenderResult<TextureHandle> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::TextureSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let id = self.allocate();
        self.textures.insert(
            id,
            TextureData {
                width,
                height,
                rgba: rgba.to_vec(),
            },
        );
        Ok(TextureHandle(id))
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()> {
        if let UniformValue::Texture(texture) = value {
            if !self.textures.contains_key(&texture.0) {
                return Err(RenderError::UnknownTexture(texture.0));
            }
        }
        self.uniforms.insert(name.to_string(), value);
        self.uniform_log.push((name.to_string(), value));
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()> {
        self.buffers
            .remove(&buffer.0)
            .ok_or(RenderError::UnknownBuffer(buffer.0))?;
        self.deleted_buffers += 1;
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) -> RenderResult<()> {
        self.textures
            .remove(&texture.0)
            .ok_or(RenderError::UnknownTexture(texture.0))?;
        self.deleted_textures += 1;
        Ok(())
    }
}
