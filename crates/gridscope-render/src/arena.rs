//! Per-series bookkeeping of the GPU resources it created.

use crate::backend::{BufferHandle, RenderBackend, TextureHandle};
use crate::buffer;
use crate::error::RenderResult;

/// Every handle a series created since its last rebuild.
///
/// The arena is released as a unit before the next rebuild repopulates it.
#[derive(Debug, Default)]
pub struct ResourceArena {
    buffers: Vec<BufferHandle>,
    textures: Vec<TextureHandle>,
}

impl ResourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracked vertex buffer holding `data`.
    pub fn vertex_buffer<T: bytemuck::Pod>(
        &mut self,
        backend: &mut dyn RenderBackend,
        data: &[T],
    ) -> RenderResult<BufferHandle> {
        let handle = buffer::create_vertex_buffer(backend, data)?;
        self.buffers.push(handle);
        Ok(handle)
    }

    /// Creates a tracked index buffer holding `data`.
    pub fn index_buffer(
        &mut self,
        backend: &mut dyn RenderBackend,
        data: &[u16],
    ) -> RenderResult<BufferHandle> {
        let handle = buffer::create_index_buffer(backend, data)?;
        self.buffers.push(handle);
        Ok(handle)
    }

    /// Creates a tracked RGBA8 texture.
    pub fn texture(
        &mut self,
        backend: &mut dyn RenderBackend,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> RenderResult<TextureHandle> {
        let handle = backend.create_texture(width, height, rgba)?;
        self.textures.push(handle);
        Ok(handle)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty() && self.textures.is_empty()
    }

    /// Drops every handle without deleting it, for when the backend that
    /// owned them is gone.
    pub fn forget(&mut self) {
        self.buffers.clear();
        self.textures.clear();
    }

    /// Deletes every tracked resource.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        if !self.is_empty() {
            log::debug!(
                "releasing {} buffers and {} textures",
                self.buffers.len(),
                self.textures.len()
            );
        }
        for handle in self.buffers.drain(..) {
            backend.delete_buffer(handle)?;
        }
        for handle in self.textures.drain(..) {
            backend.delete_texture(handle)?;
        }
        Ok(())
    }
}
