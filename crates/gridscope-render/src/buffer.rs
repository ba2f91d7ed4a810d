//! Buffer upload helpers.

use crate::backend::{BufferHandle, RenderBackend};
use crate::error::{RenderError, RenderResult};

/// Creates a vertex buffer and fills it with plain float data.
///
/// `T` is any `Pod` type made of `f32`s, such as `[f32; 3]`.
pub fn create_vertex_buffer<T: bytemuck::Pod>(
    backend: &mut dyn RenderBackend,
    data: &[T],
) -> RenderResult<BufferHandle> {
    let floats: &[f32] = bytemuck::try_cast_slice(data)
        .map_err(|e| RenderError::BufferCreationFailed(format!("vertex data is not f32: {e}")))?;
    let buffer = backend.create_vertex_buffer()?;
    backend.upload_floats(buffer, floats)?;
    Ok(buffer)
}

/// Creates an index buffer and fills it.
pub fn create_index_buffer(
    backend: &mut dyn RenderBackend,
    data: &[u16],
) -> RenderResult<BufferHandle> {
    let buffer = backend.create_index_buffer()?;
    backend.upload_indices(buffer, data)?;
    Ok(buffer)
}
