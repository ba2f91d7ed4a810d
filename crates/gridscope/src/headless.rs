//! Headless rendering for gridscope.
//!
//! Renders a chart into a [`RecordingBackend`] instead of a GPU. The backend
//! keeps every buffer, texture, uniform and draw call, which is what
//! integration tests and batch tools inspect.

use gridscope_render::RecordingBackend;

use crate::chart::Chart3D;
use crate::Result;

/// Renders one frame of the chart into a fresh recording backend.
///
/// The viewport is resized to `width x height` first, so picking afterwards
/// uses the same pixel space.
///
/// # Example
/// ```no_run
/// use gridscope::*;
///
/// let table = DataTable::from_rows(&[vec![0.0, 1.0], vec![1.0, 2.0]]).unwrap();
/// let grid = GridSource::equidistant(table, (0.0, 1.0), (0.0, 1.0)).unwrap();
/// let mut chart = Chart3D::default();
/// chart.add_series(GridSeries::new("grid", grid));
/// let frame = render_to_recording(&mut chart, 800, 600).unwrap();
/// assert!(!frame.draws().is_empty());
/// ```
pub fn render_to_recording(chart: &mut Chart3D, width: u32, height: u32) -> Result<RecordingBackend> {
    let mut backend = RecordingBackend::new();
    chart.set_viewport(width, height);
    // Handles from a previous backend mean nothing to this one
    chart.clear_gpu_resources();
    chart.render(&mut backend)?;
    log::debug!(
        "headless frame: {} draws, {} live buffers",
        backend.draws().len(),
        backend.live_buffer_count()
    );
    Ok(backend)
}
