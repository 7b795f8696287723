use glam::Mat4;

use crate::camera::ViewState;
use crate::lighting::SceneLightingState;

/// Rendering collaborator driven by the viewer
///
/// The viewer pushes the view matrix once per frame after integrating the
/// camera, and the projection whenever the viewport or field of view changes.
/// The same frame's [`ViewState`] is then handed to [`Renderer::render_frame`].
pub trait Renderer {
    /// Renderers that draw straight from the frame's `ViewState` can keep
    /// the default
    fn send_view_matrix(&mut self, _view: Mat4) {}

    fn send_projection_matrix(&mut self, projection: Mat4);

    /// Draw one frame; `time` is seconds since start, `delta` since last frame
    fn render_frame(
        &mut self,
        view: &ViewState,
        lighting: &SceneLightingState,
        time: f32,
        delta: f32,
    ) -> Result<(), wgpu::SurfaceError>;
}
