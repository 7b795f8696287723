use glam::Mat4;

use crate::camera::{perspective, CameraController};
use crate::core::clock::{FrameClock, SystemClock};
use crate::core::controller::{Action, InputEvent};
use crate::core::window::WindowDimensions;
use crate::frame::{FrameInfo, FrameTimer};
use crate::lighting::SceneLightingState;
use crate::traits::Renderer;

/// Something only the windowing host can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    None,
    Exit,
    ToggleFullscreen,
    /// Grab and hide the cursor while looking, release it afterwards
    LookMode(bool),
}

/// Platform-independent half of the viewer
///
/// Owns the camera, the light switches and the frame timer. The host feeds
/// it input events in arrival order and calls [`Viewer::frame`] once per
/// redraw; everything it needs drawn goes through the [`Renderer`].
pub struct Viewer<C: FrameClock = SystemClock> {
    camera: CameraController,
    lighting: SceneLightingState,
    timer: FrameTimer<C>,
    viewport: WindowDimensions,
}

impl<C: FrameClock> Viewer<C> {
    pub fn new(camera: CameraController, clock: C, viewport: WindowDimensions) -> Self {
        Self {
            camera,
            lighting: SceneLightingState::default(),
            timer: FrameTimer::new(clock),
            viewport,
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn lighting(&self) -> &SceneLightingState {
        &self.lighting
    }

    pub fn viewport(&self) -> WindowDimensions {
        self.viewport
    }

    pub fn projection(&self) -> Mat4 {
        perspective(self.camera.field_of_view(), self.viewport.aspect_ratio())
    }

    /// Push the starting projection and view to a freshly created renderer
    pub fn attach(&self, renderer: &mut impl Renderer) {
        renderer.send_projection_matrix(self.projection());
        renderer.send_view_matrix(self.camera.view_matrix());
    }

    pub fn handle(&mut self, event: InputEvent, renderer: &mut impl Renderer) -> HostRequest {
        match event {
            InputEvent::Pressed(action) => return self.press(action, renderer),
            InputEvent::Released(Action::Move(key)) => self.camera.on_key_up(key),
            InputEvent::Released(Action::Look) => return HostRequest::LookMode(false),
            InputEvent::Released(_) => {}
            InputEvent::MouseDrag { delta_x, delta_y } => {
                self.camera.on_mouse_drag(delta_x, delta_y);
            }
            InputEvent::MouseWheel(notches) => {
                if notches != 0.0 {
                    let fov = self.camera.on_mouse_wheel(notches);
                    log::debug!("Field of view {:.1}°", fov);
                    renderer.send_projection_matrix(self.projection());
                }
            }
            InputEvent::FastModifier(held) => self.camera.set_fast(held),
            InputEvent::Resized(dimensions) => {
                self.viewport = dimensions;
                log::debug!("Viewport resized to {}x{}", dimensions.width, dimensions.height);
                if !dimensions.is_empty() {
                    renderer.send_projection_matrix(self.projection());
                }
            }
        }
        HostRequest::None
    }

    fn press(&mut self, action: Action, renderer: &mut impl Renderer) -> HostRequest {
        match action {
            Action::Move(key) => self.camera.on_key_down(key),
            Action::ToggleLight(switch) => {
                let on = self.lighting.toggle(switch);
                log::info!("{:?} light {}", switch, if on { "on" } else { "off" });
            }
            Action::ResetZoom => {
                self.camera.reset_zoom();
                renderer.send_projection_matrix(self.projection());
            }
            Action::Look => return HostRequest::LookMode(true),
            Action::ToggleFullscreen => return HostRequest::ToggleFullscreen,
            Action::Quit => return HostRequest::Exit,
        }
        HostRequest::None
    }

    /// Advance the clock, integrate the camera and draw
    ///
    /// A minimised viewport still advances time but skips the draw.
    pub fn frame(&mut self, renderer: &mut impl Renderer) -> Result<FrameInfo, wgpu::SurfaceError> {
        let info = self.timer.advance();
        self.camera.tick(info.delta);

        let state = self.camera.view_state();
        renderer.send_view_matrix(state.view_matrix);
        if !self.viewport.is_empty() {
            renderer.render_frame(&state, &self.lighting, info.time, info.delta)?;
        }

        Ok(info)
    }
}
