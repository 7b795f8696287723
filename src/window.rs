use std::sync::Arc;
use winit::window::{CursorGrabMode, CursorIcon, Fullscreen, Window as WinitWindow};

/// Wrapper around the winit window with the few host operations the viewer needs
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn toggle_fullscreen(&self) {
        let next = match self.inner.fullscreen() {
            Some(_) => None,
            None => Some(Fullscreen::Borderless(None)),
        };
        log::debug!("Fullscreen {}", if next.is_some() { "on" } else { "off" });
        self.inner.set_fullscreen(next);
    }

    /// Grab and hide the cursor while looking around, release it afterwards
    pub fn set_look_mode(&self, looking: bool) {
        if looking {
            self.inner.set_cursor(CursorIcon::Crosshair);
            let grabbed = self
                .inner
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.inner.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("Cursor grab unavailable: {}", e);
            }
        } else {
            self.inner.set_cursor(CursorIcon::Default);
            if let Err(e) = self.inner.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {}", e);
            }
        }
        self.inner.set_cursor_visible(!looking);
    }
}
