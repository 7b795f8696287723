use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use super::controller::{Action, InputEvent};
use crate::camera::MoveKey;
use crate::lighting::LightSwitch;

/// Pixels of touchpad scroll treated as one wheel notch
const PIXELS_PER_NOTCH: f32 = 40.0;

/// Adapter that turns winit events into [`InputEvent`]s
///
/// Tracks the modifier and look-button state needed to interpret later
/// events. Mouse motion is only forwarded while the look button is held.
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    shift: bool,
    alt: bool,
    looking: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_looking(&self) -> bool {
        self.looking
    }

    /// Translate a window event; unbound keys and repeats yield `None`
    pub fn process_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => self.process_key(code, event.state),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.process_modifiers(modifiers.state()),
            WindowEvent::MouseInput { state, button, .. } => self.process_button(*button, *state),
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::MouseWheel(wheel_notches(delta))),
            WindowEvent::Resized(size) => Some(InputEvent::Resized((*size).into())),
            WindowEvent::Focused(false) if self.looking => {
                self.looking = false;
                Some(InputEvent::Released(Action::Look))
            }
            _ => None,
        }
    }

    /// Raw device motion, forwarded as a drag while looking
    pub fn process_device_event(&mut self, event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } if self.looking => {
                Some(InputEvent::MouseDrag {
                    delta_x: *dx as f32,
                    delta_y: *dy as f32,
                })
            }
            _ => None,
        }
    }

    pub fn process_key(&mut self, code: KeyCode, state: ElementState) -> Option<InputEvent> {
        let action = action_for(code, self.alt)?;
        Some(match state {
            ElementState::Pressed => InputEvent::Pressed(action),
            ElementState::Released => InputEvent::Released(action),
        })
    }

    pub fn process_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputEvent> {
        let action = match button {
            MouseButton::Left => {
                self.looking = state.is_pressed();
                Action::Look
            }
            MouseButton::Middle => Action::ResetZoom,
            _ => return None,
        };
        Some(match state {
            ElementState::Pressed => InputEvent::Pressed(action),
            ElementState::Released => InputEvent::Released(action),
        })
    }

    /// Emits `FastModifier` only when shift actually changes
    pub fn process_modifiers(&mut self, modifiers: ModifiersState) -> Option<InputEvent> {
        self.alt = modifiers.alt_key();
        let shift = modifiers.shift_key();
        if shift == self.shift {
            return None;
        }
        self.shift = shift;
        Some(InputEvent::FastModifier(shift))
    }
}

/// Key bindings; `alt` is the current Alt modifier state
pub fn action_for(code: KeyCode, alt: bool) -> Option<Action> {
    let action = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Action::Move(MoveKey::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Action::Move(MoveKey::Back),
        KeyCode::KeyA | KeyCode::ArrowLeft => Action::Move(MoveKey::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Action::Move(MoveKey::Right),
        KeyCode::KeyE | KeyCode::PageUp => Action::Move(MoveKey::Up),
        KeyCode::KeyQ | KeyCode::PageDown => Action::Move(MoveKey::Down),
        KeyCode::Digit0 => Action::ToggleLight(LightSwitch::Ambient),
        KeyCode::Digit9 => Action::ToggleLight(LightSwitch::Directional),
        KeyCode::Digit1 => Action::ToggleLight(LightSwitch::Point1),
        KeyCode::Digit2 => Action::ToggleLight(LightSwitch::Point2),
        KeyCode::F11 => Action::ToggleFullscreen,
        KeyCode::Escape => Action::Quit,
        KeyCode::F4 if alt => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Wheel delta in notches, positive when scrolling away from the user
pub fn wheel_notches(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_NOTCH,
    }
}
