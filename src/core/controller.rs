use crate::camera::MoveKey;
use crate::lighting::LightSwitch;

use super::window::WindowDimensions;

/// What a bound key or button means to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(MoveKey),
    ToggleLight(LightSwitch),
    ToggleFullscreen,
    ResetZoom,
    /// Hold to look around with the mouse
    Look,
    Quit,
}

/// Platform-neutral input, already mapped to actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
    /// Relative pointer motion in pixels while looking
    MouseDrag { delta_x: f32, delta_y: f32 },
    /// Wheel notches, positive away from the user
    MouseWheel(f32),
    FastModifier(bool),
    Resized(WindowDimensions),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_action_hash() {
        let mut set = HashSet::new();
        set.insert(Action::Move(MoveKey::Forward));
        set.insert(Action::Move(MoveKey::Back));
        set.insert(Action::Move(MoveKey::Forward));
        set.insert(Action::ToggleLight(LightSwitch::Point1));

        assert_eq!(set.len(), 3);
        assert!(set.contains(&Action::ToggleLight(LightSwitch::Point1)));
        assert!(!set.contains(&Action::ToggleLight(LightSwitch::Point2)));
    }

    #[test]
    fn test_action_debug() {
        let debug_str = format!("{:?}", Action::Move(MoveKey::Left));
        assert_eq!(debug_str, "Move(Left)");
    }

    #[test]
    fn test_event_equality() {
        assert_eq!(
            InputEvent::MouseDrag { delta_x: 1.0, delta_y: 2.0 },
            InputEvent::MouseDrag { delta_x: 1.0, delta_y: 2.0 }
        );
        assert_ne!(
            InputEvent::Pressed(Action::Quit),
            InputEvent::Released(Action::Quit)
        );
    }
}
