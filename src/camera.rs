use glam::{Mat3, Mat4, Vec3};
use std::f32::consts::{PI, TAU};

use crate::settings::CameraSettings;

pub const NEAR_PLANE: f32 = 0.02;
pub const FAR_PLANE: f32 = 1000.0;

/// Logical movement keys, independent of the physical key that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl MoveKey {
    /// Camera-space axis index and sign of the acceleration this key applies
    const fn axis(self) -> (usize, f32) {
        match self {
            MoveKey::Forward => (2, 1.0),
            MoveKey::Back => (2, -1.0),
            MoveKey::Left => (0, 1.0),
            MoveKey::Right => (0, -1.0),
            MoveKey::Up => (1, 1.0),
            MoveKey::Down => (1, -1.0),
        }
    }
}

/// What the renderer reads once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub view_matrix: Mat4,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
}

/// Movement intent accumulated from held keys
///
/// Acceleration and velocity are expressed in the level (pitch-free)
/// camera frame, so they always run parallel to the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputIntent {
    pub acceleration: Vec3,
    pub velocity: Vec3,
    pub max_speed: f32,
}

/// Pitch of a rigid view matrix: rotation about the camera X axis
pub fn extract_pitch(view: &Mat4) -> f32 {
    view.y_axis.z.atan2(view.y_axis.y)
}

/// Standard right-handed perspective projection for the given fov in degrees
pub fn perspective(field_of_view: f32, aspect: f32) -> Mat4 {
    Mat4::perspective_rh(field_of_view.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
}

/// The view the scene opens with: level with the table, tilted 12° down
pub fn initial_view() -> Mat4 {
    Mat4::from_rotation_x(12f32.to_radians())
        * Mat4::look_at_rh(
            Vec3::new(1.0, 5.0, 6.0),
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::Y,
        )
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Fly-through camera driven by discrete input events
///
/// Orientation is kept as separate yaw and pitch scalars plus an eye
/// position, and the view matrix is composed from them on demand as
/// `Rx(pitch) * Ry(yaw) * T(-eye)`. Roll never enters the composition.
#[derive(Debug, Clone)]
pub struct CameraController {
    settings: CameraSettings,
    eye: Vec3,
    yaw: f32,
    pitch: f32,
    field_of_view: f32,
    intent: InputIntent,
    fast: bool,
}

impl CameraController {
    /// Camera at the world origin looking down -Z
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            eye: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            field_of_view: settings.default_fov,
            intent: InputIntent {
                acceleration: Vec3::ZERO,
                velocity: Vec3::ZERO,
                max_speed: settings.normal_speed,
            },
            fast: false,
        }
    }

    /// Import an existing rigid, roll-free view matrix
    pub fn from_view_matrix(view: Mat4, settings: CameraSettings) -> Self {
        let limit = settings.max_pitch_degrees.to_radians();
        let pitch = extract_pitch(&view);
        let level = Mat4::from_rotation_x(-pitch) * view;
        let yaw = (-level.x_axis.z).atan2(level.x_axis.x);
        let eye = view.inverse().w_axis.truncate();

        Self {
            eye,
            yaw: wrap_angle(yaw),
            pitch: pitch.clamp(-limit, limit),
            ..Self::new(settings)
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_translation(-self.eye)
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            view_matrix: self.view_matrix(),
            field_of_view: self.field_of_view,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.eye
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn intent(&self) -> &InputIntent {
        &self.intent
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn on_key_down(&mut self, key: MoveKey) {
        let (axis, sign) = key.axis();
        self.intent.acceleration[axis] = sign * self.settings.acceleration;
    }

    /// Releasing a key stops that axis dead: no coasting
    pub fn on_key_up(&mut self, key: MoveKey) {
        let (axis, _) = key.axis();
        self.intent.acceleration[axis] = 0.0;
        self.intent.velocity[axis] = 0.0;
    }

    /// Raise or restore the speed cap while the fast modifier is held
    pub fn set_fast(&mut self, held: bool) {
        self.fast = held;
        self.intent.max_speed = if held {
            self.settings.fast_speed
        } else {
            self.settings.normal_speed
        };
    }

    /// Apply a relative mouse motion in pixels
    ///
    /// Returns false when the step was dropped as spurious.
    pub fn on_mouse_drag(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let delta_yaw = self.settings.mouse_sensitivity * delta_x;
        let delta_pitch = self.settings.mouse_sensitivity * delta_y;

        let max_step = self.settings.max_look_step;
        if delta_yaw.abs() > max_step || delta_pitch.abs() > max_step {
            log::trace!("Dropped look step ({:.3}, {:.3}) rad", delta_yaw, delta_pitch);
            return false;
        }

        let limit = self.settings.max_pitch_degrees.to_radians();
        self.pitch = (self.pitch + delta_pitch).clamp(-limit, limit);
        self.yaw = wrap_angle(self.yaw + delta_yaw);
        true
    }

    /// Zoom by wheel notches; positive notches narrow the view
    ///
    /// Returns the new field of view in degrees.
    pub fn on_mouse_wheel(&mut self, notches: f32) -> f32 {
        self.field_of_view = (self.field_of_view - notches * self.settings.fov_step)
            .clamp(self.settings.min_fov, self.settings.max_fov);
        self.field_of_view
    }

    pub fn reset_zoom(&mut self) -> f32 {
        self.field_of_view = self.settings.default_fov;
        self.field_of_view
    }

    /// Integrate velocity and move the eye for one frame
    ///
    /// `v += a*dt` is clamped per axis before the position step `p += v*dt`.
    /// The step is taken in the yaw-only frame so pitch never tilts it.
    pub fn tick(&mut self, delta_time: f32) {
        let cap = Vec3::splat(self.intent.max_speed);
        self.intent.velocity =
            (self.intent.velocity + self.intent.acceleration * delta_time).clamp(-cap, cap);

        let step = self.intent.velocity * delta_time;
        self.eye -= Mat3::from_rotation_y(-self.yaw) * step;
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_view_matrix(initial_view(), CameraSettings::default())
    }
}
