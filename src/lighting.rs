use glam::Vec3;

use crate::types::LightingUniform;

pub const AMBIENT_COLOR: Vec3 = Vec3::splat(0.05);
pub const DIRECTIONAL_DIRECTION: Vec3 = Vec3::new(1.0, 0.5, 1.0);
pub const DIRECTIONAL_DIFFUSE: Vec3 = Vec3::splat(0.3);
pub const POINT_DIFFUSE: Vec3 = Vec3::splat(0.5);
pub const POINT_SPECULAR: Vec3 = Vec3::ONE;
pub const POINT1_POSITION: Vec3 = Vec3::new(-2.95, 4.24, -1.0);
pub const POINT2_POSITION: Vec3 = Vec3::new(1.05, 4.24, 1.0);

/// One switchable light in the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightSwitch {
    Ambient,
    Directional,
    Point1,
    Point2,
}

/// Which lights are on. Owned by the host and handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLightingState {
    pub ambient: bool,
    pub directional: bool,
    pub point1: bool,
    pub point2: bool,
}

impl Default for SceneLightingState {
    fn default() -> Self {
        Self {
            ambient: true,
            directional: true,
            point1: true,
            point2: true,
        }
    }
}

fn factor(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

impl SceneLightingState {
    pub fn is_on(&self, switch: LightSwitch) -> bool {
        match switch {
            LightSwitch::Ambient => self.ambient,
            LightSwitch::Directional => self.directional,
            LightSwitch::Point1 => self.point1,
            LightSwitch::Point2 => self.point2,
        }
    }

    /// Flip a light and return its new state
    pub fn toggle(&mut self, switch: LightSwitch) -> bool {
        let slot = match switch {
            LightSwitch::Ambient => &mut self.ambient,
            LightSwitch::Directional => &mut self.directional,
            LightSwitch::Point1 => &mut self.point1,
            LightSwitch::Point2 => &mut self.point2,
        };
        *slot = !*slot;
        *slot
    }

    /// Emissive intensity of the bulb mesh drawn at a point light
    pub fn bulb_emission(&self, switch: LightSwitch) -> Vec3 {
        Vec3::splat(factor(self.is_on(switch)))
    }

    /// Light colors scaled by their switches, positions in world space
    pub fn to_uniform(&self) -> LightingUniform {
        let point1 = factor(self.point1);
        let point2 = factor(self.point2);

        LightingUniform {
            ambient: (AMBIENT_COLOR * factor(self.ambient)).extend(0.0).to_array(),
            directional_direction: DIRECTIONAL_DIRECTION.extend(0.0).to_array(),
            directional_diffuse: (DIRECTIONAL_DIFFUSE * factor(self.directional))
                .extend(0.0)
                .to_array(),
            point1_position: POINT1_POSITION.extend(1.0).to_array(),
            point1_diffuse: (POINT_DIFFUSE * point1).extend(0.0).to_array(),
            point1_specular: (POINT_SPECULAR * point1).extend(0.0).to_array(),
            point2_position: POINT2_POSITION.extend(1.0).to_array(),
            point2_diffuse: (POINT_DIFFUSE * point2).extend(0.0).to_array(),
            point2_specular: (POINT_SPECULAR * point2).extend(0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_starts_on() {
        let lighting = SceneLightingState::default();
        for switch in [
            LightSwitch::Ambient,
            LightSwitch::Directional,
            LightSwitch::Point1,
            LightSwitch::Point2,
        ] {
            assert!(lighting.is_on(switch));
        }
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut lighting = SceneLightingState::default();
        assert!(!lighting.toggle(LightSwitch::Point2));
        assert!(!lighting.point2);
        assert!(lighting.point1);
        assert!(lighting.toggle(LightSwitch::Point2));
        assert_eq!(lighting, SceneLightingState::default());
    }

    #[test]
    fn test_uniform_scales_by_switch() {
        let mut lighting = SceneLightingState::default();
        lighting.toggle(LightSwitch::Point1);
        lighting.toggle(LightSwitch::Ambient);
        let uniform = lighting.to_uniform();

        assert_eq!(uniform.ambient, [0.0; 4]);
        assert_eq!(uniform.point1_diffuse, [0.0; 4]);
        assert_eq!(uniform.point1_specular, [0.0; 4]);
        assert_eq!(uniform.point2_diffuse, [0.5, 0.5, 0.5, 0.0]);
        assert_eq!(uniform.directional_diffuse, [0.3, 0.3, 0.3, 0.0]);
        // Positions survive a switched-off light
        assert_eq!(uniform.point1_position, [-2.95, 4.24, -1.0, 1.0]);
    }

    #[test]
    fn test_bulbs_follow_their_lights() {
        let mut lighting = SceneLightingState::default();
        lighting.toggle(LightSwitch::Point1);
        assert_eq!(lighting.bulb_emission(LightSwitch::Point1), Vec3::ZERO);
        assert_eq!(lighting.bulb_emission(LightSwitch::Point2), Vec3::ONE);
    }
}
