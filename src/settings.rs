use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Camera tuning constants
///
/// Every field has a default, so a settings file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Acceleration applied by a held movement key (units/s²)
    pub acceleration: f32,
    /// Speed cap without the fast modifier (units/s)
    pub normal_speed: f32,
    /// Speed cap while the fast modifier is held (units/s)
    pub fast_speed: f32,
    /// Radians of look rotation per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Look steps larger than this (radians) are dropped as spurious
    pub max_look_step: f32,
    /// Pitch envelope, degrees either side of level
    pub max_pitch_degrees: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    /// Degrees of zoom per wheel notch
    pub fov_step: f32,
    pub default_fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            acceleration: 4.0,
            normal_speed: 4.0,
            fast_speed: 20.0,
            mouse_sensitivity: 0.005,
            max_look_step: 0.3,
            max_pitch_degrees: 80.0,
            min_fov: 5.0,
            max_fov: 175.0,
            fov_step: 5.0,
            default_fov: 60.0,
        }
    }
}

impl CameraSettings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read camera settings: {:?}", path))?;
        let settings = Self::from_json(&text)
            .with_context(|| format!("Invalid camera settings in {:?}", path))?;
        log::info!("Loaded camera settings from {:?}", path);
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text).context("Malformed settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject combinations the controller cannot clamp against
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.acceleration >= 0.0 && self.normal_speed >= 0.0 && self.fast_speed >= 0.0,
            "acceleration and speeds must be non-negative"
        );
        ensure!(
            self.mouse_sensitivity > 0.0 && self.max_look_step > 0.0,
            "mouse_sensitivity and max_look_step must be positive"
        );
        ensure!(
            (0.0..90.0).contains(&self.max_pitch_degrees),
            "max_pitch_degrees must be in [0, 90), got {}",
            self.max_pitch_degrees
        );
        ensure!(
            0.0 < self.min_fov && self.min_fov <= self.max_fov && self.max_fov < 180.0,
            "fov bounds must satisfy 0 < min_fov <= max_fov < 180, got [{}, {}]",
            self.min_fov,
            self.max_fov
        );
        ensure!(
            (self.min_fov..=self.max_fov).contains(&self.default_fov),
            "default_fov {} lies outside [{}, {}]",
            self.default_fov,
            self.min_fov,
            self.max_fov
        );
        Ok(())
    }

    /// Copy of these settings with a different starting field of view
    pub fn with_default_fov(mut self, fov: f32) -> Result<Self> {
        self.default_fov = fov;
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CameraSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = CameraSettings::from_json(r#"{ "fast_speed": 12.5 }"#).unwrap();
        assert_eq!(settings.fast_speed, 12.5);
        assert_eq!(settings.normal_speed, 4.0);
        assert_eq!(settings.max_pitch_degrees, 80.0);
    }

    #[test]
    fn test_inverted_fov_bounds_rejected() {
        let result = CameraSettings::from_json(r#"{ "min_fov": 100.0, "max_fov": 50.0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_pitch_limit_must_stay_below_vertical() {
        let result = CameraSettings::from_json(r#"{ "max_pitch_degrees": 90.0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(CameraSettings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_override_default_fov() {
        let settings = CameraSettings::default().with_default_fov(45.0).unwrap();
        assert_eq!(settings.default_fov, 45.0);
        assert!(CameraSettings::default().with_default_fov(179.0).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = CameraSettings::load("definitely/not/here.json").unwrap_err();
        assert!(format!("{:#}", err).contains("not/here.json"));
    }
}
