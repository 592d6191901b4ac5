use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Region the light position is jittered within.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterShape {
    /// Solid ball around the nominal position.
    #[default]
    Sphere,
    /// Horizontal disc (normal +Y) around the nominal position.
    Disc,
}

/// Camera rig parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera position at scene start, and the resting position when not pointer-reactive.
    pub start_position: Vec3,
    /// Nominal camera position the pointer offset is added to.
    pub anchor: Vec3,
    /// Fixed point the camera is aimed at.
    pub look_at: Vec3,
    /// Scale applied to the pointer offset on X and Y.
    pub pointer_scale: Vec2,
    /// Gain inside `atan(pointer.x * gain)` for the Z bias.
    pub z_bias_gain: f32,
    /// Whether the position channel follows the pointer. When off, it rests at `start_position`.
    pub pointer_reactive: bool,
    pub position_time_constant: f32,
    pub zoom_time_constant: f32,
    /// Zoom target is `viewport.width / divisor` before the first frame completes.
    pub initial_zoom_divisor: f32,
    /// Zoom target is `viewport.width / divisor` afterwards.
    pub steady_zoom_divisor: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(-10.0, 10.0, 10.0),
            anchor: Vec3::new(-12.5, 12.5, 15.0),
            look_at: Vec3::new(2.0, -1.0, 0.0),
            pointer_scale: Vec2::ONE,
            z_bias_gain: 2.0,
            pointer_reactive: true,
            position_time_constant: 0.5,
            zoom_time_constant: 1.0,
            initial_zoom_divisor: 17.0,
            steady_zoom_divisor: 35.0,
            near: 0.1,
            far: 300.0,
        }
    }
}

/// Soft-shadow accumulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Number of jittered samples blended before the buffer freezes.
    pub target_samples: u32,
    /// Nominal (unjittered) light position.
    pub light_position: Vec3,
    pub jitter_radius: f32,
    pub jitter_shape: JitterShape,
    /// Extent of the shadow camera frustum.
    pub size: f32,
    /// Texels per side of the shadow term.
    pub resolution: u32,
    /// Side length of the ground square receiving shadows.
    pub ground_extent: f32,
    pub opacity: f32,
    pub alpha_test: f32,
    pub color: [f32; 3],
    pub color_blend: f32,
    pub seed: u64,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            target_samples: 100,
            light_position: Vec3::new(0.0, 10.0, -10.0),
            jitter_radius: 8.0,
            jitter_shape: JitterShape::Sphere,
            size: 15.0,
            // GPU casters want 256; the CPU caster traces one ray per texel.
            resolution: 64,
            ground_extent: 30.0,
            opacity: 1.3,
            alpha_test: 0.9,
            color: [0.0, 0.0, 0.0],
            color_blend: 5.0,
            seed: 0,
        }
    }
}

/// Full scene configuration, loadable from YAML. Missing fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraSettings,
    pub shadow: ShadowSettings,
}

impl SceneConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        non_negative("camera.position_time_constant", cam.position_time_constant)?;
        non_negative("camera.zoom_time_constant", cam.zoom_time_constant)?;
        positive("camera.initial_zoom_divisor", cam.initial_zoom_divisor)?;
        positive("camera.steady_zoom_divisor", cam.steady_zoom_divisor)?;
        if !(cam.near < cam.far) {
            return Err(ConfigError::Invalid {
                field: "camera.near",
                reason: format!("near ({}) must be less than far ({})", cam.near, cam.far),
            });
        }

        let shadow = &self.shadow;
        if shadow.target_samples == 0 {
            return Err(ConfigError::Invalid {
                field: "shadow.target_samples",
                reason: "must be at least 1".into(),
            });
        }
        if shadow.resolution == 0 {
            return Err(ConfigError::Invalid {
                field: "shadow.resolution",
                reason: "must be at least 1".into(),
            });
        }
        non_negative("shadow.jitter_radius", shadow.jitter_radius)?;
        positive("shadow.size", shadow.size)?;
        positive("shadow.ground_extent", shadow.ground_extent)?;
        non_negative("shadow.opacity", shadow.opacity)?;
        if !(shadow.alpha_test > 0.0 && shadow.alpha_test <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "shadow.alpha_test",
                reason: format!("{} is outside (0, 1]", shadow.alpha_test),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a finite value >= 0"),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a finite value > 0"),
        })
    }
}
