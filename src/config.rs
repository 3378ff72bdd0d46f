//! Particle system configuration.
//!
//! [`ParticleConfig`] holds everything the billboard shader needs to know
//! about an emitter: start values, emission rate, emitter shape and the
//! collision planes. Everything except the plane references can be saved to
//! and loaded from JSON.
//!
//! # Example
//!
//! ```ignore
//! let mut config = ParticleConfig::default();
//! config.start_lifetime = 2.0;
//! config.shape = ShapeKind::Sphere;
//! config.save("fountain.json")?;
//! ```

use crate::error::ConfigError;
use crate::plane::CollisionPlanes;
use glam::Vec4;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_lifetime() -> f32 {
    5.0
}

fn default_speed() -> f32 {
    5.0
}

fn default_size() -> f32 {
    1.0
}

fn default_max_particles() -> u32 {
    1000
}

fn default_color() -> Vec4 {
    Vec4::ONE
}

/// Opaque reference to a texture owned by the renderer.
///
/// The binder only forwards the handle; resolving it to GPU memory is the
/// renderer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Emission settings.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Emission {
    /// Particles spawned per second.
    #[serde(default)]
    pub rate_over_time: f32,
}

/// Which emitter shape the shader should use.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// Directional cone; uses [`ConeShape::angle`].
    #[default]
    Cone,
    /// Omnidirectional sphere.
    Sphere,
}

/// Cone emitter settings.
///
/// Kept beside [`ShapeKind`] rather than inside it so the angle survives a
/// switch to [`ShapeKind::Sphere`] and back.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ConeShape {
    /// Cone angle in degrees.
    #[serde(default)]
    pub angle: f32,
}

/// Collision settings. Plane references are runtime-only and never serialized.
#[derive(Clone, Debug, Default)]
pub struct Collision {
    pub planes: CollisionPlanes,
}

/// Complete configuration of one billboard particle system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Seconds before the first particle is emitted.
    #[serde(default)]
    pub start_delay: f32,
    /// Particle lifetime in seconds.
    #[serde(default = "default_lifetime")]
    pub start_lifetime: f32,
    /// Initial particle speed.
    #[serde(default = "default_speed")]
    pub start_speed: f32,
    /// Initial billboard size.
    #[serde(default = "default_size")]
    pub start_size: f32,
    /// Number of instanced quads. Must be positive.
    #[serde(default = "default_max_particles")]
    pub max_particles: u32,
    /// Initial particle color (RGBA, 0.0-1.0).
    #[serde(default = "default_color")]
    pub start_color: Vec4,
    /// Multiplier applied to gravity in the shader.
    #[serde(default)]
    pub gravity_modifier: f32,
    /// Sprite texture. `None` renders untextured quads.
    #[serde(default)]
    pub texture: Option<TextureHandle>,
    #[serde(default)]
    pub emission: Emission,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default)]
    pub cone: ConeShape,
    #[serde(skip)]
    pub collision: Collision,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            start_delay: 0.0,
            start_lifetime: default_lifetime(),
            start_speed: default_speed(),
            start_size: default_size(),
            max_particles: default_max_particles(),
            start_color: default_color(),
            gravity_modifier: 0.0,
            texture: None,
            emission: Emission::default(),
            shape: ShapeKind::default(),
            cone: ConeShape::default(),
            collision: Collision::default(),
        }
    }
}

impl ParticleConfig {
    /// Check values the shader cannot cope with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::Invalid(
                "max_particles must be positive".into(),
            ));
        }
        if self.max_particles > i32::MAX as u32 {
            return Err(ConfigError::Invalid(format!(
                "max_particles {} does not fit the shader's int uniform",
                self.max_particles
            )));
        }
        Ok(())
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
