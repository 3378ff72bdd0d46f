//! Named shader uniforms produced by a refresh.
//!
//! Names are the contract with the billboard shader and must match it
//! exactly; they live in [`names`].

use crate::config::TextureHandle;
use glam::Vec4;
use std::collections::HashMap;

/// Uniform names understood by the billboard shader.
pub mod names {
    use crate::plane::MAX_COLLISION_PLANES;

    pub const START_SIZE: &str = "_StartSize";
    pub const RATE_OVER_TIME: &str = "_RateOverTime";
    pub const START_SPEED: &str = "_StartSpeed";
    pub const START_LIFETIME: &str = "_StartLifeTime";
    pub const START_DELAY: &str = "_StartDelay";
    pub const MAX_PARTICLES: &str = "_MaxParticles";
    pub const CONE_ANGLE: &str = "_ConeAngle";
    pub const START_COLOR: &str = "_StartColor";
    pub const GRAVITY_MODIFIER: &str = "_GravityModifier";
    pub const TEXTURE: &str = "_Texture";

    /// `_CollisionPlaneEquation0` through `_CollisionPlaneEquation3`.
    pub const COLLISION_PLANE_EQUATION: [&str; MAX_COLLISION_PLANES] = [
        "_CollisionPlaneEquation0",
        "_CollisionPlaneEquation1",
        "_CollisionPlaneEquation2",
        "_CollisionPlaneEquation3",
    ];
}

/// Supported uniform value types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I32(i32),
    Vec4(Vec4),
    Texture(TextureHandle),
}

impl UniformValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            UniformValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            UniformValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<TextureHandle> {
        match self {
            UniformValue::Texture(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::I32(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<TextureHandle> for UniformValue {
    fn from(v: TextureHandle) -> Self {
        UniformValue::Texture(v)
    }
}

/// Immutable set of uniforms from one refresh.
///
/// Insertion order is preserved so uploads happen in a stable order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformSnapshot {
    values: Vec<(&'static str, UniformValue)>,
    indices: HashMap<&'static str, usize>,
}

impl UniformSnapshot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add or replace a uniform while the snapshot is being built.
    pub(crate) fn set<V: Into<UniformValue>>(&mut self, name: &'static str, value: V) {
        let value = value.into();
        if let Some(&idx) = self.indices.get(name) {
            self.values[idx].1 = value;
        } else {
            self.indices.insert(name, self.values.len());
            self.values.push((name, value));
        }
    }

    /// Get a uniform value by name.
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.indices.get(name).map(|&idx| &self.values[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_f32)
    }

    pub fn i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(UniformValue::as_i32)
    }

    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        self.get(name).and_then(UniformValue::as_vec4)
    }

    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.get(name).and_then(UniformValue::as_texture)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all uniforms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &UniformValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut snap = UniformSnapshot::new();
        snap.set(names::START_SIZE, 1.0f32);
        snap.set(names::START_COLOR, Vec4::ONE);
        snap.set(names::START_SIZE, 2.0f32);

        assert_eq!(snap.len(), 2);
        assert_eq!(snap.f32(names::START_SIZE), Some(2.0));
        let order: Vec<_> = snap.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![names::START_SIZE, names::START_COLOR]);
    }

    #[test]
    fn test_typed_getters() {
        let mut snap = UniformSnapshot::new();
        snap.set(names::MAX_PARTICLES, 10i32);
        snap.set(names::TEXTURE, TextureHandle(3));

        assert_eq!(snap.i32(names::MAX_PARTICLES), Some(10));
        assert_eq!(snap.f32(names::MAX_PARTICLES), None);
        assert_eq!(snap.texture(names::TEXTURE), Some(TextureHandle(3)));
        assert!(snap.get("_Missing").is_none());
    }
}
