//! Applying a [`Binding`] to engine-owned objects.
//!
//! The binder produces plain data. Whatever owns the real material and mesh
//! implements [`MaterialSink`] and [`MeshTarget`] and receives it here.

use crate::binder::Binding;
use crate::bounds::Bounds;
use crate::config::TextureHandle;
use crate::keywords::{Keyword, KeywordSet};
use crate::uniforms::{names, UniformValue};
use std::collections::HashMap;

/// Receives uniforms and keyword states.
pub trait MaterialSink {
    fn set_uniform(&mut self, name: &str, value: &UniformValue);

    fn set_keyword(&mut self, keyword: Keyword, enabled: bool);

    /// Unbind a uniform that is absent from the snapshot.
    fn clear_uniform(&mut self, _name: &str) {}
}

/// Receives the culling bounds.
pub trait MeshTarget {
    fn set_bounds(&mut self, bounds: Bounds);
}

/// Outcome of [`Binding::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Uploaded,
    /// No material was available; retry on the next refresh.
    Skipped,
}

impl Binding {
    /// Push this binding into a material and optionally a mesh.
    ///
    /// Without a material nothing is applied, bounds included.
    pub fn apply(
        &self,
        material: Option<&mut dyn MaterialSink>,
        mesh: Option<&mut dyn MeshTarget>,
    ) -> Applied {
        let Some(material) = material else {
            log::debug!("No material available, skipping particle uniform upload");
            return Applied::Skipped;
        };

        for (name, value) in self.uniforms.iter() {
            material.set_uniform(name, value);
        }
        if !self.uniforms.contains(names::TEXTURE) {
            material.clear_uniform(names::TEXTURE);
        }
        for name in names::COLLISION_PLANE_EQUATION {
            if !self.uniforms.contains(name) {
                material.clear_uniform(name);
            }
        }
        for (keyword, enabled) in self.keywords.states() {
            material.set_keyword(keyword, enabled);
        }

        if let (Some(mesh), Some(bounds)) = (mesh, self.bounds) {
            mesh.set_bounds(bounds);
        }
        Applied::Uploaded
    }
}

/// In-memory material state.
///
/// Useful as a sink for tooling and tests, or as a staging copy before a
/// backend-specific upload.
#[derive(Clone, Debug, Default)]
pub struct MaterialProperties {
    uniforms: HashMap<String, UniformValue>,
    keywords: KeywordSet,
}

impl MaterialProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.uniform(names::TEXTURE).and_then(UniformValue::as_texture)
    }

    pub fn keywords(&self) -> KeywordSet {
        self.keywords
    }

    pub fn is_keyword_enabled(&self, keyword: Keyword) -> bool {
        self.keywords.is_enabled(keyword)
    }
}

impl MaterialSink for MaterialProperties {
    fn set_uniform(&mut self, name: &str, value: &UniformValue) {
        self.uniforms.insert(name.to_string(), *value);
    }

    fn set_keyword(&mut self, keyword: Keyword, enabled: bool) {
        self.keywords.set(keyword, enabled);
    }

    fn clear_uniform(&mut self, name: &str) {
        self.uniforms.remove(name);
    }
}

impl MeshTarget for Option<Bounds> {
    fn set_bounds(&mut self, bounds: Bounds) {
        *self = Some(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{ParameterBinder, RefreshTrigger};
    use crate::config::{ParticleConfig, ShapeKind};
    use crate::plane::{Plane, PlaneRef};
    use glam::{Vec3, Vec4};
    use std::rc::Rc;

    #[test]
    fn test_apply_without_material_skips() {
        let mut binder = ParameterBinder::default().with_mesh_target();
        let binding = binder.refresh(RefreshTrigger::Initialize);

        let mut mesh: Option<Bounds> = None;
        assert_eq!(binding.apply(None, Some(&mut mesh)), Applied::Skipped);
        assert!(mesh.is_none());
    }

    #[test]
    fn test_apply_uploads_everything() {
        let mut config = ParticleConfig::default();
        config.shape = ShapeKind::Sphere;
        config.texture = Some(TextureHandle(5));
        let mut binder = ParameterBinder::new(config).with_mesh_target();
        let binding = binder.refresh(RefreshTrigger::Initialize);

        let mut material = MaterialProperties::new();
        let mut mesh: Option<Bounds> = None;
        assert_eq!(
            binding.apply(Some(&mut material), Some(&mut mesh)),
            Applied::Uploaded
        );

        assert_eq!(material.texture(), Some(TextureHandle(5)));
        assert!(material.is_keyword_enabled(Keyword::ShapeSphere));
        assert!(material.is_keyword_enabled(Keyword::FragTexture));
        assert_eq!(
            material.uniform(names::START_SIZE).and_then(UniformValue::as_f32),
            Some(1.0)
        );
        assert_eq!(mesh.unwrap().half_extents, Vec3::splat(25.0));
    }

    #[test]
    fn test_apply_clears_removed_plane() {
        let plane = Rc::new(Plane::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Y));
        let mut binder = ParameterBinder::default();
        let mut material = MaterialProperties::new();

        binder
            .set_planes([Some(PlaneRef::new(&plane))])
            .apply(Some(&mut material), None);
        let name = names::COLLISION_PLANE_EQUATION[0];
        assert_eq!(
            material.uniform(name).and_then(UniformValue::as_vec4),
            Some(Vec4::new(0.0, 1.0, 0.0, -2.0))
        );

        binder.set_planes([None]).apply(Some(&mut material), None);
        assert!(material.uniform(name).is_none());
        assert!(!material.is_keyword_enabled(Keyword::ColPlane0));
    }

    #[test]
    fn test_apply_clears_stale_texture_and_keywords() {
        let mut config = ParticleConfig::default();
        config.texture = Some(TextureHandle(5));
        let mut binder = ParameterBinder::new(config);
        let mut material = MaterialProperties::new();
        binder.refresh(RefreshTrigger::Initialize).apply(Some(&mut material), None);
        assert!(material.texture().is_some());

        binder
            .configure(|c| c.texture = None)
            .apply(Some(&mut material), None);
        assert!(material.texture().is_none());
        assert!(!material.is_keyword_enabled(Keyword::FragTexture));
    }
}
