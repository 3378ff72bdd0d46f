//! # Billboard Particles
//!
//! Parameter binding for GPU-instanced billboard particle systems.
//!
//! The particles themselves are simulated entirely in the vertex shader. This
//! crate owns the CPU side: it turns a [`ParticleConfig`] into the named
//! uniforms and boolean keywords the shader reads, encodes collision planes as
//! plane equations, and estimates a culling bound for the particle mesh.
//!
//! ## Quick Start
//!
//! ```ignore
//! use billboard_particles::prelude::*;
//!
//! let floor = Rc::new(Plane::new(Vec3::ZERO, Vec3::Y));
//!
//! let mut binder = ParameterBinder::new(ParticleConfig::default()).with_mesh_target();
//! binder.set_planes([Some(PlaneRef::new(&floor))]);
//!
//! let mut material = MaterialProperties::new();
//! let mut bounds = None;
//! binder
//!     .refresh(RefreshTrigger::Initialize)
//!     .apply(Some(&mut material), Some(&mut bounds));
//! ```
//!
//! ## Shader Contract
//!
//! | Kind | Names |
//! |------|-------|
//! | Uniforms | `_StartSize`, `_RateOverTime`, `_StartSpeed`, `_StartLifeTime`, `_StartDelay`, `_MaxParticles`, `_ConeAngle`, `_StartColor`, `_GravityModifier`, `_Texture`, `_CollisionPlaneEquation0..3` |
//! | Keywords | `COL_PLANE_0..3`, `FRAG_TEXTURE`, `SHAPE_SPHERE` |
//!
//! ## Threading
//!
//! Plane references are `Rc`-based, so a binder with planes attached stays on
//! the thread that owns the scene.

pub mod binder;
pub mod bounds;
pub mod config;
mod error;
pub mod gpu;
pub mod keywords;
pub mod plane;
pub mod sink;
pub mod uniforms;

pub use binder::{bind, Binding, ParameterBinder, RefreshTrigger};
pub use bounds::Bounds;
pub use config::{Collision, ConeShape, Emission, ParticleConfig, ShapeKind, TextureHandle};
pub use error::ConfigError;
pub use glam::{Vec3, Vec4};
pub use gpu::{GpuMaterial, ParticleUniformsGpu, UniformBlock};
pub use keywords::{Keyword, KeywordSet};
pub use plane::{CollisionPlanes, Plane, PlaneRef, PlaneSnapshot, PlaneSource, MAX_COLLISION_PLANES};
pub use sink::{Applied, MaterialProperties, MaterialSink, MeshTarget};
pub use uniforms::{UniformSnapshot, UniformValue};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use billboard_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::binder::{ParameterBinder, RefreshTrigger};
    pub use crate::config::{ParticleConfig, ShapeKind, TextureHandle};
    pub use crate::keywords::Keyword;
    pub use crate::plane::{Plane, PlaneRef, PlaneSource};
    pub use crate::sink::{MaterialProperties, MaterialSink, MeshTarget};
    pub use crate::{Vec3, Vec4};
    pub use std::rc::Rc;
}
