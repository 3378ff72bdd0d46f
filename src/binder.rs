//! Turns a [`ParticleConfig`] into shader uniforms and keywords.
//!
//! # Refresh Flow
//!
//! ```text
//! host event ──▶ ParameterBinder::refresh(trigger)
//!                  ├─ scalar fields ──────▶ UniformSnapshot
//!                  ├─ texture / shape ────▶ KeywordSet
//!                  ├─ plane::encode ──────▶ _CollisionPlaneEquationN + COL_PLANE_N
//!                  └─ bounds::estimate ───▶ Bounds (only with a mesh target)
//! ```
//!
//! A refresh is a pure recomputation. Calling it twice with the same
//! configuration and plane transforms gives identical results.
//!
//! # Example
//!
//! ```ignore
//! let mut binder = ParameterBinder::new(ParticleConfig::default()).with_mesh_target();
//! let binding = binder.refresh(RefreshTrigger::Initialize);
//! binding.apply(Some(&mut material), Some(&mut mesh));
//!
//! // Once per frame:
//! if let Some(binding) = binder.poll_planes() {
//!     binding.apply(Some(&mut material), Some(&mut mesh));
//! }
//! ```

use crate::bounds::{self, Bounds};
use crate::config::{ParticleConfig, ShapeKind};
use crate::keywords::{Keyword, KeywordSet};
use crate::plane::{self, PlaneRef};
use crate::uniforms::{names, UniformSnapshot};

/// Why a refresh was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The particle system was created.
    Initialize,
    /// A configuration field was edited.
    ConfigChanged,
    /// A collision plane's transform moved.
    PlaneMoved,
}

/// Result of one refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub uniforms: UniformSnapshot,
    pub keywords: KeywordSet,
    /// `None` when no mesh target is attached.
    pub bounds: Option<Bounds>,
}

/// Derive uniforms and keywords from a configuration.
pub fn bind(config: &ParticleConfig) -> (UniformSnapshot, KeywordSet) {
    let mut uniforms = UniformSnapshot::new();
    let mut keywords = KeywordSet::new();

    uniforms.set(names::START_SIZE, config.start_size);
    uniforms.set(names::RATE_OVER_TIME, config.emission.rate_over_time);
    uniforms.set(names::START_SPEED, config.start_speed);
    uniforms.set(names::START_LIFETIME, config.start_lifetime);
    uniforms.set(names::START_DELAY, config.start_delay);
    uniforms.set(names::MAX_PARTICLES, max_particles_uniform(config.max_particles));
    // Written for every shape, not just cones.
    uniforms.set(names::CONE_ANGLE, config.cone.angle);
    uniforms.set(names::START_COLOR, config.start_color);
    uniforms.set(names::GRAVITY_MODIFIER, config.gravity_modifier);
    if let Some(texture) = config.texture {
        uniforms.set(names::TEXTURE, texture);
    }

    let (plane_uniforms, plane_keywords) = bind_planes(config);
    for (name, value) in plane_uniforms.iter() {
        uniforms.set(name, *value);
    }
    keywords.merge(plane_keywords);

    keywords.set(Keyword::FragTexture, config.texture.is_some());
    keywords.set(Keyword::ShapeSphere, config.shape == ShapeKind::Sphere);

    (uniforms, keywords)
}

fn bind_planes(config: &ParticleConfig) -> (UniformSnapshot, KeywordSet) {
    let mut uniforms = UniformSnapshot::new();
    let mut keywords = KeywordSet::new();

    let equations = plane::encode(&config.collision.planes.snapshot());
    for (i, eq) in equations.iter() {
        uniforms.set(names::COLLISION_PLANE_EQUATION[i], eq);
    }
    for i in equations.enabled() {
        if let Some(k) = Keyword::collision_plane(i) {
            keywords.set(k, true);
        }
    }
    (uniforms, keywords)
}

fn max_particles_uniform(max_particles: u32) -> i32 {
    i32::try_from(max_particles).unwrap_or(i32::MAX)
}

/// Owns a particle configuration and recomputes its binding on request.
#[derive(Debug, Default)]
pub struct ParameterBinder {
    config: ParticleConfig,
    has_mesh_target: bool,
    current: Option<Binding>,
}

impl ParameterBinder {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            has_mesh_target: false,
            current: None,
        }
    }

    /// Attach a mesh target so refreshes also estimate bounds.
    pub fn with_mesh_target(mut self) -> Self {
        self.has_mesh_target = true;
        self
    }

    pub fn set_mesh_target(&mut self, attached: bool) {
        self.has_mesh_target = attached;
    }

    pub fn has_mesh_target(&self) -> bool {
        self.has_mesh_target
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// The binding from the latest refresh, or `None` before the first one.
    pub fn current(&self) -> Option<&Binding> {
        self.current.as_ref()
    }

    /// Recompute uniforms, keywords and bounds from the current config.
    pub fn refresh(&mut self, trigger: RefreshTrigger) -> &Binding {
        log::debug!("Refreshing particle binding ({:?})", trigger);

        let (uniforms, keywords) = bind(&self.config);
        let bounds = self
            .has_mesh_target
            .then(|| bounds::estimate(self.config.start_lifetime, self.config.start_speed));

        self.current.insert(Binding {
            uniforms,
            keywords,
            bounds,
        })
    }

    /// Edit the configuration, then refresh.
    ///
    /// Plane lists left longer than the shader supports are truncated.
    pub fn configure<F>(&mut self, edit: F) -> &Binding
    where
        F: FnOnce(&mut ParticleConfig),
    {
        edit(&mut self.config);
        self.config.collision.planes.truncate();
        self.refresh(RefreshTrigger::ConfigChanged)
    }

    /// Replace the whole configuration, then refresh.
    pub fn set_config(&mut self, config: ParticleConfig) -> &Binding {
        self.configure(|c| *c = config)
    }

    /// Replace the collision planes, then refresh.
    pub fn set_planes<I>(&mut self, planes: I) -> &Binding
    where
        I: IntoIterator<Item = Option<PlaneRef>>,
    {
        self.configure(|c| {
            c.collision.planes.set(planes);
        })
    }

    /// Refresh if any collision plane moved since the last poll.
    ///
    /// Call once per frame. Several planes moving in the same frame still
    /// cause a single refresh.
    pub fn poll_planes(&mut self) -> Option<&Binding> {
        if self.config.collision.planes.take_changed() {
            Some(self.refresh(RefreshTrigger::PlaneMoved))
        } else {
            None
        }
    }
}
