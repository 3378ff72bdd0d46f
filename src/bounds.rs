//! Culling bounds for the particle mesh.
//!
//! The shader moves particles, so the CPU never knows where they are. The
//! bound is a conservative box: no particle can travel further than
//! `lifetime * speed` from the emitter.

use glam::Vec3;

/// Axis-aligned box described by center and half-extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Full edge lengths.
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }
}

/// Origin-centered box with half-extent `lifetime * speed` on every axis.
///
/// Inputs are not validated; zero or negative values give a degenerate box.
pub fn estimate(lifetime: f32, speed: f32) -> Bounds {
    Bounds::new(Vec3::ZERO, Vec3::splat(lifetime * speed))
}
