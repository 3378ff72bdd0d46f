//! Collision planes and their plane-equation encoding.
//!
//! Particles collide with up to [`MAX_COLLISION_PLANES`] infinite planes.
//! Planes are owned by the host (a scene node, a gizmo, a physics body); the
//! particle system only keeps a weak reference and reads the plane's position
//! and up direction each time the uniforms are refreshed.
//!
//! # Plane Equation
//!
//! Each plane is uploaded as `vec4(n.x, n.y, n.z, d)` where `n` is the unit
//! normal and `d = -dot(n, position)`. A point `p` lies on the plane when
//! `dot(n, p) + d == 0`; the sign tells the shader which side it is on.
//!
//! # Example
//!
//! ```ignore
//! let floor = Rc::new(Plane::new(Vec3::ZERO, Vec3::Y));
//! config.collision.planes.set([Some(PlaneRef::new(&floor))]);
//! ```

use glam::{Vec3, Vec4};
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Number of plane slots the billboard shader supports.
pub const MAX_COLLISION_PLANES: usize = 4;

/// Something with a world-space position and an up direction.
///
/// Implemented by whatever the host uses as a transform.
pub trait PlaneSource {
    /// World-space position of a point on the plane.
    fn position(&self) -> Vec3;

    /// Local up direction in world space. Must be non-zero.
    fn up(&self) -> Vec3;

    /// Returns `true` once if the transform moved since the last call.
    ///
    /// Sources that never move can keep the default.
    fn take_changed(&self) -> bool {
        false
    }
}

/// A simple movable plane transform.
#[derive(Debug)]
pub struct Plane {
    position: Cell<Vec3>,
    up: Cell<Vec3>,
    changed: Cell<bool>,
}

impl Plane {
    pub fn new(position: Vec3, up: Vec3) -> Self {
        Self {
            position: Cell::new(position),
            up: Cell::new(up),
            changed: Cell::new(false),
        }
    }

    /// Move the plane. Marks it changed.
    pub fn set_position(&self, position: Vec3) {
        self.position.set(position);
        self.changed.set(true);
    }

    /// Re-orient the plane. Marks it changed.
    pub fn set_up(&self, up: Vec3) {
        self.up.set(up);
        self.changed.set(true);
    }
}

impl PlaneSource for Plane {
    fn position(&self) -> Vec3 {
        self.position.get()
    }

    fn up(&self) -> Vec3 {
        self.up.get()
    }

    fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }
}

/// Point-in-time copy of a plane transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSnapshot {
    pub position: Vec3,
    pub up: Vec3,
}

impl PlaneSnapshot {
    pub fn new(position: Vec3, up: Vec3) -> Self {
        Self { position, up }
    }
}

/// Weak reference to a host-owned plane.
///
/// A plane that has been dropped reads as an empty slot.
#[derive(Clone)]
pub struct PlaneRef(Weak<dyn PlaneSource>);

impl PlaneRef {
    pub fn new<P: PlaneSource + 'static>(plane: &Rc<P>) -> Self {
        let plane: Rc<dyn PlaneSource> = plane.clone();
        Self(Rc::downgrade(&plane))
    }

    /// Read the current transform, or `None` if the plane is gone.
    pub fn snapshot(&self) -> Option<PlaneSnapshot> {
        self.0
            .upgrade()
            .map(|p| PlaneSnapshot::new(p.position(), p.up()))
    }

    fn take_changed(&self) -> bool {
        self.0.upgrade().is_some_and(|p| p.take_changed())
    }
}

impl fmt::Debug for PlaneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snapshot() {
            Some(s) => f
                .debug_struct("PlaneRef")
                .field("position", &s.position)
                .field("up", &s.up)
                .finish(),
            None => f.write_str("PlaneRef(dropped)"),
        }
    }
}

/// Ordered list of at most [`MAX_COLLISION_PLANES`] optional plane slots.
#[derive(Clone, Debug, Default)]
pub struct CollisionPlanes {
    slots: Vec<Option<PlaneRef>>,
}

impl CollisionPlanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all slots.
    ///
    /// Slots past [`MAX_COLLISION_PLANES`] are dropped with a warning.
    /// Returns the number of dropped slots.
    pub fn set<I>(&mut self, slots: I) -> usize
    where
        I: IntoIterator<Item = Option<PlaneRef>>,
    {
        self.slots = slots.into_iter().collect();
        self.truncate()
    }

    /// Append a slot. Returns `false` (and drops the slot) when full.
    pub fn push(&mut self, slot: Option<PlaneRef>) -> bool {
        if self.slots.len() >= MAX_COLLISION_PLANES {
            log::warn!("Up to {} collision planes!", MAX_COLLISION_PLANES);
            return false;
        }
        self.slots.push(slot);
        true
    }

    pub(crate) fn truncate(&mut self) -> usize {
        let excess = self.slots.len().saturating_sub(MAX_COLLISION_PLANES);
        if excess > 0 {
            log::warn!(
                "Up to {} collision planes! Dropping {} extra",
                MAX_COLLISION_PLANES,
                excess
            );
            self.slots.truncate(MAX_COLLISION_PLANES);
        }
        excess
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaneRef> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// Snapshot every slot. Empty, missing and dropped slots are `None`.
    pub fn snapshot(&self) -> [Option<PlaneSnapshot>; MAX_COLLISION_PLANES] {
        std::array::from_fn(|i| self.get(i).and_then(PlaneRef::snapshot))
    }

    /// Returns `true` if any plane moved, clearing that plane's flag.
    ///
    /// Stops at the first changed plane.
    pub fn take_changed(&self) -> bool {
        self.slots
            .iter()
            .take(MAX_COLLISION_PLANES)
            .flatten()
            .any(PlaneRef::take_changed)
    }
}

/// Plane equations for every slot, `None` where the slot is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaneEquations {
    equations: [Option<Vec4>; MAX_COLLISION_PLANES],
}

impl PlaneEquations {
    pub fn get(&self, index: usize) -> Option<Vec4> {
        self.equations.get(index).copied().flatten()
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Indices of slots holding a plane.
    pub fn enabled(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_COLLISION_PLANES).filter(move |&i| self.is_enabled(i))
    }

    /// `(index, equation)` pairs for enabled slots.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec4)> + '_ {
        self.equations
            .iter()
            .enumerate()
            .filter_map(|(i, eq)| eq.map(|eq| (i, eq)))
    }
}

/// Compute `(n.x, n.y, n.z, d)` for one plane.
///
/// Position and up are carried as homogeneous vectors with `w = 1`; the
/// normal is normalized over xyz and `d` is taken against xyz, so `w` never
/// enters the result. A zero `up` yields NaN components.
pub fn plane_equation(plane: &PlaneSnapshot) -> Vec4 {
    let center = plane.position.extend(1.0);
    let up = plane.up.extend(1.0);

    let normal = up.truncate().normalize();
    let d = -normal.dot(center.truncate());
    normal.extend(d)
}

/// Encode every slot into a plane equation.
///
/// Slots past [`MAX_COLLISION_PLANES`] are ignored.
pub fn encode(planes: &[Option<PlaneSnapshot>]) -> PlaneEquations {
    let mut out = PlaneEquations::default();
    for (slot, plane) in out.equations.iter_mut().zip(planes) {
        *slot = plane.as_ref().map(plane_equation);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_horizontal_plane() {
        let eq = plane_equation(&PlaneSnapshot::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y));
        assert!(approx(eq, Vec4::new(0.0, 1.0, 0.0, -5.0)));

        let on_plane = Vec3::new(3.0, 5.0, -2.0);
        assert!((eq.truncate().dot(on_plane) + eq.w).abs() < 1e-5);
    }

    #[test]
    fn test_offset_along_plane_does_not_change_d() {
        let eq = plane_equation(&PlaneSnapshot::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y));
        assert!(approx(eq, Vec4::new(0.0, 1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_normal_is_unit_length() {
        let eq = plane_equation(&PlaneSnapshot::new(Vec3::ONE, Vec3::new(0.0, 3.0, 4.0)));
        assert!((eq.truncate().length() - 1.0).abs() < 1e-5);
        assert!(approx(eq, Vec4::new(0.0, 0.6, 0.8, -1.4)));
    }

    #[test]
    fn test_side_sign() {
        let eq = plane_equation(&PlaneSnapshot::new(Vec3::ZERO, Vec3::Y));
        let above = eq.truncate().dot(Vec3::new(0.0, 1.0, 0.0)) + eq.w;
        let below = eq.truncate().dot(Vec3::new(0.0, -1.0, 0.0)) + eq.w;
        assert!(above > 0.0);
        assert!(below < 0.0);
    }

    #[test]
    fn test_zero_up_is_nan() {
        let eq = plane_equation(&PlaneSnapshot::new(Vec3::ZERO, Vec3::ZERO));
        assert!(eq.x.is_nan());
    }

    #[test]
    fn test_encode_partial() {
        let planes = [
            Some(PlaneSnapshot::new(Vec3::ZERO, Vec3::Y)),
            None,
            Some(PlaneSnapshot::new(Vec3::X, Vec3::X)),
        ];
        let eqs = encode(&planes);
        assert_eq!(eqs.enabled().collect::<Vec<_>>(), vec![0, 2]);
        assert!(eqs.get(1).is_none());
        assert!(eqs.get(3).is_none());
        assert!(approx(eqs.get(2).unwrap(), Vec4::new(1.0, 0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_encode_ignores_excess() {
        let planes = vec![Some(PlaneSnapshot::new(Vec3::ZERO, Vec3::Y)); 6];
        let eqs = encode(&planes);
        assert_eq!(eqs.enabled().count(), MAX_COLLISION_PLANES);
        assert!(eqs.get(4).is_none());
    }

    #[test]
    fn test_set_truncates() {
        let plane = Rc::new(Plane::new(Vec3::ZERO, Vec3::Y));
        let mut planes = CollisionPlanes::new();
        let dropped = planes.set((0..6).map(|_| Some(PlaneRef::new(&plane))));
        assert_eq!(dropped, 2);
        assert_eq!(planes.len(), MAX_COLLISION_PLANES);
        assert!(!planes.push(None));
    }

    #[test]
    fn test_dropped_plane_reads_empty() {
        let plane = Rc::new(Plane::new(Vec3::ZERO, Vec3::Y));
        let mut planes = CollisionPlanes::new();
        planes.set([Some(PlaneRef::new(&plane))]);
        assert!(planes.snapshot()[0].is_some());

        drop(plane);
        assert!(planes.snapshot()[0].is_none());
    }

    #[test]
    fn test_take_changed_clears_flag() {
        let plane = Rc::new(Plane::new(Vec3::ZERO, Vec3::Y));
        let mut planes = CollisionPlanes::new();
        planes.set([None, Some(PlaneRef::new(&plane))]);

        assert!(!planes.take_changed());
        plane.set_position(Vec3::Y);
        assert!(planes.take_changed());
        assert!(!planes.take_changed());
    }
}
