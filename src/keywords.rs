//! Shader keywords: boolean flags that select alternate shader code paths.

use crate::plane::MAX_COLLISION_PLANES;
use std::fmt;

/// Every keyword the billboard shader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    ColPlane0,
    ColPlane1,
    ColPlane2,
    ColPlane3,
    /// Sample the sprite texture in the fragment shader.
    FragTexture,
    /// Emit from a sphere instead of a cone.
    ShapeSphere,
}

impl Keyword {
    pub const ALL: [Keyword; 6] = [
        Keyword::ColPlane0,
        Keyword::ColPlane1,
        Keyword::ColPlane2,
        Keyword::ColPlane3,
        Keyword::FragTexture,
        Keyword::ShapeSphere,
    ];

    /// Name as written in the shader source.
    pub fn name(&self) -> &'static str {
        match self {
            Keyword::ColPlane0 => "COL_PLANE_0",
            Keyword::ColPlane1 => "COL_PLANE_1",
            Keyword::ColPlane2 => "COL_PLANE_2",
            Keyword::ColPlane3 => "COL_PLANE_3",
            Keyword::FragTexture => "FRAG_TEXTURE",
            Keyword::ShapeSphere => "SHAPE_SPHERE",
        }
    }

    /// `COL_PLANE_<index>`, or `None` past the last slot.
    pub fn collision_plane(index: usize) -> Option<Keyword> {
        const PLANES: [Keyword; MAX_COLLISION_PLANES] = [
            Keyword::ColPlane0,
            Keyword::ColPlane1,
            Keyword::ColPlane2,
            Keyword::ColPlane3,
        ];
        PLANES.get(index).copied()
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of enabled keywords. Any keyword not in the set is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeywordSet {
    bits: u8,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, keyword: Keyword, enabled: bool) {
        if enabled {
            self.bits |= keyword.bit();
        } else {
            self.bits &= !keyword.bit();
        }
    }

    pub(crate) fn merge(&mut self, other: KeywordSet) {
        self.bits |= other.bits;
    }

    pub fn is_enabled(&self, keyword: Keyword) -> bool {
        self.bits & keyword.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Enabled keywords in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = Keyword> + '_ {
        Keyword::ALL.into_iter().filter(move |k| self.is_enabled(*k))
    }

    /// Every known keyword with its state.
    pub fn states(&self) -> impl Iterator<Item = (Keyword, bool)> + '_ {
        Keyword::ALL.into_iter().map(move |k| (k, self.is_enabled(k)))
    }

    /// WGSL constant declarations for every keyword.
    ///
    /// Prepend to a shader so it can branch with `if COL_PLANE_0 { ... }`.
    pub fn to_wgsl_constants(&self) -> String {
        self.states()
            .map(|(k, on)| format!("const {}: bool = {};", k.name(), on))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for k in iter {
            set.set(k, true);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_names() {
        let names: Vec<_> = Keyword::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "COL_PLANE_0",
                "COL_PLANE_1",
                "COL_PLANE_2",
                "COL_PLANE_3",
                "FRAG_TEXTURE",
                "SHAPE_SPHERE"
            ]
        );
        assert_eq!(Keyword::ShapeSphere.to_string(), "SHAPE_SPHERE");
    }

    #[test]
    fn test_collision_plane_index() {
        assert_eq!(Keyword::collision_plane(2), Some(Keyword::ColPlane2));
        assert_eq!(Keyword::collision_plane(4), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut set = KeywordSet::new();
        set.set(Keyword::ShapeSphere, true);
        set.set(Keyword::ColPlane1, true);
        set.set(Keyword::ShapeSphere, false);

        assert!(set.is_enabled(Keyword::ColPlane1));
        assert!(!set.is_enabled(Keyword::ShapeSphere));
        assert_eq!(set.enabled().collect::<Vec<_>>(), vec![Keyword::ColPlane1]);
    }

    #[test]
    fn test_wgsl_constants() {
        let set: KeywordSet = [Keyword::FragTexture].into_iter().collect();
        let wgsl = set.to_wgsl_constants();
        assert!(wgsl.contains("const FRAG_TEXTURE: bool = true;"));
        assert!(wgsl.contains("const SHAPE_SPHERE: bool = false;"));
        assert_eq!(wgsl.lines().count(), Keyword::ALL.len());
    }
}
