//! Sorted sprite index
//!
//! Sprites are appended in chunk order during decode, then sorted once by name
//! in [`SpriteRegistry::finalize`]. Lookups are a binary search with the same
//! comparator, so sorting and searching can never disagree.

use std::cmp::Ordering;

use glam::Vec2;

use crate::config::NameComparison;
use crate::error::LookupError;
use crate::sprite::Sprite;

/// Ordered collection of sprites with name lookup
#[derive(Debug, Clone, Default)]
pub struct SpriteRegistry {
    sprites: Vec<Sprite>,
    comparison: NameComparison,
    finalized: bool,
}

impl SpriteRegistry {
    /// Create an empty, unfinalized registry
    pub fn new(comparison: NameComparison) -> Self {
        Self::with_capacity(0, comparison)
    }

    /// Pre-size for the declared sprite count
    pub fn with_capacity(capacity: usize, comparison: NameComparison) -> Self {
        Self {
            sprites: Vec::with_capacity(capacity),
            comparison,
            finalized: false,
        }
    }

    /// Append a sprite. Invalidates any previous sort.
    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
        self.finalized = false;
    }

    /// Sort by name. Stable, so sprites with colliding names keep chunk order.
    pub fn finalize(&mut self) {
        let comparison = self.comparison;
        self.sprites
            .sort_by(|a, b| comparison.compare(&a.name, &b.name));
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn comparison(&self) -> NameComparison {
        self.comparison
    }

    /// Find a sprite index by name.
    ///
    /// When several sprites compare equal to `name` (duplicates, or names
    /// sharing a 128-byte prefix under [`NameComparison::Truncated`]) the
    /// lowest index wins.
    pub fn lookup(&self, name: &str) -> Result<usize, LookupError> {
        if !self.finalized {
            return Err(LookupError::NotReady);
        }

        let comparison = self.comparison;
        let index = self
            .sprites
            .partition_point(|s| comparison.compare(&s.name, name) == Ordering::Less);

        match self.sprites.get(index) {
            Some(sprite) if comparison.compare(&sprite.name, name) == Ordering::Equal => Ok(index),
            _ => Err(LookupError::NotFound),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    /// Override the draw origin of one sprite. Returns `false` if out of range.
    pub fn set_origin(&mut self, index: usize, origin: Vec2) -> bool {
        match self.sprites.get_mut(index) {
            Some(sprite) => {
                sprite.origin = origin;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Drop every sprite. The registry stays finalized (an empty list is sorted).
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.sprites.shrink_to_fit();
        self.finalized = true;
    }
}

impl<'a> IntoIterator for &'a SpriteRegistry {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_COMPARABLE_NAME_LENGTH;
    use crate::sprite::Rect;

    fn sprite(name: &str, atlas_index: usize) -> Sprite {
        Sprite {
            name: name.to_string(),
            atlas_index,
            source: Rect::new(0.0, 0.0, 1.0, 1.0),
            origin: Vec2::ZERO,
            frame_count: 1,
            frame_speed: None,
        }
    }

    fn registry(names: &[&str], comparison: NameComparison) -> SpriteRegistry {
        let mut reg = SpriteRegistry::with_capacity(names.len(), comparison);
        for (i, name) in names.iter().enumerate() {
            reg.push(sprite(name, i));
        }
        reg.finalize();
        reg
    }

    #[test]
    fn test_finalize_sorts_by_name() {
        let reg = registry(&["zombie", "hero", "coin", "Boss"], NameComparison::Truncated);
        let names: Vec<&str> = reg.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Boss", "coin", "hero", "zombie"]);
    }

    #[test]
    fn test_lookup_finds_every_sprite() {
        let names = ["walk_0", "walk_1", "idle", "jump", "a", "b", "c"];
        let reg = registry(&names, NameComparison::Truncated);

        for name in names {
            let index = reg.lookup(name).unwrap();
            assert_eq!(reg.get(index).unwrap().name, name);
        }
    }

    #[test]
    fn test_lookup_missing_name() {
        let reg = registry(&["hero", "coin"], NameComparison::Truncated);
        assert_eq!(reg.lookup("villain"), Err(LookupError::NotFound));
        assert_eq!(reg.lookup(""), Err(LookupError::NotFound));
        assert_eq!(reg.lookup("her"), Err(LookupError::NotFound));
        assert_eq!(reg.lookup("heroes"), Err(LookupError::NotFound));
    }

    #[test]
    fn test_lookup_before_finalize_is_not_ready() {
        let mut reg = SpriteRegistry::new(NameComparison::Full);
        reg.push(sprite("hero", 0));
        assert_eq!(reg.lookup("hero"), Err(LookupError::NotReady));

        reg.finalize();
        assert_eq!(reg.lookup("hero"), Ok(0));

        // A later push needs another sort
        reg.push(sprite("alpha", 1));
        assert_eq!(reg.lookup("hero"), Err(LookupError::NotReady));
    }

    #[test]
    fn test_empty_registry() {
        let mut reg = SpriteRegistry::new(NameComparison::Truncated);
        reg.finalize();
        assert!(reg.is_empty());
        assert_eq!(reg.lookup("anything"), Err(LookupError::NotFound));
    }

    #[test]
    fn test_duplicates_resolve_to_lowest_index() {
        let reg = registry(&["dup", "a", "dup", "z", "dup"], NameComparison::Full);
        let index = reg.lookup("dup").unwrap();
        assert_eq!(index, 1);
        // Stable sort: the first "dup" in chunk order comes first
        assert_eq!(reg.get(index).unwrap().atlas_index, 0);
    }

    #[test]
    fn test_long_names_collide_under_truncation() {
        let prefix = "x".repeat(MAX_COMPARABLE_NAME_LENGTH);
        let first = format!("{prefix}_first");
        let second = format!("{prefix}_second");
        let absent = format!("{prefix}_absent");

        let reg = registry(&[second.as_str(), first.as_str()], NameComparison::Truncated);
        // Known collision: every name with this prefix matches the first entry
        assert_eq!(reg.lookup(&first), Ok(0));
        assert_eq!(reg.lookup(&second), Ok(0));
        assert_eq!(reg.lookup(&absent), Ok(0));
        assert_eq!(reg.get(0).unwrap().name, second);

        let reg = registry(&[second.as_str(), first.as_str()], NameComparison::Full);
        assert_eq!(reg.get(reg.lookup(&first).unwrap()).unwrap().name, first);
        assert_eq!(reg.get(reg.lookup(&second).unwrap()).unwrap().name, second);
        assert_eq!(reg.lookup(&absent), Err(LookupError::NotFound));
    }

    #[test]
    fn test_set_origin() {
        let mut reg = registry(&["hero"], NameComparison::Truncated);
        assert!(reg.set_origin(0, Vec2::new(3.0, 4.0)));
        assert_eq!(reg.get(0).unwrap().origin, Vec2::new(3.0, 4.0));
        assert!(!reg.set_origin(1, Vec2::ONE));
    }

    #[test]
    fn test_clear_releases_sprites() {
        let mut reg = registry(&["a", "b"], NameComparison::Truncated);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.is_finalized());
        assert_eq!(reg.lookup("a"), Err(LookupError::NotFound));
    }
}
