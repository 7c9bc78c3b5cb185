//! Decoded atlas textures, addressed by decode order

/// One decoded atlas
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasImage<T> {
    /// Atlas name from the ATLS chunk (diagnostics only)
    pub name: String,
    /// Sprite count the packer recorded for this atlas; not validated
    pub declared_sprites: u32,
    /// Texture produced by the codec
    pub texture: T,
}

/// Fixed-order atlas collection
///
/// The n-th ATLS chunk in the file becomes atlas `n`; sprites refer to atlases
/// by that position. Nothing is reordered after decode.
#[derive(Debug, Clone)]
pub struct AtlasStore<T> {
    atlases: Vec<AtlasImage<T>>,
}

impl<T> AtlasStore<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size for the declared atlas count
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            atlases: Vec::with_capacity(capacity),
        }
    }

    /// Store the next atlas; returns its index
    pub fn push(&mut self, atlas: AtlasImage<T>) -> usize {
        self.atlases.push(atlas);
        self.atlases.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&AtlasImage<T>> {
        self.atlases.get(index)
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtlasImage<T>> {
        self.atlases.iter()
    }

    /// Drop every texture
    pub fn clear(&mut self) {
        self.atlases.clear();
        self.atlases.shrink_to_fit();
    }

    /// Take the textures out in atlas order
    pub fn into_textures(self) -> Vec<T> {
        self.atlases.into_iter().map(|a| a.texture).collect()
    }
}

impl<T> Default for AtlasStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a AtlasStore<T> {
    type Item = &'a AtlasImage<T>;
    type IntoIter = std::slice::Iter<'a, AtlasImage<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.atlases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas(name: &str, texture: u32) -> AtlasImage<u32> {
        AtlasImage {
            name: name.to_string(),
            declared_sprites: 0,
            texture,
        }
    }

    #[test]
    fn test_positional_indexing() {
        let mut store = AtlasStore::with_capacity(2);
        assert_eq!(store.push(atlas("b_tiles", 10)), 0);
        assert_eq!(store.push(atlas("a_tiles", 20)), 1);

        // Decode order, not name order
        assert_eq!(store.get(0).unwrap().name, "b_tiles");
        assert_eq!(store.get(1).unwrap().texture, 20);
        assert!(store.get(2).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear_and_into_textures() {
        let mut store = AtlasStore::new();
        store.push(atlas("one", 1));
        store.push(atlas("two", 2));
        assert_eq!(store.clone().into_textures(), vec![1, 2]);

        store.clear();
        assert!(store.is_empty());
        assert!(store.into_textures().is_empty());
    }
}
