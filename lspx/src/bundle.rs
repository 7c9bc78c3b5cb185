//! Bundle lifecycle and query API
//!
//! A [`Bundle`] is either **empty** (never loaded, failed, or released) or
//! **ready** (declared atlas and sprite counts both non-zero and fully
//! decoded). There is no partially loaded state.
//!
//! The bundle value is the handle: every query takes `&self`, so several
//! bundles can be queried side by side, and a ready bundle can be shared
//! across threads for read-only access when its texture type allows it.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::Path;

use glam::Vec2;
use tracing::error;

use crate::atlas::{AtlasImage, AtlasStore};
use crate::chunk::BundleHeader;
use crate::codec::AtlasCodec;
use crate::config::LoaderConfig;
use crate::decoder::BundleDecoder;
use crate::error::{BundleError, Result};
use crate::registry::SpriteRegistry;
use crate::sprite::Sprite;

/// Decoded sprite bundle
#[derive(Debug)]
pub struct Bundle<T> {
    header: Option<BundleHeader>,
    atlases: AtlasStore<T>,
    sprites: SpriteRegistry,
}

impl<T> Bundle<T> {
    /// A bundle holding nothing; never ready
    pub fn empty() -> Self {
        let mut sprites = SpriteRegistry::default();
        sprites.finalize();
        Self {
            header: None,
            atlases: AtlasStore::new(),
            sprites,
        }
    }

    pub(crate) fn from_parts(
        header: BundleHeader,
        atlases: AtlasStore<T>,
        sprites: SpriteRegistry,
    ) -> Self {
        Self {
            header: Some(header),
            atlases,
            sprites,
        }
    }

    /// Load a bundle file with the default [`LoaderConfig`].
    ///
    /// Never fails: any error is logged and an empty bundle is returned.
    /// Check [`Self::is_ready`] before use.
    pub fn load<P, C>(path: P, codec: &mut C) -> Self
    where
        P: AsRef<Path>,
        C: AtlasCodec<Texture = T>,
    {
        Self::load_with_config(path, codec, &LoaderConfig::default())
    }

    /// [`Self::load`] with an explicit config
    pub fn load_with_config<P, C>(path: P, codec: &mut C, config: &LoaderConfig) -> Self
    where
        P: AsRef<Path>,
        C: AtlasCodec<Texture = T>,
    {
        let path = path.as_ref();
        match Self::try_load(path, codec, config) {
            Ok(bundle) => bundle,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load sprite bundle");
                Self::empty()
            }
        }
    }

    /// Load a bundle file, reporting why it failed
    pub fn try_load<P, C>(path: P, codec: &mut C, config: &LoaderConfig) -> Result<Self>
    where
        P: AsRef<Path>,
        C: AtlasCodec<Texture = T>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BundleError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => BundleError::Io(e),
        })?;
        Self::from_reader(BufReader::new(file), codec, config)
    }

    /// Decode a bundle from any seekable stream
    pub fn from_reader<R, C>(reader: R, codec: &mut C, config: &LoaderConfig) -> Result<Self>
    where
        R: Read + Seek,
        C: AtlasCodec<Texture = T>,
    {
        BundleDecoder::new(codec, config).decode(reader)
    }

    /// Decode a bundle held in memory
    pub fn from_bytes<C>(bytes: &[u8], codec: &mut C, config: &LoaderConfig) -> Result<Self>
    where
        C: AtlasCodec<Texture = T>,
    {
        Self::from_reader(Cursor::new(bytes), codec, config)
    }

    /// Both declared counts are non-zero (and were fully decoded)
    pub fn is_ready(&self) -> bool {
        self.atlas_count() > 0 && self.sprite_count() > 0
    }

    /// Drop every texture and sprite. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.header = None;
        self.atlases.clear();
        self.sprites.clear();
    }

    /// Header of the loaded bundle; `None` when empty
    pub fn header(&self) -> Option<&BundleHeader> {
        self.header.as_ref()
    }

    pub fn atlas_count(&self) -> usize {
        self.header.map_or(0, |h| h.atlas_count)
    }

    pub fn sprite_count(&self) -> usize {
        self.header.map_or(0, |h| h.sprite_count)
    }

    /// Index of the sprite called `name`, in sorted order
    pub fn get_sprite_index(&self, name: &str) -> Option<usize> {
        self.sprites.lookup(name).ok()
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprite_name(&self, index: usize) -> Option<&str> {
        self.sprite(index).map(|s| s.name.as_str())
    }

    /// (width, height) of the sprite's source rect
    pub fn sprite_size(&self, index: usize) -> Option<Vec2> {
        self.sprite(index).map(Sprite::size)
    }

    pub fn sprite_origin(&self, index: usize) -> Option<Vec2> {
        self.sprite(index).map(|s| s.origin)
    }

    /// Override a sprite's draw origin. Returns `false` if `index` is out of
    /// range. This is the only mutation a loaded bundle allows.
    pub fn set_sprite_origin(&mut self, index: usize, origin: Vec2) -> bool {
        self.sprites.set_origin(index, origin)
    }

    /// Atlas at decode position `atlas_index`
    pub fn atlas_image(&self, atlas_index: usize) -> Option<&AtlasImage<T>> {
        self.atlases.get(atlas_index)
    }

    /// Atlas a sprite lives on
    pub fn sprite_atlas(&self, index: usize) -> Option<&AtlasImage<T>> {
        self.sprite(index)
            .and_then(|s| self.atlases.get(s.atlas_index))
    }

    pub fn sprites(&self) -> &SpriteRegistry {
        &self.sprites
    }

    pub fn atlases(&self) -> &AtlasStore<T> {
        &self.atlases
    }
}

impl<T> Default for Bundle<T> {
    fn default() -> Self {
        Self::empty()
    }
}
