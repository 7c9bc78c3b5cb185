//! Shared fixtures for unit tests: a bookkeeping codec and bundle builders

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec2;

use crate::chunk::{AtlasChunk, BundleHeader, SchemaVersion, SpriteChunk};
use crate::codec::{AtlasCodec, CodecStage};
use crate::sprite::Rect;
use crate::writer::BundleWriter;

#[derive(Debug, thiserror::Error)]
#[error("test codec refused {0}")]
pub(crate) struct TestCodecError(pub CodecStage);

/// Texture that counts itself in a shared live-texture counter
#[derive(Debug)]
pub(crate) struct TestTexture {
    pub bytes: Vec<u8>,
    live: Arc<AtomicUsize>,
}

impl Drop for TestTexture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Identity codec: the payload is the "image". Fails on demand at one stage.
#[derive(Default)]
pub(crate) struct TestCodec {
    live: Arc<AtomicUsize>,
    pub fail_at: Option<CodecStage>,
    /// Fail only once this many textures were uploaded successfully
    pub fail_after: usize,
    pub uploads: usize,
    pub hints: Vec<String>,
}

impl TestCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(stage: CodecStage, after: usize) -> Self {
        Self {
            fail_at: Some(stage),
            fail_after: after,
            ..Self::default()
        }
    }

    /// Textures currently alive
    pub fn live_textures(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn check(&self, stage: CodecStage) -> Result<(), TestCodecError> {
        if self.fail_at == Some(stage) && self.uploads >= self.fail_after {
            return Err(TestCodecError(stage));
        }
        Ok(())
    }
}

impl AtlasCodec for TestCodec {
    type Image = Vec<u8>;
    type Texture = TestTexture;
    type Error = TestCodecError;

    fn decompress(&mut self, compressed: &[u8]) -> Result<Vec<u8>, Self::Error> {
        self.check(CodecStage::Decompress)?;
        Ok(compressed.to_vec())
    }

    fn load_image(&mut self, format_hint: &str, raw: &[u8]) -> Result<Vec<u8>, Self::Error> {
        self.check(CodecStage::LoadImage)?;
        self.hints.push(format_hint.to_string());
        Ok(raw.to_vec())
    }

    fn upload_texture(&mut self, image: Vec<u8>) -> Result<TestTexture, Self::Error> {
        self.check(CodecStage::Upload)?;
        self.uploads += 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(TestTexture {
            bytes: image,
            live: Arc::clone(&self.live),
        })
    }
}

pub(crate) fn sprite_chunk(name: &str, atlas_index: i32, source: Rect, origin: Vec2) -> SpriteChunk {
    SpriteChunk {
        frame_count: 1,
        frame_speed: None,
        atlas_index,
        name: name.to_string(),
        source,
        origin,
    }
}

pub(crate) fn atlas_chunk(name: &str, payload: &[u8]) -> AtlasChunk {
    AtlasChunk {
        sprite_count: 1,
        name: name.to_string(),
        payload: payload.to_vec(),
    }
}

/// Header, then every atlas, then every sprite, then BEOF
pub(crate) fn encode(header: BundleHeader, atlases: &[AtlasChunk], sprites: &[SpriteChunk]) -> Vec<u8> {
    let mut writer = BundleWriter::new(Vec::new(), header.version);
    writer.write_header(&header).unwrap();
    for atlas in atlases {
        writer.write_atlas(atlas).unwrap();
    }
    for sprite in sprites {
        writer.write_sprite(sprite, "atlas").unwrap();
    }
    writer.write_end().unwrap();
    writer.into_inner()
}

/// One 1×1 atlas and one "hero" sprite covering it
pub(crate) fn hero_bundle(declared_sprites: usize) -> Vec<u8> {
    encode(
        BundleHeader::new(SchemaVersion::V1, 1, declared_sprites),
        &[atlas_chunk("main", &[0xFF, 0x00, 0x00, 0xFF])],
        &[sprite_chunk(
            "hero",
            0,
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Vec2::ZERO,
        )],
    )
}
