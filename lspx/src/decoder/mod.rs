//! Chunk-tag state machine
//!
//! ```text
//! ExpectHeader ──"LSPX"──▶ ReadingChunks ──"BEOF" + counts match──▶ Done
//!      │                        │
//!      └──────── any error ─────┴──────────────────────────────────▶ Failed
//! ```
//!
//! Sprites and atlases are appended in chunk order. If anything fails after
//! the header, everything decoded so far is dropped with the decoder's locals;
//! no partial bundle ever leaves this module.

use std::io::{Read, Seek};

use tracing::{debug, error, warn};

use crate::BUNDLE_ALIGNMENT;
use crate::atlas::{AtlasImage, AtlasStore};
use crate::bundle::Bundle;
use crate::chunk::{AtlasChunk, BundleHeader, ChunkTag, SpriteChunk};
use crate::codec::{AtlasCodec, CodecStage};
use crate::config::{LoaderConfig, UnknownChunkPolicy};
use crate::error::{BundleError, Result};
use crate::reader::ChunkReader;
use crate::registry::SpriteRegistry;
use crate::sprite::Sprite;


/// Smallest SPRT chunk: tag, frame count, empty atlas name, atlas index,
/// 1-byte name padded to 4, six f32s
const MIN_SPRITE_CHUNK_SIZE: usize = 4 + 4 + 4 + 4 + 4 + 4 + 6 * 4;

/// Smallest ATLS chunk: tag, sprite count, empty name, empty payload
const MIN_ATLAS_CHUNK_SIZE: usize = 4 + 4 + 4 + 4;

/// Decoder progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    ExpectHeader,
    ReadingChunks,
    Done,
    Failed,
}

/// Drives a [`ChunkReader`] through one bundle
pub struct BundleDecoder<'a, C: AtlasCodec> {
    codec: &'a mut C,
    config: &'a LoaderConfig,
    state: DecoderState,
    sprites_loaded: usize,
    atlases_loaded: usize,
}

impl<'a, C: AtlasCodec> BundleDecoder<'a, C> {
    pub fn new(codec: &'a mut C, config: &'a LoaderConfig) -> Self {
        Self {
            codec,
            config,
            state: DecoderState::ExpectHeader,
            sprites_loaded: 0,
            atlases_loaded: 0,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// SPRT chunks decoded by the last run (kept after a failure for diagnostics)
    pub fn sprites_loaded(&self) -> usize {
        self.sprites_loaded
    }

    /// ATLS chunks decoded by the last run
    pub fn atlases_loaded(&self) -> usize {
        self.atlases_loaded
    }

    /// Decode one bundle. Ends in [`DecoderState::Done`] or
    /// [`DecoderState::Failed`].
    pub fn decode<R: Read + Seek>(&mut self, source: R) -> Result<Bundle<C::Texture>> {
        self.state = DecoderState::ExpectHeader;
        self.sprites_loaded = 0;
        self.atlases_loaded = 0;

        match self.run(source) {
            Ok(bundle) => {
                self.state = DecoderState::Done;
                Ok(bundle)
            }
            Err(e) => {
                self.state = DecoderState::Failed;
                Err(e)
            }
        }
    }

    fn run<R: Read + Seek>(&mut self, source: R) -> Result<Bundle<C::Texture>> {
        let mut reader = ChunkReader::new(source)?;

        let header = BundleHeader::read(&mut reader)?;
        let version = header.version as i32;
        debug!(chunk = 0, "Found bundle header");
        debug!(
            version,
            atlas_count = header.atlas_count,
            sprite_count = header.sprite_count,
            atlas_size = header.atlas_size,
            "Bundle header"
        );

        self.state = DecoderState::ReadingChunks;
        // Declared counts are untrusted; never reserve more than the rest of
        // the stream could hold
        let remaining = usize::try_from(reader.remaining()).unwrap_or(usize::MAX);
        let mut sprites = SpriteRegistry::with_capacity(
            header.sprite_count.min(remaining / MIN_SPRITE_CHUNK_SIZE),
            self.config.name_comparison,
        );
        let mut atlases =
            AtlasStore::with_capacity(header.atlas_count.min(remaining / MIN_ATLAS_CHUNK_SIZE));

        loop {
            let offset = reader.position();
            let tag = ChunkTag::from_bytes(reader.read_tag()?);
            let chunk = offset / BUNDLE_ALIGNMENT;

            match tag {
                ChunkTag::Sprite => {
                    if sprites.len() == header.sprite_count {
                        return Err(overflow("sprite", header.sprite_count));
                    }
                    let record = SpriteChunk::read(&mut reader, header.version)?;
                    debug!(
                        chunk,
                        frame_count = record.frame_count,
                        atlas_index = record.atlas_index,
                        name = %record.name,
                        source = ?record.source,
                        origin = ?record.origin,
                        "Found sprite"
                    );
                    sprites.push(sprite_from_record(record, header.atlas_count)?);
                    self.sprites_loaded += 1;
                }
                ChunkTag::Atlas => {
                    if atlases.len() == header.atlas_count {
                        return Err(overflow("atlas", header.atlas_count));
                    }
                    let record = AtlasChunk::read(&mut reader)?;
                    debug!(
                        chunk,
                        sprite_count = record.sprite_count,
                        name = %record.name,
                        payload_size = record.payload.len(),
                        "Found atlas"
                    );
                    let texture = self.decode_texture(atlases.len(), &record.payload)?;
                    atlases.push(AtlasImage {
                        name: record.name,
                        declared_sprites: record.sprite_count,
                        texture,
                    });
                    self.atlases_loaded += 1;
                }
                ChunkTag::End => {
                    debug!(chunk, "Found end of bundle");
                    break;
                }
                ChunkTag::Header | ChunkTag::Unknown(_) => match self.config.unknown_chunks {
                    UnknownChunkPolicy::Fail => {
                        return Err(BundleError::UnknownChunkTag {
                            tag: tag.to_bytes(),
                            offset,
                        });
                    }
                    UnknownChunkPolicy::Skip => {
                        warn!(chunk, tag = ?tag.to_bytes(), "Skipping unknown chunk tag");
                    }
                },
            }
        }

        if sprites.len() != header.sprite_count || atlases.len() != header.atlas_count {
            error!("Sprite or atlas count did not match, bundle released");
            error!(
                sprites = sprites.len(),
                sprites_declared = header.sprite_count,
                atlases = atlases.len(),
                atlases_declared = header.atlas_count,
                "Decoded counts"
            );
            return Err(if sprites.len() != header.sprite_count {
                BundleError::CountMismatch {
                    kind: "sprite",
                    declared: header.sprite_count,
                    decoded: sprites.len(),
                }
            } else {
                BundleError::CountMismatch {
                    kind: "atlas",
                    declared: header.atlas_count,
                    decoded: atlases.len(),
                }
            });
        }

        sprites.finalize();
        Ok(Bundle::from_parts(header, atlases, sprites))
    }

    /// Payload → texture through the three codec steps
    fn decode_texture(&mut self, atlas: usize, payload: &[u8]) -> Result<C::Texture> {
        let raw = self
            .codec
            .decompress(payload)
            .map_err(|e| codec_failure(atlas, CodecStage::Decompress, e))?;
        let image = self
            .codec
            .load_image(&self.config.image_format_hint, &raw)
            .map_err(|e| codec_failure(atlas, CodecStage::LoadImage, e))?;
        self.codec
            .upload_texture(image)
            .map_err(|e| codec_failure(atlas, CodecStage::Upload, e))
    }
}

fn sprite_from_record(record: SpriteChunk, atlas_count: usize) -> Result<Sprite> {
    let atlas_index = usize::try_from(record.atlas_index)
        .ok()
        .filter(|&i| i < atlas_count)
        .ok_or_else(|| BundleError::AtlasIndexOutOfRange {
            name: record.name.clone(),
            atlas_index: record.atlas_index,
            atlas_count,
        })?;

    Ok(Sprite {
        name: record.name,
        atlas_index,
        source: record.source,
        origin: record.origin,
        frame_count: record.frame_count,
        frame_speed: record.frame_speed,
    })
}

/// More chunks of one kind than the header declared
fn overflow(kind: &'static str, declared: usize) -> BundleError {
    error!(kind, declared, "More chunks than declared, bundle released");
    BundleError::CountMismatch {
        kind,
        declared,
        decoded: declared + 1,
    }
}

fn codec_failure<E>(atlas: usize, stage: CodecStage, e: E) -> BundleError
where
    E: std::error::Error + Send + Sync + 'static,
{
    BundleError::CodecFailure {
        atlas,
        stage,
        source: Box::new(e),
    }
}
