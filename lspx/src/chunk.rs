//! Chunk records and their field-level decoding
//!
//! These functions only know the field layout of each chunk. Chunk ordering,
//! counting and the codec calls live in [`crate::decoder`].

use std::io::{Read, Seek};

use glam::Vec2;

use crate::error::{BundleError, Result};
use crate::reader::ChunkReader;
use crate::sprite::Rect;
use crate::{ATLAS_TAG, BUNDLE_ALIGNMENT, BUNDLE_MAGIC, END_TAG, SPRITE_TAG};

/// A 4-byte chunk tag as read from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkTag {
    /// `LSPX` (only valid as the very first tag)
    Header,
    /// `SPRT`
    Sprite,
    /// `ATLS`
    Atlas,
    /// `BEOF`
    End,
    /// Anything else
    Unknown([u8; 4]),
}

impl ChunkTag {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        match &bytes {
            b if b == BUNDLE_MAGIC => ChunkTag::Header,
            b if b == SPRITE_TAG => ChunkTag::Sprite,
            b if b == ATLAS_TAG => ChunkTag::Atlas,
            b if b == END_TAG => ChunkTag::End,
            _ => ChunkTag::Unknown(bytes),
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Header => *BUNDLE_MAGIC,
            ChunkTag::Sprite => *SPRITE_TAG,
            ChunkTag::Atlas => *ATLAS_TAG,
            ChunkTag::End => *END_TAG,
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

/// Bundle schema, selected by the header's `version` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// SPRT without `frame_speed`
    V1 = 1,
    /// SPRT with `frame_speed:f32` after `frame_count`
    V2 = 2,
}

impl SchemaVersion {
    pub fn has_frame_speed(self) -> bool {
        matches!(self, SchemaVersion::V2)
    }
}

impl TryFrom<i32> for SchemaVersion {
    type Error = BundleError;

    fn try_from(version: i32) -> Result<Self> {
        match version {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            other => Err(BundleError::UnsupportedVersion(other)),
        }
    }
}

/// Bundle header (20 bytes including the tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    pub version: SchemaVersion,
    pub atlas_count: usize,
    pub sprite_count: usize,
    /// Reserved; written by the packer as the atlas size, never interpreted
    pub atlas_size: i32,
}

impl BundleHeader {
    pub const SIZE: usize = 20;

    pub fn new(version: SchemaVersion, atlas_count: usize, sprite_count: usize) -> Self {
        Self {
            version,
            atlas_count,
            sprite_count,
            atlas_size: 0,
        }
    }

    /// Read the magic tag and header scalars
    pub fn read<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<Self> {
        let magic = reader.read_tag()?;
        if &magic != BUNDLE_MAGIC {
            return Err(BundleError::BadHeader {
                expected: *BUNDLE_MAGIC,
                found: magic,
            });
        }

        let version = SchemaVersion::try_from(reader.read_i32()?)?;
        let atlas_count = reader.read_len("atlas count")?;
        let sprite_count = reader.read_len("sprite count")?;
        let atlas_size = reader.read_i32()?;

        Ok(Self {
            version,
            atlas_count,
            sprite_count,
            atlas_size,
        })
    }
}

/// Decoded fields of a SPRT chunk (tag already consumed)
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteChunk {
    pub frame_count: u32,
    pub frame_speed: Option<f32>,
    /// Raw atlas index; range-checked once all atlases are known
    pub atlas_index: i32,
    pub name: String,
    pub source: Rect,
    pub origin: Vec2,
}

impl SpriteChunk {
    /// Read the chunk body. The atlas name is skipped; sprites refer to
    /// atlases by position only.
    pub fn read<R: Read + Seek>(reader: &mut ChunkReader<R>, version: SchemaVersion) -> Result<Self> {
        let frame_count = reader.read_len("frame count")? as u32;
        let frame_speed = if version.has_frame_speed() {
            Some(reader.read_f32()?)
        } else {
            None
        };

        let atlas_name_len = reader.read_len("atlas name length")?;
        reader.skip(atlas_name_len as u64)?;
        reader.align(BUNDLE_ALIGNMENT)?;

        let atlas_index = reader.read_i32()?;
        let name = read_name(reader, "sprite name length")?;

        let source = Rect {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
            width: reader.read_f32()?,
            height: reader.read_f32()?,
        };
        let origin = Vec2::new(reader.read_f32()?, reader.read_f32()?);

        Ok(Self {
            frame_count,
            frame_speed,
            atlas_index,
            name,
            source,
            origin,
        })
    }
}

/// Decoded fields of an ATLS chunk (tag already consumed)
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasChunk {
    /// Sprites the packer placed on this atlas; informational only
    pub sprite_count: u32,
    pub name: String,
    /// Compressed image bytes, handed to the codec
    pub payload: Vec<u8>,
}

impl AtlasChunk {
    pub fn read<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<Self> {
        let sprite_count = reader.read_len("atlas sprite count")? as u32;

        let name_offset = reader.position();
        let name_len = reader.read_len("atlas name length")?;
        let name_bytes = reader.read_exact(name_len)?;
        reader.align(BUNDLE_ALIGNMENT)?;
        // Atlas names are only used for diagnostics
        let name = String::from_utf8(name_bytes).map_err(|e| BundleError::InvalidName {
            offset: name_offset,
            reason: e.to_string(),
        })?;

        let payload_size = reader.read_len("payload size")?;
        let payload = reader.read_exact(payload_size)?;
        reader.align(BUNDLE_ALIGNMENT)?;

        Ok(Self {
            sprite_count,
            name,
            payload,
        })
    }
}

/// Read a length-prefixed, aligned, non-empty UTF-8 name
fn read_name<R: Read + Seek>(reader: &mut ChunkReader<R>, field: &'static str) -> Result<String> {
    let offset = reader.position();
    let len = reader.read_len(field)?;
    let bytes = reader.read_exact(len)?;
    reader.align(BUNDLE_ALIGNMENT)?;

    if bytes.is_empty() {
        return Err(BundleError::InvalidName {
            offset,
            reason: "name is empty".to_string(),
        });
    }
    String::from_utf8(bytes).map_err(|e| BundleError::InvalidName {
        offset,
        reason: e.to_string(),
    })
}
