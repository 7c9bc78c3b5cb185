//! Bundle writer
//!
//! Produces the exact byte layout the decoder reads, including zero-filled
//! alignment padding after every variable-length field.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::BUNDLE_ALIGNMENT;
use crate::chunk::{AtlasChunk, BundleHeader, ChunkTag, SchemaVersion, SpriteChunk};

const PADDING: [u8; BUNDLE_ALIGNMENT as usize] = [0; BUNDLE_ALIGNMENT as usize];

/// Writer for the LSPX bundle format
pub struct BundleWriter<W: Write> {
    writer: W,
    position: u64,
    version: SchemaVersion,
}

impl<W: Write> BundleWriter<W> {
    /// Create a writer. `version` selects the SPRT layout; [`Self::write_header`]
    /// replaces it with the header's version.
    pub fn new(writer: W, version: SchemaVersion) -> Self {
        Self {
            writer,
            position: 0,
            version,
        }
    }

    /// Bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write the `LSPX` header
    pub fn write_header(&mut self, header: &BundleHeader) -> io::Result<()> {
        self.version = header.version;
        self.write_tag(ChunkTag::Header)?;
        self.write_i32(header.version as i32)?;
        self.write_count(header.atlas_count)?;
        self.write_count(header.sprite_count)?;
        self.write_i32(header.atlas_size)?;
        Ok(())
    }

    /// Write a SPRT chunk. `atlas_name` is stored for tooling and ignored by
    /// the decoder.
    pub fn write_sprite(&mut self, sprite: &SpriteChunk, atlas_name: &str) -> io::Result<()> {
        self.write_tag(ChunkTag::Sprite)?;
        self.write_count(sprite.frame_count as usize)?;
        if self.version.has_frame_speed() {
            self.write_f32(sprite.frame_speed.unwrap_or(0.0))?;
        }
        self.write_bytes_aligned(atlas_name.as_bytes())?;

        self.write_i32(sprite.atlas_index)?;
        self.write_bytes_aligned(sprite.name.as_bytes())?;

        self.write_f32(sprite.source.x)?;
        self.write_f32(sprite.source.y)?;
        self.write_f32(sprite.source.width)?;
        self.write_f32(sprite.source.height)?;
        self.write_f32(sprite.origin.x)?;
        self.write_f32(sprite.origin.y)?;
        Ok(())
    }

    /// Write an ATLS chunk. The payload must already be compressed.
    pub fn write_atlas(&mut self, atlas: &AtlasChunk) -> io::Result<()> {
        self.write_tag(ChunkTag::Atlas)?;
        self.write_count(atlas.sprite_count as usize)?;
        self.write_bytes_aligned(atlas.name.as_bytes())?;
        self.write_bytes_aligned(&atlas.payload)?;
        Ok(())
    }

    /// Write the `BEOF` terminator
    pub fn write_end(&mut self) -> io::Result<()> {
        self.write_tag(ChunkTag::End)
    }

    /// Write a bare 4-byte tag
    pub fn write_tag(&mut self, tag: ChunkTag) -> io::Result<()> {
        self.writer.write_all(&tag.to_bytes())?;
        self.position += 4;
        Ok(())
    }

    /// Write a raw i32 (for hand-built or deliberately corrupt fixtures)
    pub fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.writer.write_i32::<LittleEndian>(v)?;
        self.position += 4;
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> io::Result<()> {
        self.writer.write_f32::<LittleEndian>(v)?;
        self.position += 4;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Return the underlying writer without flushing
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_count(&mut self, count: usize) -> io::Result<()> {
        let v = i32::try_from(count)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "count exceeds i32::MAX"))?;
        self.write_i32(v)
    }

    /// i32 length, bytes, then padding to the next boundary
    fn write_bytes_aligned(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_count(bytes.len())?;
        self.writer.write_all(bytes)?;
        self.position += bytes.len() as u64;

        let offset = self.position % BUNDLE_ALIGNMENT;
        if offset > 0 {
            let padding = (BUNDLE_ALIGNMENT - offset) as usize;
            self.writer.write_all(&PADDING[..padding])?;
            self.position += padding as u64;
        }
        Ok(())
    }
}
