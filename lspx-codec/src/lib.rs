//! Default atlas codec for LSPX bundles
//!
//! ATLS payloads are LZ4 blocks with the uncompressed size prepended
//! (`lz4_flex` framing). The decompressed bytes are an encoded image, PNG
//! unless the loader is configured otherwise, and are decoded to RGBA8.
//!
//! "Upload" here produces a CPU-side [`PackedAtlas`]. Hosts with a GPU
//! implement [`lspx::AtlasCodec`] themselves and upload in the last step.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use lspx::AtlasCodec;
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use thiserror::Error;
use tracing::trace;

/// Errors from the default codec
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("LZ4 decompression failed: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("unknown image format hint {0:?}")]
    UnknownFormat(String),
}

/// Decoded RGBA8 atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedAtlas {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub data: Vec<u8>,
}

impl PackedAtlas {
    /// RGBA of the pixel at (x, y), or `None` outside the atlas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?
            .checked_mul(4)?;
        let px = self.data.get(offset..offset.checked_add(4)?)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// LZ4 + image-crate codec producing [`PackedAtlas`] textures
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4ImageCodec;

impl Lz4ImageCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Map a hint such as `".png"` or `"png"` to an image format
pub fn format_from_hint(hint: &str) -> Result<ImageFormat, CodecError> {
    ImageFormat::from_extension(hint.trim_start_matches('.'))
        .ok_or_else(|| CodecError::UnknownFormat(hint.to_string()))
}

impl AtlasCodec for Lz4ImageCodec {
    type Image = RgbaImage;
    type Texture = PackedAtlas;
    type Error = CodecError;

    fn decompress(&mut self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let raw = decompress_size_prepended(compressed)?;
        trace!(compressed = compressed.len(), raw = raw.len(), "Decompressed atlas payload");
        Ok(raw)
    }

    fn load_image(&mut self, format_hint: &str, raw: &[u8]) -> Result<RgbaImage, CodecError> {
        let format = format_from_hint(format_hint)?;
        let image = image::load_from_memory_with_format(raw, format)?;
        Ok(image.to_rgba8())
    }

    fn upload_texture(&mut self, image: RgbaImage) -> Result<PackedAtlas, CodecError> {
        let (width, height) = image.dimensions();
        Ok(PackedAtlas {
            width,
            height,
            data: image.into_raw(),
        })
    }
}

/// Encode an atlas image as an ATLS payload (PNG, then LZ4 size-prepended)
pub fn encode_atlas_payload(image: &RgbaImage) -> Result<Vec<u8>, CodecError> {
    let mut png_bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;
    Ok(compress_prepend_size(&png_bytes))
}
