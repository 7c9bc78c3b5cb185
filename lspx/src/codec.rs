//! Atlas codec seam
//!
//! The decoder never touches pixel data itself. Each ATLS payload goes through
//! three collaborator steps, in order:
//!
//! 1. [`AtlasCodec::decompress`] - compressed payload → encoded image bytes
//! 2. [`AtlasCodec::load_image`] - encoded image bytes → host image
//! 3. [`AtlasCodec::upload_texture`] - host image → texture owned by the bundle
//!
//! A failure in any step fails the whole load.

use std::fmt;

/// Codec for turning an ATLS payload into a texture
pub trait AtlasCodec {
    /// Decoded (CPU-side) image
    type Image;
    /// Texture handed to the renderer; owned by the [`crate::Bundle`]
    type Texture;
    /// Error for any codec step
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decompress a chunk payload into encoded image bytes
    fn decompress(&mut self, compressed: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Decode image bytes. `format_hint` is a file extension such as `".png"`.
    fn load_image(&mut self, format_hint: &str, raw: &[u8]) -> Result<Self::Image, Self::Error>;

    /// Turn a decoded image into a texture
    fn upload_texture(&mut self, image: Self::Image) -> Result<Self::Texture, Self::Error>;
}

/// Which codec step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecStage {
    Decompress,
    LoadImage,
    Upload,
}

impl fmt::Display for CodecStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecStage::Decompress => write!(f, "decompress"),
            CodecStage::LoadImage => write!(f, "image load"),
            CodecStage::Upload => write!(f, "texture upload"),
        }
    }
}
