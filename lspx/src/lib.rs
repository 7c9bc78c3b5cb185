//! LSPX: sprite bundle decoder for packed texture atlases
//!
//! An LSPX bundle is a chunked binary container holding one or more compressed
//! atlas images plus named sprite regions inside those atlases. This crate
//! decodes the container into a [`Bundle`], an immutable, name-indexed view of
//! the sprites with the decoded atlas textures attached.
//!
//! Image decompression and texture upload are **not** done here. They go
//! through the [`AtlasCodec`] trait; `lspx-codec` provides the default
//! LZ4 + PNG implementation.
//!
//! # Wire Format
//!
//! All scalars are 4 bytes, little-endian. `align` pads to the next 4-byte
//! boundary measured from the start of the file and follows every
//! variable-length byte field.
//!
//! ```text
//! Header: "LSPX" version:i32 atlas_count:i32 sprite_count:i32 reserved:i32
//! Chunks (repeat until "BEOF"):
//!   "SPRT" frame_count:i32 [frame_speed:f32 if version >= 2]
//!          atlas_name_len:i32 atlas_name[..] align
//!          atlas_index:i32 name_len:i32 name[..] align
//!          source.x source.y source.w source.h origin.x origin.y  (f32 each)
//!   "ATLS" sprite_count:i32 name_len:i32 name[..] align
//!          payload_size:i32 payload[..] align
//!   "BEOF"
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lspx::Bundle;
//! use lspx_codec::Lz4ImageCodec;
//!
//! let mut codec = Lz4ImageCodec::default();
//! let bundle = Bundle::load("example.lspx", &mut codec);
//!
//! if bundle.is_ready() {
//!     let hero = bundle.get_sprite_index("hero").unwrap();
//!     println!("hero is {:?}", bundle.sprite_size(hero));
//! }
//! ```

pub mod atlas;
pub mod bundle;
pub mod chunk;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod draw;
pub mod error;
pub mod reader;
pub mod registry;
pub mod sprite;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use atlas::{AtlasImage, AtlasStore};
pub use bundle::Bundle;
pub use chunk::{AtlasChunk, BundleHeader, ChunkTag, SchemaVersion, SpriteChunk};
pub use codec::{AtlasCodec, CodecStage};
pub use config::{LoaderConfig, NameComparison, UnknownChunkPolicy};
pub use decoder::{BundleDecoder, DecoderState};
pub use draw::{Color, DrawCommand, SpriteRenderer};
pub use error::{BundleError, ConfigError, LookupError, Result};
pub use reader::ChunkReader;
pub use registry::SpriteRegistry;
pub use sprite::{Rect, Sprite};
pub use writer::BundleWriter;

// Re-export glam's vector type used throughout the public API
pub use glam::Vec2;

/// Bundle header tag
pub const BUNDLE_MAGIC: &[u8; 4] = b"LSPX";

/// End-of-bundle tag
pub const END_TAG: &[u8; 4] = b"BEOF";

/// Atlas chunk tag
pub const ATLAS_TAG: &[u8; 4] = b"ATLS";

/// Sprite chunk tag
pub const SPRITE_TAG: &[u8; 4] = b"SPRT";

/// Every variable-length field is padded to this boundary (absolute file offset)
pub const BUNDLE_ALIGNMENT: u64 = 4;

/// Number of leading name bytes that take part in legacy name comparison.
///
/// Two names sharing this many leading bytes compare equal under
/// [`NameComparison::Truncated`].
pub const MAX_COMPARABLE_NAME_LENGTH: usize = 128;
