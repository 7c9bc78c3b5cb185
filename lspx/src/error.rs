//! Error types for bundle decoding, lookup, and configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecStage;

/// Failure of a single bundle load.
///
/// Every variant is fatal to the load that produced it and to nothing else.
/// [`crate::Bundle::load`] swallows these into an empty bundle; use
/// [`crate::Bundle::try_load`] to see the cause.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bundle file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("bad bundle header: expected {expected:?}, found {found:?}")]
    BadHeader { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported bundle version {0} (supported: 1, 2)")]
    UnsupportedVersion(i32),

    #[error("truncated input at offset {offset:#x} (need {need} bytes, have {have})")]
    TruncatedInput { offset: u64, need: u64, have: u64 },

    #[error("negative {field} ({value}) at offset {offset:#x}")]
    NegativeField {
        field: &'static str,
        value: i32,
        offset: u64,
    },

    #[error("{kind} count mismatch: declared {declared}, decoded {decoded}")]
    CountMismatch {
        kind: &'static str,
        declared: usize,
        decoded: usize,
    },

    #[error("unknown chunk tag {tag:?} at offset {offset:#x}")]
    UnknownChunkTag { tag: [u8; 4], offset: u64 },

    #[error("invalid sprite name at offset {offset:#x}: {reason}")]
    InvalidName { offset: u64, reason: String },

    #[error("sprite {name:?} references atlas {atlas_index}, bundle has {atlas_count}")]
    AtlasIndexOutOfRange {
        name: String,
        atlas_index: i32,
        atlas_count: usize,
    },

    #[error("atlas {atlas} codec failure during {stage}: {source}")]
    CodecFailure {
        atlas: usize,
        stage: CodecStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BundleError>;

/// Sprite registry lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No sprite with that name
    #[error("sprite not found")]
    NotFound,
    /// Registry searched before it was sorted
    #[error("sprite registry is not finalized")]
    NotReady,
}

/// Loader configuration could not be parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid loader config: {0}")]
    Toml(#[from] toml::de::Error),
}
