//! Loader configuration

use std::cmp::Ordering;

use serde::Deserialize;

use crate::MAX_COMPARABLE_NAME_LENGTH;
use crate::error::ConfigError;

/// How sprite names are ordered and matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameComparison {
    /// Ordinal byte comparison of the first [`MAX_COMPARABLE_NAME_LENGTH`] bytes.
    ///
    /// Names sharing a 128-byte prefix collide. This is what existing bundles
    /// were sorted with.
    #[default]
    Truncated,
    /// Ordinal byte comparison of the whole name
    Full,
}

impl NameComparison {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            NameComparison::Truncated => truncated(a).cmp(truncated(b)),
            NameComparison::Full => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

fn truncated(name: &str) -> &[u8] {
    let bytes = name.as_bytes();
    &bytes[..bytes.len().min(MAX_COMPARABLE_NAME_LENGTH)]
}

/// What to do with a chunk tag that is not SPRT, ATLS or BEOF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownChunkPolicy {
    /// Fail the load with `UnknownChunkTag`
    #[default]
    Fail,
    /// Discard the 4 tag bytes and read the next tag (legacy loader behavior)
    Skip,
}

/// Bundle loader configuration
///
/// Can be embedded in a host's TOML config:
///
/// ```toml
/// name_comparison = "full"
/// unknown_chunks = "skip"
/// image_format_hint = ".png"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Comparator used to sort and search sprite names
    pub name_comparison: NameComparison,
    /// Handling of unrecognized chunk tags
    pub unknown_chunks: UnknownChunkPolicy,
    /// File extension passed to [`crate::AtlasCodec::load_image`]
    pub image_format_hint: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            name_comparison: NameComparison::Truncated,
            unknown_chunks: UnknownChunkPolicy::Fail,
            image_format_hint: ".png".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
