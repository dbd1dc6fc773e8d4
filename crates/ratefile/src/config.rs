//! Codec options.

use serde::Deserialize;

/// Knobs for decoding and encoding.
///
/// Deserializable with every field optional, so a partial JSON or TOML
/// document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Reject files whose per-category price counts do not add up to the
    /// total price count. When off, entries past the category sum are
    /// filed under `Misc`.
    pub strict_price_counts: bool,
    /// Byte used to pad NXX tables shorter than full width.
    pub nxx_fill: u8,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict_price_counts: true,
            nxx_fill: 0x00,
        }
    }
}
