//! Field positions for each supported rate file version.
//!
//! Header offsets are absolute file offsets. Body offsets address the
//! decompressed body, which starts right after the header.

use serde::{Deserialize, Serialize};

/// Length of the fixed header prefix.
pub const HEADER_LEN: usize = 268;

/// Offset of the version byte. Fixed across versions so that the layout
/// can be chosen from it.
pub const VERSION_OFFSET: usize = 0;

/// Known rate file format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatVersion {
    #[default]
    R94,
}

impl FormatVersion {
    pub const ALL: [FormatVersion; 1] = [FormatVersion::R94];

    /// Byte stored at [`VERSION_OFFSET`].
    pub const fn byte(self) -> u8 {
        match self {
            FormatVersion::R94 => 0x00,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.byte() == byte)
    }

    pub fn layout(self) -> &'static Layout {
        Layout::for_version(self)
    }
}

/// Offset table of one format version.
#[derive(Debug, PartialEq, Eq)]
pub struct Layout {
    // Header (file offsets).
    /// Declared decompressed body length, `u32` little-endian.
    pub body_len: usize,
    pub home_npa: usize,
    pub home_nxx: usize,
    /// Width of the home NPA and home NXX fields.
    pub home_width: usize,
    pub tag: usize,
    /// Value the tag byte must hold in a rate file.
    pub tag_value: u8,
    pub band_counts: usize,
    /// Length byte, followed by the description text.
    pub description: usize,
    pub description_max: usize,

    // Body (decompressed offsets).
    pub surcharges: usize,
    pub price_counts: usize,
    /// `u16` little-endian pointer to the first price entry.
    pub price_base: usize,
    /// `u16` little-endian pointer to the first NXX record.
    pub nxx_base: usize,
    pub group_count: usize,
    pub price_count: usize,
    pub nxx_count: usize,
    pub groups: usize,
    pub group_width: usize,
    pub price_width: usize,
    pub nxx_width: usize,
    /// Width of the exchange bitmap inside an NXX record.
    pub nxx_table_len: usize,
    /// Smallest body that holds every fixed field.
    pub min_body_len: usize,
}

static R94: Layout = Layout {
    body_len: 1,
    home_npa: 18,
    home_nxx: 21,
    home_width: 3,
    tag: 24,
    tag_value: 0x01,
    band_counts: 152,
    description: 209,
    description_max: HEADER_LEN - 209 - 1,

    surcharges: 800,
    price_counts: 864,
    price_base: 877,
    nxx_base: 879,
    group_count: 887,
    price_count: 888,
    nxx_count: 889,
    groups: 890,
    group_width: 6,
    price_width: 4,
    nxx_width: 103,
    nxx_table_len: 100,
    min_body_len: 890,
};

impl Layout {
    pub fn for_version(version: FormatVersion) -> &'static Layout {
        match version {
            FormatVersion::R94 => &R94,
        }
    }
}
