//! Decoder and encoder for Elcotel payphone rate files (`.R94`).
//!
//! A rate file is a fixed 268-byte header followed by a body compressed
//! with a zero-run scheme. The decompressed body holds the surcharge block,
//! the price table, the intrastate NPA groups and the NXX table at offsets
//! given by the version's [`Layout`].
//!
//! # Overview
//!
//! - [`header`] - header validation and rendering
//! - [`rle`] - the zero-run compression transform
//! - [`surcharge`], [`price`], [`group`], [`nxx`] - table decoders and encoders
//! - [`codec`] - whole-file read/write, file paths and JSON interchange
//!
//! # Example
//!
//! ```
//! use elcotel_ratefile::{
//!     decode, encode, BandCategory, Group, PriceEntry, Rate, RateFile,
//! };
//!
//! let rate_file = RateFile::builder()
//!     .home_npa("716")
//!     .home_nxx("555")
//!     .description("Lobby phone")
//!     .price(
//!         BandCategory::Local,
//!         PriceEntry {
//!             initial_rate: Rate(5),
//!             initial_time: 3,
//!             additional_rate: Rate(2),
//!             additional_time: 1,
//!         },
//!     )
//!     .group(Group { npa: 716, ..Default::default() })
//!     .build()?;
//!
//! let bytes = encode(&rate_file)?;
//! assert_eq!(decode(&bytes)?, rate_file);
//! # Ok::<(), elcotel_ratefile::RateFileError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod group;
pub mod header;
pub mod layout;
pub mod model;
pub mod nxx;
pub mod price;
pub mod rle;
pub mod surcharge;

pub use codec::{
    decode, decode_with, encode, encode_with, from_json, read_file, read_file_with,
    read_json_file, to_json, write_file, write_file_with, write_json_file, ReadState, WriteState,
};
pub use config::CodecOptions;
pub use error::{RateFileError, Result};
pub use header::HeaderInfo;
pub use layout::{FormatVersion, Layout, HEADER_LEN};
pub use model::{
    BandCategory, DialPlan, Group, GroupTable, NxxEntry, NxxTable, PriceEntry, PriceTable, Rate,
    RateFile, RateFileBuilder, RateFileHeader, Surcharge, SurchargeTable,
};
