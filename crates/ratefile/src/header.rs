//! Header validation and rendering.
//!
//! The header is the fixed [`HEADER_LEN`]-byte prefix of the file. It names
//! the format version, carries the rate-file tag and declares how many bytes
//! the body expands to. Validation checks all three before any body byte is
//! decompressed.

use log::debug;
use ratefile_buffers::{Reader, Writer};

use crate::error::{RateFileError, Result};
use crate::layout::{FormatVersion, Layout, HEADER_LEN, VERSION_OFFSET};
use crate::model::{BandCategory, RateFileHeader};
use crate::rle;

/// A validated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub header: RateFileHeader,
    /// Decompressed body length declared by the header.
    pub body_len: usize,
    /// Compressed body length, i.e. the file length minus the header.
    pub compressed_len: usize,
}

impl HeaderInfo {
    pub fn layout(&self) -> &'static Layout {
        self.header.version.layout()
    }
}

/// Validates the header of a complete rate file.
pub fn validate(file: &[u8]) -> Result<HeaderInfo> {
    if file.len() < HEADER_LEN {
        return Err(RateFileError::TruncatedData {
            offset: 0,
            needed: HEADER_LEN,
            available: file.len(),
        });
    }
    let prefix = &file[..HEADER_LEN];

    let version_byte = prefix[VERSION_OFFSET];
    let version = FormatVersion::from_byte(version_byte).ok_or(RateFileError::InvalidFormat {
        field: "version",
        offset: VERSION_OFFSET,
        found: version_byte,
    })?;
    let layout = version.layout();

    let tag = prefix[layout.tag];
    if tag != layout.tag_value {
        return Err(RateFileError::InvalidFormat {
            field: "rate file tag",
            offset: layout.tag,
            found: tag,
        });
    }

    let mut reader = Reader::at(prefix, layout.body_len);
    let declared = reader.u32_le()? as usize;
    let body = &file[HEADER_LEN..];
    let actual = rle::decoded_len(body).map_err(|err| shift(err, HEADER_LEN))?;
    if declared != actual {
        return Err(RateFileError::SizeMismatch { declared, actual });
    }

    reader.seek(layout.home_npa);
    let home_npa = read_code(reader.buf(layout.home_width)?);
    reader.seek(layout.home_nxx);
    let home_nxx = read_code(reader.buf(layout.home_width)?);

    reader.seek(layout.band_counts);
    let mut band_counts = [0u8; BandCategory::COUNT];
    band_counts.copy_from_slice(reader.buf(BandCategory::COUNT)?);

    reader.seek(layout.description);
    let description_len = reader.u8()?;
    if description_len as usize > layout.description_max {
        return Err(RateFileError::InvalidFormat {
            field: "description length",
            offset: layout.description,
            found: description_len,
        });
    }
    let description_len = description_len as usize;
    let description = read_text(reader.buf(description_len)?);

    debug!(
        "rate file header: {version:?}, body {declared} bytes ({} compressed)",
        body.len()
    );

    Ok(HeaderInfo {
        header: RateFileHeader {
            version,
            home_npa,
            home_nxx,
            band_counts,
            description,
        },
        body_len: declared,
        compressed_len: body.len(),
    })
}

/// Renders the header prefix for a body that expands to `body_len` bytes.
pub fn render(header: &RateFileHeader, body_len: usize) -> Result<Vec<u8>> {
    let layout = header.version.layout();
    check(header, layout)?;
    let body_len = u32::try_from(body_len).map_err(|_| RateFileError::FieldTooLong {
        field: "body length",
        max: u32::MAX as usize,
        actual: body_len,
    })?;

    let mut writer = Writer::with_len(HEADER_LEN);
    writer.set_u8(VERSION_OFFSET, header.version.byte());
    writer.set_u32_le(layout.body_len, body_len);
    writer.set_buf(layout.home_npa, &write_text(&header.home_npa));
    writer.set_buf(layout.home_nxx, &write_text(&header.home_nxx));
    writer.set_u8(layout.tag, layout.tag_value);
    writer.set_buf(layout.band_counts, &header.band_counts);
    let description = write_text(&header.description);
    writer.set_u8(layout.description, description.len() as u8);
    writer.set_buf(layout.description + 1, &description);
    Ok(writer.flush())
}

/// Checks the header's text fields against their widths.
pub(crate) fn check(header: &RateFileHeader, layout: &Layout) -> Result<()> {
    check_width("home NPA", &header.home_npa, layout.home_width)?;
    check_width("home NXX", &header.home_nxx, layout.home_width)?;
    check_width("description", &header.description, layout.description_max)
}

fn check_width(field: &'static str, text: &str, max: usize) -> Result<()> {
    let actual = text.chars().count();
    if actual > max {
        return Err(RateFileError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

/// Fixed-width code field, ending at the first NUL.
fn read_code(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    read_text(&bytes[..end])
}

/// ASCII text of exactly `bytes.len()` bytes. Other bytes become `?`.
fn read_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

fn write_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

fn shift(err: RateFileError, by: usize) -> RateFileError {
    match err {
        RateFileError::TruncatedData {
            offset,
            needed,
            available,
        } => RateFileError::TruncatedData {
            offset: offset + by,
            needed,
            available,
        },
        other => other,
    }
}
