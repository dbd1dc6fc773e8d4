//! NXX table.
//!
//! Records are 103 bytes: price band, dial pattern, flags and a 100-byte
//! exchange bitmap. The count sits at a fixed body offset and the first
//! record at the offset named by the NXX base pointer.

use log::debug;
use ratefile_buffers::{Reader, Writer};

use crate::config::CodecOptions;
use crate::error::{RateFileError, Result};
use crate::layout::Layout;
use crate::model::{DialPlan, NxxEntry, NxxTable};
use crate::price::check_count;

const TABLE: &str = "NXX table";

pub fn decode(body: &[u8], layout: &Layout) -> Result<NxxTable> {
    let mut reader = Reader::at(body, layout.nxx_count);
    let count = reader.u8()? as usize;
    reader.seek(layout.nxx_base);
    let base = reader.u16_le()? as usize;

    let fits = body.len().saturating_sub(base) / layout.nxx_width;
    if count > fits {
        return Err(RateFileError::CountMismatch {
            table: TABLE,
            offset: base,
            declared: count,
            found: fits,
        });
    }

    let mut entries = Vec::with_capacity(count);
    reader.seek(base);
    for _ in 0..count {
        let price_band = reader.u8()?;
        let dial_pattern = DialPlan::from(reader.u8()?);
        let flags = reader.u8()?;
        let table = reader.buf(layout.nxx_table_len)?.to_vec();
        entries.push(NxxEntry {
            price_band,
            dial_pattern,
            flags,
            table,
        });
    }
    debug!("decoded {count} NXX records at offset {base}");
    Ok(NxxTable { entries })
}

/// Writes the count, the base pointer and the records. Returns the body
/// offset just past the last record.
pub fn encode(
    nxx: &NxxTable,
    body: &mut Writer,
    layout: &Layout,
    base: usize,
    options: &CodecOptions,
) -> Result<usize> {
    check(nxx, layout)?;
    let pointer = u16::try_from(base).map_err(|_| RateFileError::FieldTooLong {
        field: "NXX table base",
        max: u16::MAX as usize,
        actual: base,
    })?;

    body.set_u8(layout.nxx_count, nxx.len() as u8);
    body.set_u16_le(layout.nxx_base, pointer);
    body.seek(base);
    for entry in nxx.iter() {
        body.u8(entry.price_band);
        body.u8(entry.dial_pattern.into());
        body.u8(entry.flags);
        body.buf(&entry.table);
        body.fill(options.nxx_fill, layout.nxx_table_len - entry.table.len());
    }
    Ok(base + nxx.len() * layout.nxx_width)
}

/// Checks the record count and every table width before anything is
/// written.
pub(crate) fn check(nxx: &NxxTable, layout: &Layout) -> Result<()> {
    check_count("NXX count", nxx.len())?;
    for entry in nxx.iter() {
        if entry.table.len() > layout.nxx_table_len {
            return Err(RateFileError::FieldTooLong {
                field: "NXX table",
                max: layout.nxx_table_len,
                actual: entry.table.len(),
            });
        }
    }
    Ok(())
}
