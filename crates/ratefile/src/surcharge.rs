//! Surcharge block: six surcharge kinds for each of the eight band
//! categories, stored kind-major.

use ratefile_buffers::{Reader, Writer};

use crate::error::Result;
use crate::layout::Layout;
use crate::model::{BandCategory, Rate, Surcharge, SurchargeTable};

/// Byte width of the surcharge block.
pub const BLOCK_LEN: usize = Surcharge::KINDS * BandCategory::COUNT;

fn position(layout: &Layout, kind: usize, band: usize) -> usize {
    layout.surcharges + kind * BandCategory::COUNT + band
}

pub fn decode(body: &[u8], layout: &Layout) -> Result<SurchargeTable> {
    let mut reader = Reader::at(body, layout.surcharges);
    let block = reader.buf(BLOCK_LEN)?;
    let mut table = SurchargeTable::default();
    for band in 0..BandCategory::COUNT {
        let mut values = [Rate::default(); Surcharge::KINDS];
        for (kind, value) in values.iter_mut().enumerate() {
            *value = Rate(block[kind * BandCategory::COUNT + band]);
        }
        table.bands[band] = Surcharge::from_array(values);
    }
    Ok(table)
}

pub fn encode(table: &SurchargeTable, body: &mut Writer, layout: &Layout) {
    for (band, surcharge) in table.bands.iter().enumerate() {
        for (kind, value) in surcharge.to_array().into_iter().enumerate() {
            body.set_u8(position(layout, kind, band), value.0);
        }
    }
}
