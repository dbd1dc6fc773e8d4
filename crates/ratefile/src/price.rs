//! Price table.
//!
//! Eight per-category counts, a total count and a pointer to the first
//! entry live at fixed body offsets. Entries are four bytes each: initial
//! rate, initial time, additional rate, additional time. They are stored
//! category after category, so the counts decide which category an entry
//! belongs to.

use log::{debug, warn};
use ratefile_buffers::{Reader, Writer};

use crate::config::CodecOptions;
use crate::error::{RateFileError, Result};
use crate::layout::Layout;
use crate::model::{BandCategory, PriceEntry, PriceTable, Rate};

const TABLE: &str = "price table";

pub fn decode(body: &[u8], layout: &Layout, options: &CodecOptions) -> Result<PriceTable> {
    let mut reader = Reader::at(body, layout.price_counts);
    let mut counts = [0usize; BandCategory::COUNT];
    for count in counts.iter_mut() {
        *count = reader.u8()? as usize;
    }
    reader.seek(layout.price_base);
    let base = reader.u16_le()? as usize;
    reader.seek(layout.price_count);
    let total = reader.u8()? as usize;

    let sum: usize = counts.iter().sum();
    if sum != total {
        if options.strict_price_counts {
            return Err(RateFileError::CountMismatch {
                table: TABLE,
                offset: layout.price_count,
                declared: total,
                found: sum,
            });
        }
        warn!("price category counts sum to {sum} but {total} entries are declared");
    }

    let fits = body.len().saturating_sub(base) / layout.price_width;
    if total > fits {
        return Err(RateFileError::CountMismatch {
            table: TABLE,
            offset: base,
            declared: total,
            found: fits,
        });
    }

    let mut table = PriceTable::new();
    reader.seek(base);
    for i in 0..total {
        let record = reader.buf(layout.price_width)?;
        let entry = PriceEntry {
            initial_rate: Rate(record[0]),
            initial_time: record[1],
            additional_rate: Rate(record[2]),
            additional_time: record[3],
        };
        table.push(category_of(i, &counts), entry);
    }
    debug!("decoded {total} price entries at offset {base}");
    Ok(table)
}

/// Category of the `index`-th stored entry. Entries past the category sum
/// fall into `Misc`.
fn category_of(index: usize, counts: &[usize; BandCategory::COUNT]) -> BandCategory {
    let mut end = 0;
    for (category, count) in BandCategory::ALL.into_iter().zip(counts) {
        end += count;
        if index < end {
            return category;
        }
    }
    BandCategory::Misc
}

/// Writes the counts, the base pointer and the entries. Returns the body
/// offset just past the last entry.
pub fn encode(prices: &PriceTable, body: &mut Writer, layout: &Layout, base: usize) -> Result<usize> {
    check(prices)?;
    let pointer = u16::try_from(base).map_err(|_| RateFileError::FieldTooLong {
        field: "price table base",
        max: u16::MAX as usize,
        actual: base,
    })?;

    for (i, count) in prices.counts().into_iter().enumerate() {
        body.set_u8(layout.price_counts + i, count as u8);
    }
    body.set_u8(layout.price_count, prices.len() as u8);
    body.set_u16_le(layout.price_base, pointer);

    body.seek(base);
    for (_, entry) in prices.iter() {
        body.buf(&[
            entry.initial_rate.0,
            entry.initial_time,
            entry.additional_rate.0,
            entry.additional_time,
        ]);
    }
    Ok(base + prices.len() * layout.price_width)
}

pub(crate) fn check(prices: &PriceTable) -> Result<()> {
    for count in prices.counts() {
        check_count("price category count", count)?;
    }
    check_count("price count", prices.len())
}

pub(crate) fn check_count(field: &'static str, count: usize) -> Result<()> {
    if count > u8::MAX as usize {
        return Err(RateFileError::FieldTooLong {
            field,
            max: u8::MAX as usize,
            actual: count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FormatVersion;

    fn body_with(counts: [u8; 8], total: u8, base: u16, entries: &[[u8; 4]]) -> Vec<u8> {
        let layout = FormatVersion::R94.layout();
        let mut w = Writer::with_len(layout.min_body_len);
        w.set_buf(layout.price_counts, &counts);
        w.set_u8(layout.price_count, total);
        w.set_u16_le(layout.price_base, base);
        w.seek(base as usize);
        for e in entries {
            w.buf(e);
        }
        w.flush()
    }

    #[test]
    fn decode_assigns_categories_by_count() {
        let layout = FormatVersion::R94.layout();
        let body = body_with(
            [1, 0, 2, 0, 0, 0, 0, 0],
            3,
            900,
            &[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]],
        );
        let table = decode(&body, layout, &CodecOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get(BandCategory::Local),
            &[PriceEntry {
                initial_rate: Rate(1),
                initial_time: 2,
                additional_rate: Rate(3),
                additional_time: 4,
            }]
        );
        let inter = table.get(BandCategory::InterLata);
        assert_eq!(inter.len(), 2);
        assert_eq!(inter[1].additional_time, 12);
        assert!(table.get(BandCategory::IntraLata).is_empty());
    }

    #[test]
    fn strict_counts_reject_sum_mismatch() {
        let layout = FormatVersion::R94.layout();
        let body = body_with([1, 0, 0, 0, 0, 0, 0, 0], 2, 900, &[[1; 4], [2; 4]]);
        let err = decode(&body, layout, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RateFileError::CountMismatch {
                declared: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn lenient_counts_file_overflow_under_misc() {
        let layout = FormatVersion::R94.layout();
        let body = body_with([1, 0, 0, 0, 0, 0, 0, 0], 2, 900, &[[1; 4], [2; 4]]);
        let options = CodecOptions {
            strict_price_counts: false,
            ..Default::default()
        };
        let table = decode(&body, layout, &options).unwrap();
        assert_eq!(table.get(BandCategory::Local).len(), 1);
        assert_eq!(table.get(BandCategory::Misc)[0].initial_rate, Rate(2));
    }

    #[test]
    fn entries_past_end_are_a_count_mismatch() {
        let layout = FormatVersion::R94.layout();
        let body = body_with([3, 0, 0, 0, 0, 0, 0, 0], 3, 900, &[[1; 4], [2; 4]]);
        assert_eq!(body.len(), 908);
        let err = decode(&body, layout, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RateFileError::CountMismatch {
                offset: 900,
                declared: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn encode_then_decode() {
        let layout = FormatVersion::R94.layout();
        let mut prices = PriceTable::new();
        prices.push(
            BandCategory::Canadian,
            PriceEntry {
                initial_rate: Rate(40),
                initial_time: 3,
                additional_rate: Rate(10),
                additional_time: 1,
            },
        );
        prices.push(BandCategory::Local, PriceEntry::default());
        let mut body = Writer::with_len(layout.min_body_len);
        let end = encode(&prices, &mut body, layout, layout.groups).unwrap();
        assert_eq!(end, layout.groups + 8);
        let bytes = body.flush();
        assert_eq!(bytes[layout.price_count], 2);
        assert_eq!(&bytes[layout.groups + 4..end], &[40, 3, 10, 1]);
        assert_eq!(decode(&bytes, layout, &CodecOptions::default()).unwrap(), prices);
    }

    #[test]
    fn too_many_entries_in_a_category() {
        let mut prices = PriceTable::new();
        for _ in 0..256 {
            prices.push(BandCategory::Local, PriceEntry::default());
        }
        assert!(matches!(
            check(&prices),
            Err(RateFileError::FieldTooLong {
                field: "price category count",
                actual: 256,
                ..
            })
        ));
    }
}
