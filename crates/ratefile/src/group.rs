//! Intrastate NPA groups.
//!
//! A one-byte count is followed by six-byte records starting at a fixed
//! body offset: NPA (`u16` little-endian), NXX count, band, dial plan and
//! initial price.

use log::debug;
use ratefile_buffers::{Reader, Writer};

use crate::error::{RateFileError, Result};
use crate::layout::Layout;
use crate::model::{DialPlan, Group, GroupTable, Rate};
use crate::price::check_count;

const TABLE: &str = "group table";

/// Decodes the group block. A record whose NPA was already seen is
/// dropped, even when its parameters differ from the first one.
pub fn decode(body: &[u8], layout: &Layout) -> Result<GroupTable> {
    let mut reader = Reader::at(body, layout.group_count);
    let count = reader.u8()? as usize;

    let fits = body.len().saturating_sub(layout.groups) / layout.group_width;
    if count > fits {
        return Err(RateFileError::CountMismatch {
            table: TABLE,
            offset: layout.groups,
            declared: count,
            found: fits,
        });
    }

    let mut table = GroupTable::new();
    reader.seek(layout.groups);
    for _ in 0..count {
        let at = reader.x;
        let npa = reader.u16_le()?;
        let record = reader.buf(layout.group_width - 2)?;
        let group = Group {
            npa,
            nxx_count: record[0],
            band: record[1],
            dial_plan: DialPlan::from(record[2]),
            initial_price: Rate(record[3]),
        };
        if !table.insert_if_absent(group) {
            debug!("discarding duplicate group for NPA {npa} at offset {at}");
        }
    }
    debug!("decoded {} groups from {count} records", table.len());
    Ok(table)
}

/// Writes the count and the records in insertion order. Returns the body
/// offset just past the last record.
pub fn encode(groups: &GroupTable, body: &mut Writer, layout: &Layout) -> Result<usize> {
    check(groups)?;
    body.set_u8(layout.group_count, groups.len() as u8);
    body.seek(layout.groups);
    for group in groups.iter() {
        body.u16_le(group.npa);
        body.buf(&[
            group.nxx_count,
            group.band,
            group.dial_plan.into(),
            group.initial_price.0,
        ]);
    }
    Ok(layout.groups + groups.len() * layout.group_width)
}

pub(crate) fn check(groups: &GroupTable) -> Result<()> {
    check_count("group count", groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FormatVersion;

    fn body_with(records: &[[u8; 6]]) -> Vec<u8> {
        let layout = FormatVersion::R94.layout();
        let mut w = Writer::with_len(layout.min_body_len);
        w.set_u8(layout.group_count, records.len() as u8);
        w.seek(layout.groups);
        for r in records {
            w.buf(r);
        }
        w.flush()
    }

    #[test]
    fn decode_records() {
        let layout = FormatVersion::R94.layout();
        let body = body_with(&[[0xcc, 0x02, 12, 1, 3, 20]]);
        let table = decode(&body, layout).unwrap();
        assert_eq!(
            table.get(716),
            Some(&Group {
                npa: 716,
                nxx_count: 12,
                band: 1,
                dial_plan: DialPlan::OnePlusTenDigit,
                initial_price: Rate(20),
            })
        );
    }

    #[test]
    fn duplicate_npa_keeps_first_record() {
        let layout = FormatVersion::R94.layout();
        let body = body_with(&[
            [0xcc, 0x02, 12, 1, 3, 20],
            [0x50, 0x02, 1, 1, 1, 1],
            [0xcc, 0x02, 99, 7, 0, 40],
        ]);
        let table = decode(&body, layout).unwrap();
        assert_eq!(table.len(), 2);
        let kept = table.get(716).unwrap();
        assert_eq!(kept.nxx_count, 12);
        assert_eq!(kept.initial_price, Rate(20));
        let order: Vec<u16> = table.iter().map(|g| g.npa).collect();
        assert_eq!(order, vec![716, 592]);
    }

    #[test]
    fn count_past_end() {
        let layout = FormatVersion::R94.layout();
        let mut body = body_with(&[[1; 6]]);
        body[layout.group_count] = 2;
        assert!(matches!(
            decode(&body, layout),
            Err(RateFileError::CountMismatch {
                declared: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn encode_in_insertion_order() {
        let layout = FormatVersion::R94.layout();
        let groups: GroupTable = vec![
            Group {
                npa: 905,
                band: 2,
                ..Default::default()
            },
            Group {
                npa: 212,
                dial_plan: DialPlan::Unknown(9),
                ..Default::default()
            },
        ]
        .into();
        let mut body = Writer::with_len(layout.min_body_len);
        let end = encode(&groups, &mut body, layout).unwrap();
        assert_eq!(end, layout.groups + 12);
        let bytes = body.flush();
        assert_eq!(bytes[layout.group_count], 2);
        assert_eq!(&bytes[layout.groups..end], &[0x89, 0x03, 0, 2, 0, 0, 0xd4, 0x00, 0, 0, 9, 0]);
        assert_eq!(decode(&bytes, layout).unwrap(), groups);
    }
}
