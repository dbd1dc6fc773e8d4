//! Structured rate file model.
//!
//! A [`RateFile`] is an immutable value. Decoding produces one; editing goes
//! through [`RateFileBuilder`], which hands back a new value.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::FormatVersion;

/// A one-byte price in units of 5 cents, with two reserved markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(pub u8);

impl Rate {
    pub const FREE: Rate = Rate(0);
    pub const UNLIMITED: Rate = Rate(254);
    pub const RESTRICTED: Rate = Rate(255);

    /// Price in cents, or `None` for the unlimited/restricted markers.
    pub fn cents(self) -> Option<u32> {
        match self {
            Rate::UNLIMITED | Rate::RESTRICTED => None,
            Rate(v) => Some(v as u32 * 5),
        }
    }

    /// Rate for a whole number of cents. Fails unless `cents` is a multiple
    /// of 5 representable by a regular price byte.
    pub fn from_cents(cents: u32) -> Option<Rate> {
        if cents % 5 != 0 {
            return None;
        }
        match u8::try_from(cents / 5) {
            Ok(v) if v < Rate::UNLIMITED.0 => Some(Rate(v)),
            _ => None,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rate::FREE => write!(f, "Free"),
            Rate::UNLIMITED => write!(f, "Unlimited"),
            Rate::RESTRICTED => write!(f, "Restricted"),
            Rate(v) => {
                let cents = v as u32 * 5;
                write!(f, "{}.{:02}", cents / 100, cents % 100)
            }
        }
    }
}

/// Call pricing category. The declaration order is the on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BandCategory {
    Local,
    IntraLata,
    InterLata,
    /// Interstate calls, tariffed by the FCC.
    Interstate,
    Corridor,
    Canadian,
    Extended,
    Misc,
}

impl BandCategory {
    pub const COUNT: usize = 8;

    pub const ALL: [BandCategory; BandCategory::COUNT] = [
        BandCategory::Local,
        BandCategory::IntraLata,
        BandCategory::InterLata,
        BandCategory::Interstate,
        BandCategory::Corridor,
        BandCategory::Canadian,
        BandCategory::Extended,
        BandCategory::Misc,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BandCategory::Local => "Local",
            BandCategory::IntraLata => "IntraLATA",
            BandCategory::InterLata => "InterLATA",
            BandCategory::Interstate => "FCC",
            BandCategory::Corridor => "Corridor",
            BandCategory::Canadian => "Canadian",
            BandCategory::Extended => "Extended",
            BandCategory::Misc => "Misc",
        }
    }
}

impl fmt::Display for BandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dialing pattern. Unrecognized bytes are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DialPlan {
    #[default]
    SevenDigit,
    OnePlusSevenDigit,
    TenDigit,
    OnePlusTenDigit,
    Unknown(u8),
}

impl From<u8> for DialPlan {
    fn from(byte: u8) -> Self {
        match byte {
            0 => DialPlan::SevenDigit,
            1 => DialPlan::OnePlusSevenDigit,
            2 => DialPlan::TenDigit,
            3 => DialPlan::OnePlusTenDigit,
            other => DialPlan::Unknown(other),
        }
    }
}

impl From<DialPlan> for u8 {
    fn from(plan: DialPlan) -> Self {
        match plan {
            DialPlan::SevenDigit => 0,
            DialPlan::OnePlusSevenDigit => 1,
            DialPlan::TenDigit => 2,
            DialPlan::OnePlusTenDigit => 3,
            DialPlan::Unknown(other) => other,
        }
    }
}

impl fmt::Display for DialPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialPlan::SevenDigit => write!(f, "7 digit"),
            DialPlan::OnePlusSevenDigit => write!(f, "1 + 7 digit"),
            DialPlan::TenDigit => write!(f, "10 digit (NPA)"),
            DialPlan::OnePlusTenDigit => write!(f, "1 + 10 digit (NPA)"),
            DialPlan::Unknown(b) => write!(f, "Unknown ({b})"),
        }
    }
}

/// Fixed header fields. Lengths are derived at encode time and are not
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateFileHeader {
    pub version: FormatVersion,
    pub home_npa: String,
    pub home_nxx: String,
    /// Band counts as stored in the header region of the file. Written as
    /// given and never recomputed from the price table.
    pub band_counts: [u8; BandCategory::COUNT],
    pub description: String,
}

/// Surcharges for one band category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Surcharge {
    pub coin: Rate,
    pub paof_bell: Rate,
    pub paof_comm: Rate,
    pub paof_collect: Rate,
    pub paof_additional: Rate,
    pub chip_card: Rate,
}

impl Surcharge {
    pub const KINDS: usize = 6;

    /// Values in on-disk kind order.
    pub fn to_array(self) -> [Rate; Surcharge::KINDS] {
        [
            self.coin,
            self.paof_bell,
            self.paof_comm,
            self.paof_collect,
            self.paof_additional,
            self.chip_card,
        ]
    }

    pub fn from_array(values: [Rate; Surcharge::KINDS]) -> Self {
        let [coin, paof_bell, paof_comm, paof_collect, paof_additional, chip_card] = values;
        Self {
            coin,
            paof_bell,
            paof_comm,
            paof_collect,
            paof_additional,
            chip_card,
        }
    }
}

/// One surcharge set per band category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurchargeTable {
    pub bands: [Surcharge; BandCategory::COUNT],
}

impl SurchargeTable {
    pub fn get(&self, band: BandCategory) -> &Surcharge {
        &self.bands[band.index()]
    }

    pub fn set(&mut self, band: BandCategory, surcharge: Surcharge) {
        self.bands[band.index()] = surcharge;
    }
}

/// One pricing band occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceEntry {
    pub initial_rate: Rate,
    /// Length of the initial period.
    pub initial_time: u8,
    pub additional_rate: Rate,
    /// Length of each additional period.
    pub additional_time: u8,
}

/// Price entries partitioned by band category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceTable {
    categories: [Vec<PriceEntry>; BandCategory::COUNT],
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: BandCategory, entry: PriceEntry) {
        self.categories[category.index()].push(entry);
    }

    pub fn get(&self, category: BandCategory) -> &[PriceEntry] {
        &self.categories[category.index()]
    }

    /// Number of entries in each category, in category order.
    pub fn counts(&self) -> [usize; BandCategory::COUNT] {
        let mut counts = [0; BandCategory::COUNT];
        for (count, entries) in counts.iter_mut().zip(&self.categories) {
            *count = entries.len();
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in file order, tagged with their category.
    pub fn iter(&self) -> impl Iterator<Item = (BandCategory, &PriceEntry)> + '_ {
        BandCategory::ALL
            .into_iter()
            .zip(&self.categories)
            .flat_map(|(category, entries)| entries.iter().map(move |e| (category, e)))
    }
}

/// An intrastate NPA group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    pub npa: u16,
    pub nxx_count: u8,
    pub band: u8,
    pub dial_plan: DialPlan,
    pub initial_price: Rate,
}

/// NPA groups keyed by NPA, remembering insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Group>", into = "Vec<Group>")]
pub struct GroupTable {
    groups: IndexMap<u16, Group>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `group` unless its NPA is already present. Returns `false`
    /// when the group was discarded; the earlier entry is left untouched.
    pub fn insert_if_absent(&mut self, group: Group) -> bool {
        match self.groups.entry(group.npa) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(group);
                true
            }
        }
    }

    pub fn get(&self, npa: u16) -> Option<&Group> {
        self.groups.get(&npa)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values()
    }
}

// IndexMap equality ignores order; re-encoding does not.
impl PartialEq for GroupTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for GroupTable {}

impl From<Vec<Group>> for GroupTable {
    fn from(groups: Vec<Group>) -> Self {
        groups.into_iter().collect()
    }
}

impl From<GroupTable> for Vec<Group> {
    fn from(table: GroupTable) -> Self {
        table.groups.into_values().collect()
    }
}

impl FromIterator<Group> for GroupTable {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        let mut table = GroupTable::new();
        for group in iter {
            table.insert_if_absent(group);
        }
        table
    }
}

/// Per-exchange band attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NxxEntry {
    pub price_band: u8,
    pub dial_pattern: DialPlan,
    pub flags: u8,
    /// Exchange bitmap: bit `j % 8` of byte `j / 8` enables exchange `200 + j`.
    /// A table shorter than 100 bytes is padded with the codec's fill byte on
    /// encode and decodes back at full width.
    pub table: Vec<u8>,
}

impl NxxEntry {
    pub const FIRST_EXCHANGE: u16 = 200;
    pub const LAST_EXCHANGE: u16 = 999;
    pub const TABLE_LEN: usize = 100;

    fn bit(nxx: u16) -> Option<(usize, u8)> {
        if !(Self::FIRST_EXCHANGE..=Self::LAST_EXCHANGE).contains(&nxx) {
            return None;
        }
        let j = (nxx - Self::FIRST_EXCHANGE) as usize;
        Some((j / 8, 1 << (j % 8)))
    }

    pub fn is_enabled(&self, nxx: u16) -> bool {
        match Self::bit(nxx) {
            Some((byte, mask)) => self.table.get(byte).is_some_and(|b| b & mask != 0),
            None => false,
        }
    }

    /// Sets the bit for `nxx`, growing a short table to full width.
    /// Exchanges outside 200..=999 are ignored.
    pub fn set_enabled(&mut self, nxx: u16, enabled: bool) {
        let Some((byte, mask)) = Self::bit(nxx) else {
            return;
        };
        if self.table.len() <= byte {
            self.table.resize(Self::TABLE_LEN, 0);
        }
        if enabled {
            self.table[byte] |= mask;
        } else {
            self.table[byte] &= !mask;
        }
    }

    /// Enabled exchanges in ascending order.
    pub fn enabled(&self) -> impl Iterator<Item = u16> + '_ {
        (Self::FIRST_EXCHANGE..=Self::LAST_EXCHANGE).filter(|&nxx| self.is_enabled(nxx))
    }
}

/// NXX records in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NxxTable {
    pub entries: Vec<NxxEntry>,
}

impl NxxTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NxxEntry> {
        self.entries.iter()
    }
}

/// A complete rate file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateFile {
    header: RateFileHeader,
    surcharges: SurchargeTable,
    prices: PriceTable,
    groups: GroupTable,
    nxx: NxxTable,
}

impl RateFile {
    pub(crate) fn from_parts(
        header: RateFileHeader,
        surcharges: SurchargeTable,
        prices: PriceTable,
        groups: GroupTable,
        nxx: NxxTable,
    ) -> Self {
        Self {
            header,
            surcharges,
            prices,
            groups,
            nxx,
        }
    }

    pub fn builder() -> RateFileBuilder {
        RateFileBuilder::default()
    }

    /// Starts an edit from this file's contents.
    pub fn to_builder(&self) -> RateFileBuilder {
        RateFileBuilder {
            file: self.clone(),
        }
    }

    pub fn header(&self) -> &RateFileHeader {
        &self.header
    }

    pub fn surcharges(&self) -> &SurchargeTable {
        &self.surcharges
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn nxx(&self) -> &NxxTable {
        &self.nxx
    }

    /// Checks every fixed-width field against the layout of this file's
    /// version.
    pub fn check(&self) -> Result<()> {
        let layout = self.header.version.layout();
        crate::header::check(&self.header, layout)?;
        crate::price::check(&self.prices)?;
        crate::group::check(&self.groups)?;
        crate::nxx::check(&self.nxx, layout)?;
        Ok(())
    }
}

/// Builds a [`RateFile`] field by field.
#[derive(Debug, Clone, Default)]
pub struct RateFileBuilder {
    file: RateFile,
}

impl RateFileBuilder {
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.file.header.version = version;
        self
    }

    pub fn home_npa(mut self, npa: impl Into<String>) -> Self {
        self.file.header.home_npa = npa.into();
        self
    }

    pub fn home_nxx(mut self, nxx: impl Into<String>) -> Self {
        self.file.header.home_nxx = nxx.into();
        self
    }

    pub fn band_counts(mut self, counts: [u8; BandCategory::COUNT]) -> Self {
        self.file.header.band_counts = counts;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.file.header.description = description.into();
        self
    }

    pub fn surcharge(mut self, band: BandCategory, surcharge: Surcharge) -> Self {
        self.file.surcharges.set(band, surcharge);
        self
    }

    pub fn price(mut self, category: BandCategory, entry: PriceEntry) -> Self {
        self.file.prices.push(category, entry);
        self
    }

    /// Replaces the whole price table.
    pub fn prices(mut self, prices: PriceTable) -> Self {
        self.file.prices = prices;
        self
    }

    /// Adds a group; a repeated NPA is ignored.
    pub fn group(mut self, group: Group) -> Self {
        self.file.groups.insert_if_absent(group);
        self
    }

    pub fn nxx(mut self, entry: NxxEntry) -> Self {
        self.file.nxx.entries.push(entry);
        self
    }

    pub fn build(self) -> Result<RateFile> {
        self.file.check()?;
        Ok(self.file)
    }
}
