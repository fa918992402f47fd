use crate::core::DataReader;
use crate::error::TcfDecodeError;
use std::iter::repeat_with;

/// A single record of a range-encoded vendor section: either one vendor id
/// or an inclusive interval of ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RangeEntry {
    Single(u16),
    Group { start: u16, end: u16 },
}

impl RangeEntry {
    /// Whether `id` falls inside this record. A group whose bounds are
    /// inverted matches no vendor at all.
    pub fn contains(&self, id: u16) -> bool {
        match *self {
            RangeEntry::Single(v) => id == v,
            RangeEntry::Group { start, end } => start <= id && id <= end,
        }
    }
}

/// The vendor consent section of a consent string.
///
/// The wire format stores vendor consent under one of two mutually
/// exclusive encodings, chosen by the encoder with a single discriminator
/// bit. Both variants answer the same query through
/// [`has_consent`](VendorConsents::has_consent).
///
/// In the range variant, membership in *any* record flips
/// `default_consent`, which lets an encoder ship either "opt-in, list the
/// exceptions" or "opt-out, list the exceptions" at the cost of one bit.
/// V1 carries that bit on the wire; V2 dropped it, so V2 sections always
/// decode with `default_consent == false`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum VendorConsents {
    BitField {
        max_vendor_id: u16,
        /// One flag per vendor id, id 1 first.
        bits: Vec<bool>,
    },
    Range {
        max_vendor_id: u16,
        default_consent: bool,
        /// Records are kept exactly as parsed: possibly unsorted and
        /// overlapping.
        entries: Vec<RangeEntry>,
    },
}

impl VendorConsents {
    /// Parses a vendor section positioned at its `max_vendor_id` field.
    /// `with_default` selects the V1 layout, where range sections carry a
    /// default consent bit before the entry count.
    pub(crate) fn parse(r: &mut DataReader, with_default: bool) -> Result<Self, TcfDecodeError> {
        let max_vendor_id = r.read_fixed_integer::<u16>(16)?;
        let is_range = r.read_bool()?;
        Ok(if is_range {
            let default_consent = with_default && r.read_bool()?;
            let entries = read_range_entries(r)?;
            Self::Range {
                max_vendor_id,
                default_consent,
                entries,
            }
        } else {
            Self::BitField {
                max_vendor_id,
                bits: r.read_fixed_bitfield(max_vendor_id as usize)?,
            }
        })
    }

    /// The highest vendor id the section declares. Ids above it are never
    /// consented.
    pub fn max_vendor_id(&self) -> u16 {
        match *self {
            Self::BitField { max_vendor_id, .. } | Self::Range { max_vendor_id, .. } => {
                max_vendor_id
            }
        }
    }

    /// Returns whether consent was given for `vendor_id`.
    ///
    /// Total for any integer input: ids outside `1..=max_vendor_id`
    /// (negative, zero, or beyond the declared maximum) are never
    /// consented, whatever the encoding says.
    pub fn has_consent(&self, vendor_id: i32) -> bool {
        if vendor_id < 1 || vendor_id > i32::from(self.max_vendor_id()) {
            return false;
        }
        let id = vendor_id as u16;

        match self {
            Self::BitField { bits, .. } => bits.get(id as usize - 1).copied().unwrap_or(false),
            Self::Range {
                default_consent,
                entries,
                ..
            } => {
                let listed = entries.iter().any(|e| e.contains(id));
                listed != *default_consent
            }
        }
    }

    /// Ids for which consent was given, in increasing order.
    pub fn consented_ids(&self) -> impl Iterator<Item = u16> + '_ {
        (1..=self.max_vendor_id()).filter(|&id| self.has_consent(i32::from(id)))
    }
}

/// Reads a 12-bit entry count followed by that many range records, each a
/// single 16-bit id or a pair of inclusive 16-bit bounds.
pub(crate) fn read_range_entries(r: &mut DataReader) -> Result<Vec<RangeEntry>, TcfDecodeError> {
    let n = r.read_fixed_integer::<u16>(12)? as usize;
    repeat_with(|| {
        let is_group = r.read_bool()?;
        Ok(if is_group {
            RangeEntry::Group {
                start: r.read_fixed_integer(16)?,
                end: r.read_fixed_integer(16)?,
            }
        } else {
            RangeEntry::Single(r.read_fixed_integer(16)?)
        })
    })
    .take(n)
    .collect()
}
