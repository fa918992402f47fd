use crate::core::DataReader;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;

/// An ordered run of per-id consent flags, as stored in the fixed-width
/// bitfields of the TCF wire format (core purposes, special features,
/// publisher custom purposes).
///
/// Ids are 1-based: id `n` maps to bit `n - 1` of the underlying field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PurposeConsents {
    bits: Vec<bool>,
}

impl PurposeConsents {
    pub(crate) fn parse(r: &mut DataReader, bits: usize) -> io::Result<Self> {
        Ok(Self {
            bits: r.read_fixed_bitfield(bits)?,
        })
    }

    /// Builds the set from raw flags, index 0 being id 1.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Returns whether consent was given for `purpose_id`.
    ///
    /// Ids outside `1..=len` are never consented, whatever their value.
    pub fn has_consent(&self, purpose_id: i32) -> bool {
        if purpose_id < 1 {
            return false;
        }
        self.bits
            .get(purpose_id as usize - 1)
            .copied()
            .unwrap_or(false)
    }

    /// Ids for which consent was given, in increasing order.
    pub fn consented_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some((i + 1) as u16))
    }

    /// Number of flags carried by the field (24 for core purposes).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// The diagnostic form: one `'0'`/`'1'` character per id, id 1 first.
impl Display for PurposeConsents {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
