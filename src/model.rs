use crate::core::{DataReader, DecodeExt};
use crate::error::TcfDecodeError;
use crate::purposes::PurposeConsents;
use crate::v1::TcfV1;
use crate::v2::TcfV2;
use crate::vendors::VendorConsents;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::str::FromStr;
use strum_macros::Display;

/// The wire format version of a consent string.
///
/// The version is encoded in the first 6 bits of the payload and decides
/// both the header layout and the vendor section layout.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, FromPrimitive)]
pub enum Version {
    V1 = 1,
    V2 = 2,
}

impl Version {
    /// Detects the version of a consent string without fully parsing it.
    ///
    /// # Errors
    ///
    /// Returns [`TcfDecodeError::UnsupportedVersion`] when the payload
    /// advertises a version other than 1 or 2, or a decoding error when
    /// the leading bits cannot be read at all.
    pub fn detect(s: &str) -> Result<Self, TcfDecodeError> {
        let core = s.split('.').next().unwrap_or(s);
        let b = core.decode_base64_url()?;
        let mut r = DataReader::new(&b);

        let version = r.read_fixed_integer::<u8>(6)?;
        Self::from_u8(version).ok_or(TcfDecodeError::UnsupportedVersion(version))
    }
}

/// A fully decoded consent string of either supported version.
///
/// The model is an immutable value: it owns all its data, is safe to share
/// across threads, and its consent queries never fail. It is produced in a
/// single all-or-nothing decode pass; a string that cannot be decoded
/// completely yields an error and no model.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TcfModel {
    V1(TcfV1),
    V2(TcfV2),
}

impl TcfModel {
    /// Parses a consent string, detecting its version from the payload.
    ///
    /// # Errors
    ///
    /// Returns a [`TcfDecodeError`] if the string cannot be fully decoded.
    ///
    /// # Example
    ///
    /// ```
    /// use iab_tcf::TcfModel;
    ///
    /// # fn main() -> Result<(), iab_tcf::TcfDecodeError> {
    /// let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACBAAABCA=")?;
    ///
    /// assert_eq!(model.cmp_id(), 15);
    /// assert!(model.has_vendor_consent(25));
    /// assert!(!model.has_vendor_consent(2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(s: &str) -> Result<Self, TcfDecodeError> {
        match Version::detect(s)? {
            Version::V1 => TcfV1::from_str(s).map(Self::V1),
            Version::V2 => TcfV2::from_str(s).map(Self::V2),
        }
    }

    /// Parses a consent string the caller expects to be of a known version.
    ///
    /// The expectation is verified against the version advertised by the
    /// payload rather than blindly trusted.
    ///
    /// # Errors
    ///
    /// Returns [`TcfDecodeError::VersionMismatch`] when the payload
    /// disagrees with `expected`, or any other [`TcfDecodeError`] if the
    /// string cannot be fully decoded.
    pub fn parse_with_version(s: &str, expected: Version) -> Result<Self, TcfDecodeError> {
        let detected = Version::detect(s)?;
        if detected != expected {
            return Err(TcfDecodeError::VersionMismatch {
                expected,
                found: detected as u8,
            });
        }
        Self::parse(s)
    }

    pub fn version(&self) -> Version {
        match self {
            Self::V1(_) => Version::V1,
            Self::V2(_) => Version::V2,
        }
    }

    /// Creation time, in seconds since the Unix epoch.
    pub fn created(&self) -> u64 {
        match self {
            Self::V1(m) => m.created,
            Self::V2(m) => m.core.created,
        }
    }

    /// Last update time, in seconds since the Unix epoch.
    pub fn last_updated(&self) -> u64 {
        match self {
            Self::V1(m) => m.last_updated,
            Self::V2(m) => m.core.last_updated,
        }
    }

    /// Id of the CMP that produced the string.
    pub fn cmp_id(&self) -> u16 {
        match self {
            Self::V1(m) => m.cmp_id,
            Self::V2(m) => m.core.cmp_id,
        }
    }

    pub fn cmp_version(&self) -> u16 {
        match self {
            Self::V1(m) => m.cmp_version,
            Self::V2(m) => m.core.cmp_version,
        }
    }

    /// Screen number in the CMP UI where consent was given.
    pub fn consent_screen(&self) -> u8 {
        match self {
            Self::V1(m) => m.consent_screen,
            Self::V2(m) => m.core.consent_screen,
        }
    }

    /// Two-letter code of the language the CMP UI was presented in.
    pub fn consent_language(&self) -> &str {
        match self {
            Self::V1(m) => &m.consent_language,
            Self::V2(m) => &m.core.consent_language,
        }
    }

    /// Version of the global vendor list the string was created against.
    pub fn vendor_list_version(&self) -> u16 {
        match self {
            Self::V1(m) => m.vendor_list_version,
            Self::V2(m) => m.core.vendor_list_version,
        }
    }

    /// The highest vendor id declared by the vendor consent section.
    pub fn max_vendor_id(&self) -> u16 {
        self.vendor_consents().max_vendor_id()
    }

    /// Returns whether consent was given for `vendor_id`.
    ///
    /// Never fails; any id outside the declared vendor range answers
    /// `false`.
    pub fn has_vendor_consent(&self, vendor_id: i32) -> bool {
        self.vendor_consents().has_consent(vendor_id)
    }

    /// Returns whether consent was given for `purpose_id`.
    ///
    /// Never fails; any id outside `1..=24` answers `false`.
    pub fn has_purpose_consent(&self, purpose_id: i32) -> bool {
        self.purpose_consents().has_consent(purpose_id)
    }

    pub fn vendor_consents(&self) -> &VendorConsents {
        match self {
            Self::V1(m) => &m.vendor_consents,
            Self::V2(m) => &m.core.vendor_consents,
        }
    }

    pub fn purpose_consents(&self) -> &PurposeConsents {
        match self {
            Self::V1(m) => &m.purpose_consents,
            Self::V2(m) => &m.core.purpose_consents,
        }
    }

    pub fn as_v1(&self) -> Option<&TcfV1> {
        match self {
            Self::V1(m) => Some(m),
            Self::V2(_) => None,
        }
    }

    pub fn as_v2(&self) -> Option<&TcfV2> {
        match self {
            Self::V2(m) => Some(m),
            Self::V1(_) => None,
        }
    }
}

impl FromStr for TcfModel {
    type Err = TcfDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
