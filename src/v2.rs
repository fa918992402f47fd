use crate::core::{DataReader, DecodeExt};
use crate::error::TcfDecodeError;
use crate::model::Version;
use crate::purposes::PurposeConsents;
use crate::vendors::{read_range_entries, RangeEntry, VendorConsents};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::collections::BTreeSet;
use std::str::FromStr;

const SEGMENT_DISCLOSED_VENDORS: u8 = 1;
const SEGMENT_ALLOWED_VENDORS: u8 = 2;
const SEGMENT_PUBLISHER_PURPOSES: u8 = 3;

/// A decoded TCF V2 consent string: the mandatory core segment plus any
/// optional trailing segments that were present in the input.
///
/// Absent segments decode to [`None`] and carry no additional restriction.
// See https://github.com/InteractiveAdvertisingBureau/GDPR-Transparency-and-Consent-Framework/blob/master/TCFv2/IAB%20Tech%20Lab%20-%20Consent%20string%20and%20vendor%20list%20formats%20v2.md
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TcfV2 {
    pub core: Core,
    pub disclosed_vendors: Option<VendorConsents>,
    pub allowed_vendors: Option<VendorConsents>,
    pub publisher_purposes: Option<PublisherPurposes>,
}

/// The core segment of a TCF V2 consent string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Core {
    pub created: u64,
    pub last_updated: u64,
    pub cmp_id: u16,
    pub cmp_version: u16,
    pub consent_screen: u8,
    pub consent_language: String,
    pub vendor_list_version: u16,
    pub policy_version: u8,
    pub is_service_specific: bool,
    pub use_non_standard_texts: bool,
    pub special_feature_opt_ins: PurposeConsents,
    pub purpose_consents: PurposeConsents,
    pub purpose_legitimate_interests: PurposeConsents,
    pub purpose_one_treatment: bool,
    pub publisher_country_code: String,
    pub vendor_consents: VendorConsents,
    pub vendor_legitimate_interests: VendorConsents,
    pub publisher_restrictions: Vec<PublisherRestriction>,
}

impl Core {
    fn parse(r: &mut DataReader) -> Result<Self, TcfDecodeError> {
        Ok(Self {
            created: r.read_datetime_as_unix_timestamp()?,
            last_updated: r.read_datetime_as_unix_timestamp()?,
            cmp_id: r.read_fixed_integer(12)?,
            cmp_version: r.read_fixed_integer(12)?,
            consent_screen: r.read_fixed_integer(6)?,
            consent_language: r.read_string(2)?,
            vendor_list_version: r.read_fixed_integer(12)?,
            policy_version: r.read_fixed_integer(6)?,
            is_service_specific: r.read_bool()?,
            use_non_standard_texts: r.read_bool()?,
            special_feature_opt_ins: PurposeConsents::parse(r, 12)?,
            purpose_consents: PurposeConsents::parse(r, 24)?,
            purpose_legitimate_interests: PurposeConsents::parse(r, 24)?,
            purpose_one_treatment: r.read_bool()?,
            publisher_country_code: r.read_string(2)?,
            // V2 vendor sections carry no default consent bit
            vendor_consents: VendorConsents::parse(r, false)?,
            vendor_legitimate_interests: VendorConsents::parse(r, false)?,
            publisher_restrictions: parse_publisher_restrictions(r)?,
        })
    }
}

fn parse_publisher_restrictions(
    r: &mut DataReader,
) -> Result<Vec<PublisherRestriction>, TcfDecodeError> {
    let n = r.read_fixed_integer::<u16>(12)?;
    (0..n)
        .map(|_| {
            Ok(PublisherRestriction {
                purpose_id: r.read_fixed_integer(6)?,
                restriction_type: RestrictionType::from_u8(r.read_fixed_integer(2)?)
                    .unwrap_or(RestrictionType::Undefined),
                restricted_vendors: read_range_entries(r)?,
            })
        })
        .collect()
}

/// A publisher override of the default vendor treatment for one purpose.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PublisherRestriction {
    pub purpose_id: u8,
    pub restriction_type: RestrictionType,
    pub restricted_vendors: Vec<RangeEntry>,
}

impl PublisherRestriction {
    /// Whether this restriction targets `vendor_id`.
    pub fn restricts(&self, vendor_id: i32) -> bool {
        u16::try_from(vendor_id)
            .map(|id| id >= 1 && self.restricted_vendors.iter().any(|e| e.contains(id)))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, FromPrimitive)]
pub enum RestrictionType {
    NotAllowed = 0,
    RequireConsent = 1,
    RequireLegitimateInterest = 2,
    Undefined = 3,
}

/// The optional publisher purposes transparency and consent segment.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PublisherPurposes {
    pub consents: PurposeConsents,
    pub legitimate_interests: PurposeConsents,
    pub custom_consents: PurposeConsents,
    pub custom_legitimate_interests: PurposeConsents,
}

impl PublisherPurposes {
    fn parse(r: &mut DataReader) -> Result<Self, TcfDecodeError> {
        let consents = PurposeConsents::parse(r, 24)?;
        let legitimate_interests = PurposeConsents::parse(r, 24)?;
        let n = r.read_fixed_integer::<u8>(6)?;
        Ok(Self {
            consents,
            legitimate_interests,
            custom_consents: PurposeConsents::parse(r, n as usize)?,
            custom_legitimate_interests: PurposeConsents::parse(r, n as usize)?,
        })
    }
}

impl FromStr for TcfV2 {
    type Err = TcfDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments_iter = s.split('.');

        // first mandatory segment is the core segment
        let b = segments_iter.next().unwrap_or(s).decode_base64_url()?;
        let mut r = DataReader::new(&b);

        let version = r.read_fixed_integer::<u8>(6)?;
        if version != Version::V2 as u8 {
            return Err(TcfDecodeError::VersionMismatch {
                expected: Version::V2,
                found: version,
            });
        }

        let mut tcf = Self {
            core: Core::parse(&mut r)?,
            disclosed_vendors: None,
            allowed_vendors: None,
            publisher_purposes: None,
        };

        // parse each optional trailing segment, each encoded on its own
        let mut seen = BTreeSet::new();
        for segment in segments_iter {
            let b = segment.decode_base64_url()?;
            let mut r = DataReader::new(&b);

            let segment_type = r.read_fixed_integer::<u8>(3)?;
            if !seen.insert(segment_type) {
                return Err(TcfDecodeError::DuplicateSegment { segment_type });
            }

            match segment_type {
                SEGMENT_DISCLOSED_VENDORS => {
                    tcf.disclosed_vendors = Some(VendorConsents::parse(&mut r, false)?);
                }
                SEGMENT_ALLOWED_VENDORS => {
                    tcf.allowed_vendors = Some(VendorConsents::parse(&mut r, false)?);
                }
                SEGMENT_PUBLISHER_PURPOSES => {
                    tcf.publisher_purposes = Some(PublisherPurposes::parse(&mut r)?);
                }
                _ => return Err(TcfDecodeError::UnsupportedSegment { segment_type }),
            }
        }

        Ok(tcf)
    }
}
