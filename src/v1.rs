use crate::core::{DataReader, DecodeExt};
use crate::error::TcfDecodeError;
use crate::model::Version;
use crate::purposes::PurposeConsents;
use crate::vendors::VendorConsents;
use std::str::FromStr;

// See https://github.com/InteractiveAdvertisingBureau/GDPR-Transparency-and-Consent-Framework/blob/master/Consent%20string%20and%20vendor%20list%20formats%20v1.1%20Final.md
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TcfV1 {
    pub created: u64,
    pub last_updated: u64,
    pub cmp_id: u16,
    pub cmp_version: u16,
    pub consent_screen: u8,
    pub consent_language: String,
    pub vendor_list_version: u16,
    pub purpose_consents: PurposeConsents,
    pub vendor_consents: VendorConsents,
}

impl FromStr for TcfV1 {
    type Err = TcfDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.decode_base64_url()?;
        let mut r = DataReader::new(&b);

        let version = r.read_fixed_integer::<u8>(6)?;
        if version != Version::V1 as u8 {
            return Err(TcfDecodeError::VersionMismatch {
                expected: Version::V1,
                found: version,
            });
        }

        let created = r.read_datetime_as_unix_timestamp()?;
        let last_updated = r.read_datetime_as_unix_timestamp()?;
        let cmp_id = r.read_fixed_integer(12)?;
        let cmp_version = r.read_fixed_integer(12)?;
        let consent_screen = r.read_fixed_integer(6)?;
        let consent_language = r.read_string(2)?;
        let vendor_list_version = r.read_fixed_integer(12)?;
        let purpose_consents = PurposeConsents::parse(&mut r, 24)?;
        let vendor_consents = VendorConsents::parse(&mut r, true)?;

        Ok(Self {
            created,
            last_updated,
            cmp_id,
            cmp_version,
            consent_screen,
            consent_language,
            vendor_list_version,
            purpose_consents,
            vendor_consents,
        })
    }
}
