//! End-to-end decoding of consent strings captured from real CMPs,
//! exercised through the public API only.

use iab_tcf::{TcfDecodeError, TcfModel, Version};
use test_case::test_case;

#[test]
fn v1_header_fields() {
    let model = TcfModel::parse("BObdrPUOevsguAfDqFENCNAAAAAmeAAA").unwrap();

    assert_eq!(model.version(), Version::V1);
    assert_eq!(model.created(), 1549314965); // 2019-02-04T21:16:05Z
    assert_eq!(model.last_updated(), 1554820510); // 2019-04-09T14:35:10Z
    assert_eq!(model.cmp_id(), 31);
    assert_eq!(model.cmp_version(), 234);
    assert_eq!(model.consent_screen(), 5);
    assert_eq!(model.consent_language(), "EN");
    assert_eq!(model.vendor_list_version(), 141);
    assert_eq!(
        model.purpose_consents().to_string(),
        "000000000000000000000000"
    );
}

#[test]
fn v1_purpose_consents() {
    let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACBAAABCA=").unwrap();

    for id in [1, 2, 3, 4, 5, 15, 24] {
        assert!(model.has_purpose_consent(id), "purpose {id}");
    }
    for id in [6, 14, 16, 23, 0, -1, 25, 99] {
        assert!(!model.has_purpose_consent(id), "purpose {id}");
    }
}

#[test_case(&[1, 25, 30], &[2, 3, 31, 32] ; "bitfield")]
fn v1_bitfield_vendor_encoding(consented: &[i32], refused: &[i32]) {
    let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACBAAABCA=").unwrap();

    for &id in consented {
        assert!(model.has_vendor_consent(id), "vendor {id}");
    }
    for &id in refused {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
    // ids the declared range cannot express are never consented
    for id in [-99, -1, 0, 33, 34, 99] {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
}

#[test]
fn v1_range_vendor_encoding_default_false() {
    let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACCACgACADIAHg").unwrap();

    for id in [1, 10, 25, 30] {
        assert!(model.has_vendor_consent(id), "vendor {id}");
    }
    for id in [26, 28, 31, 32] {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
    for id in [-99, -1, 0, 33, 34, 99] {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
}

#[test]
fn v1_range_vendor_encoding_default_true() {
    let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACDACAADABkAHg").unwrap();

    // listed ranges are the exceptions to the default consent
    for id in [1, 25, 27, 30] {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
    for id in [2, 15, 31, 32] {
        assert!(model.has_vendor_consent(id), "vendor {id}");
    }
    for id in [-99, -1, 0, 33, 34, 99] {
        assert!(!model.has_vendor_consent(id), "vendor {id}");
    }
}

#[test]
fn v1_range_vendor_encoding_groups() {
    let model = TcfModel::parse("BOwOh-wOwOh-wABABBAAABAAAAACqADgAUACgAHgAPg").unwrap();

    assert!(model.has_vendor_consent(15));
}

#[test]
fn v2_core_fields() {
    let model = TcfModel::parse("CPXxRfAPXxRfAAfKABENB-CgAAAAAAAAAAYgAAAAAAAA").unwrap();

    assert_eq!(model.version(), Version::V2);
    assert_eq!(model.cmp_id(), 31);
    assert_eq!(model.cmp_version(), 640);
    assert_eq!(model.consent_screen(), 1);
    assert_eq!(model.consent_language(), "EN");
    assert_eq!(model.vendor_list_version(), 126);

    let v2 = model.as_v2().unwrap();
    assert_eq!(v2.core.policy_version, 2);
    assert_eq!(v2.core.publisher_country_code, "DE");
}

#[test]
fn v2_vendor_and_purpose_consents() {
    let model =
        TcfModel::parse("CPXuQIAPXuQIAAfKABENB-CgACAAAAAAAAYgF5wAQF5gAAAA.YAAAAAAAAAAA").unwrap();

    assert!(model.has_purpose_consent(3));
    assert!(!model.has_purpose_consent(4));
    assert!(model.has_vendor_consent(755));
    assert!(!model.has_vendor_consent(754));
    assert!(model.as_v2().unwrap().publisher_purposes.is_some());
}

#[test_case("BObdrPUOevsguAfDqFENCNAAAAAmeAAA", Version::V1)]
#[test_case("CPXxRfAPXxRfAAfKABENB-CgAAAAAAAAAAYgAAAAAAAA", Version::V2)]
fn expected_version_is_verified(s: &str, version: Version) {
    let model = TcfModel::parse_with_version(s, version).unwrap();
    assert_eq!(model.version(), version);
}

#[test]
fn mismatched_expected_version() {
    let r = TcfModel::parse_with_version("BObdrPUOevsguAfDqFENCNAAAAAmeAAA", Version::V2);
    assert!(matches!(
        r.unwrap_err(),
        TcfDecodeError::VersionMismatch { .. }
    ));
}

#[test_case("BObdrPU!evsguAfDqFENCNAAAAAmeAAA" ; "illegal character")]
#[test_case("BObdr" ; "impossible base64 length")]
fn malformed_input(s: &str) {
    let r = TcfModel::parse(s);
    assert!(matches!(r.unwrap_err(), TcfDecodeError::MalformedInput(_)));
}

#[test]
fn truncated_string() {
    // the header survives but the vendor section is cut short
    let r = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBA=");
    assert!(matches!(r.unwrap_err(), TcfDecodeError::BufferUnderrun(_)));
}

#[test]
fn unsupported_version() {
    let r = TcfModel::parse("DObdrPUOevsguAfDqFENCNAAAAAmeAAA");
    assert!(matches!(r.unwrap_err(), TcfDecodeError::UnsupportedVersion(3)));
}
