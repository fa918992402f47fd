//! This crate decodes IAB Transparency & Consent Framework (TCF)
//! [consent strings](https://github.com/InteractiveAdvertisingBureau/GDPR-Transparency-and-Consent-Framework)
//! into a structured, queryable model.
//!
//! Both wire formats currently in circulation are supported: TCF v1.1 and
//! TCF v2. The version is detected from the payload itself, or can be
//! supplied by the caller and verified.
//!
//! NOTE: This is not an official IAB library.
//!
//! # Parsing consent strings
//!
//! The [`TcfModel`] type is the entry point. It decodes a whole string in
//! one pass and exposes the header fields along with vendor and purpose
//! consent queries.
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use iab_tcf::{TcfModel, Version};
//!
//! let model = TcfModel::parse("BOOzQoAOOzQoAAPAFSENCW-AIBACBAAABCA=")?;
//!
//! assert_eq!(model.version(), Version::V1);
//! assert_eq!(model.cmp_id(), 15);
//! assert_eq!(model.consent_language(), "EN");
//!
//! // does the user consent to vendor 25 using their data?
//! assert!(model.has_vendor_consent(25));
//! // and to purpose 1 (information storage and access)?
//! assert!(model.has_purpose_consent(1));
//! # Ok(())
//! # }
//! ```
//!
//! # Error handling
//!
//! This crate is conservative with regard to how it handles parsing
//! failure. If a string cannot be fully decoded, then it is considered as
//! an error and no model is produced.
//!
//! This is done to avoid obtaining erroneous user consent information from
//! potentially corrupted payloads.
//!
//! Once a model is constructed, its queries never fail: a vendor or
//! purpose id the format cannot express simply answers `false`, which is
//! the format's own "absence of evidence is no consent" convention.
//!
pub(crate) mod core;
pub mod error;
pub mod model;
pub mod purposes;
pub mod v1;
pub mod v2;
pub mod vendors;

pub use crate::error::TcfDecodeError;
pub use crate::model::{TcfModel, Version};
