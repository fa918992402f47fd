use crate::core::base64;
use crate::model::Version;
use std::io;
use thiserror::Error;

/// The error type for consent string decoding operations.
///
/// Decoding is all-or-nothing: any of these errors aborts the whole decode
/// and no partially constructed model is ever returned.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TcfDecodeError {
    /// The input is not valid base64url data.
    #[error("malformed consent string")]
    MalformedInput(#[from] base64::DecodeError),
    /// A fixed-width field would read past the end of the decoded payload.
    ///
    /// This usually occurs if the input string is truncated.
    #[error("unexpected end of consent string")]
    BufferUnderrun(#[from] io::Error),
    /// The version advertised by the payload disagrees with the version
    /// expected by the caller.
    #[error("version mismatch (expected {expected}, found {found})")]
    VersionMismatch { expected: Version, found: u8 },
    /// The payload advertises a version this crate does not implement.
    #[error("unsupported consent string version {0}")]
    UnsupportedVersion(u8),
    /// A trailing segment of a V2 string has an unknown type and cannot be
    /// safely skipped.
    #[error("unsupported segment type {segment_type}")]
    UnsupportedSegment { segment_type: u8 },
    /// A trailing segment type appears more than once in a V2 string.
    #[error("duplicate segment type {segment_type}")]
    DuplicateSegment { segment_type: u8 },
}
