//! Encoded hash format.
//!
//! Provides version-aware parsing and serialization of encoded hashes. The
//! first byte of every encoded hash is a format marker selecting the layout
//! of the rest of the record.

use crate::crypto::Digest;
use crate::error::FormatError;

pub mod v1;

/// Length of the format marker.
pub const MARKER_LEN: usize = 1;
/// Length of one big-endian header field.
pub const FIELD_LEN: usize = 4;
/// Length of the fixed header prefix, marker included.
pub const HEADER_LEN: usize = MARKER_LEN + 3 * FIELD_LEN;
/// Marker written by [`serialize`].
pub const FORMAT_MARKER: u8 = v1::VERSION_V1;

/// Parameters embedded in an encoded hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    digest: Digest,
    iterations: u32,
    salt_len: u32,
}

impl Header {
    pub fn new(digest: Digest, iterations: u32, salt_len: u32) -> Self {
        Self {
            digest,
            iterations,
            salt_len,
        }
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt_len(&self) -> u32 {
        self.salt_len
    }
}

/// A parsed view into an encoded hash.
#[derive(Debug)]
pub struct EncodedHash<'a> {
    version: u8,
    header: Header,
    salt: &'a [u8],
    sub_key: &'a [u8],
}

impl<'a> EncodedHash<'a> {
    /// Returns the format marker the hash was encoded with.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn salt(&self) -> &'a [u8] {
        self.salt
    }

    pub fn sub_key(&self) -> &'a [u8] {
        self.sub_key
    }
}

/// Parses an encoded hash.
///
/// Dispatches on the format marker.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is shorter than the header
/// - The format marker is unknown
/// - The header names an unsupported digest or zero iterations
/// - The declared salt runs past the end of the buffer
pub fn parse(data: &[u8]) -> Result<EncodedHash<'_>, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::TooShort);
    }

    match data[0] {
        v1::VERSION_V1 => v1::parse(data),
        other => Err(FormatError::UnknownMarker(other)),
    }
}

/// Serializes a hash in the current format.
pub fn serialize(header: &Header, salt: &[u8], sub_key: &[u8]) -> Vec<u8> {
    v1::serialize(header, salt, sub_key)
}
