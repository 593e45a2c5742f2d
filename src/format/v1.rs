//! Encoded hash format v1.
//!
//! V1 Format:
//! ```text
//! MARKER (1) | DIGEST (4, BE) | ITERATIONS (4, BE) | SALT_LEN (4, BE) | SALT (SALT_LEN) | SUB_KEY (rest)
//! ```

use super::{EncodedHash, FIELD_LEN, HEADER_LEN, Header};
use crate::crypto::Digest;
use crate::error::FormatError;

/// Format marker of v1 hashes.
pub const VERSION_V1: u8 = 0x01;

const DIGEST_OFFSET: usize = 1;
const ITERATIONS_OFFSET: usize = DIGEST_OFFSET + FIELD_LEN;
const SALT_LEN_OFFSET: usize = ITERATIONS_OFFSET + FIELD_LEN;

/// Writes the header fields into `buf`, whose first byte already holds the
/// format marker. `buf` must be at least [`HEADER_LEN`] bytes long.
pub fn encode_header(buf: &mut [u8], header: &Header) {
    write_field(buf, DIGEST_OFFSET, header.digest().selector());
    write_field(buf, ITERATIONS_OFFSET, header.iterations());
    write_field(buf, SALT_LEN_OFFSET, header.salt_len());
}

/// Reads the header fields following the format marker.
///
/// # Errors
///
/// Returns an error if the buffer is too short, the digest selector is not
/// known or the iteration count is zero.
pub fn decode_header(data: &[u8]) -> Result<Header, FormatError> {
    let digest = Digest::try_from(read_field(data, DIGEST_OFFSET)?)?;

    let iterations = read_field(data, ITERATIONS_OFFSET)?;
    if iterations == 0 {
        return Err(FormatError::ZeroIterations);
    }

    let salt_len = read_field(data, SALT_LEN_OFFSET)?;

    Ok(Header::new(digest, iterations, salt_len))
}

/// Parses a v1 encoded hash.
///
/// # Errors
///
/// Returns an error if the header is invalid or the salt overruns the buffer.
pub fn parse(data: &[u8]) -> Result<EncodedHash<'_>, FormatError> {
    let header = decode_header(data)?;

    let body = data.get(HEADER_LEN..).ok_or(FormatError::TooShort)?;
    let salt_len = usize::try_from(header.salt_len()).map_err(|_| FormatError::SaltOverrun)?;
    if salt_len > body.len() {
        return Err(FormatError::SaltOverrun);
    }
    let (salt, sub_key) = body.split_at(salt_len);

    Ok(EncodedHash {
        version: VERSION_V1,
        header,
        salt,
        sub_key,
    })
}

/// Serializes a v1 encoded hash.
pub fn serialize(header: &Header, salt: &[u8], sub_key: &[u8]) -> Vec<u8> {
    debug_assert_eq!(header.salt_len() as usize, salt.len());

    let mut buf = vec![0u8; HEADER_LEN + salt.len() + sub_key.len()];
    buf[0] = VERSION_V1;
    encode_header(&mut buf, header);

    let (salt_region, sub_key_region) = buf[HEADER_LEN..].split_at_mut(salt.len());
    salt_region.copy_from_slice(salt);
    sub_key_region.copy_from_slice(sub_key);

    buf
}

fn write_field(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + FIELD_LEN].copy_from_slice(&value.to_be_bytes());
}

fn read_field(data: &[u8], offset: usize) -> Result<u32, FormatError> {
    let bytes: [u8; FIELD_LEN] = data
        .get(offset..offset + FIELD_LEN)
        .and_then(|field| field.try_into().ok())
        .ok_or(FormatError::TooShort)?;
    Ok(u32::from_be_bytes(bytes))
}
