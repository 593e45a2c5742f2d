use std::fmt;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use serde::Serialize;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use crate::error::{FormatError, HashError};

/// Digest used as the PRF of PBKDF2, stored in the hash header by selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Digest {
    Sha256,
    Sha512,
}

impl Digest {
    /// Selector written into the header.
    pub const fn selector(self) -> u32 {
        match self {
            Digest::Sha256 => 1,
            Digest::Sha512 => 2,
        }
    }
}

impl TryFrom<u32> for Digest {
    type Error = FormatError;

    fn try_from(selector: u32) -> Result<Self, Self::Error> {
        match selector {
            1 => Ok(Digest::Sha256),
            2 => Ok(Digest::Sha512),
            other => Err(FormatError::UnsupportedDigest(other)),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Digest::Sha256 => f.write_str("sha256"),
            Digest::Sha512 => f.write_str("sha512"),
        }
    }
}

/// Derive `len` bytes from `password` with PBKDF2-HMAC over `digest`.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    len: usize,
    digest: Digest,
) -> Result<Zeroizing<Vec<u8>>, HashError> {
    let mut key = Zeroizing::new(vec![0u8; len]);

    match digest {
        Digest::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut key),
        Digest::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut key),
    }
    .map_err(|e| HashError::Derive(e.to_string()))?;

    Ok(key)
}
