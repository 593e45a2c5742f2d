//! PBKDF2 password hasher.

use tracing::{debug, trace};

use crate::crypto::{self, Digest};
use crate::error::{ConfigError, FormatError, HashError};
use crate::format::{self, Header};
use crate::{DEFAULT_DIGEST, DEFAULT_ITERATION_COUNT, DEFAULT_KEY_SIZE, DEFAULT_SALT_SIZE};

/// Hashes and verifies passwords with PBKDF2.
///
/// Hashes are self-describing: digest, iteration count and salt length are
/// stored alongside the salt and sub-key, so a hasher can verify hashes
/// produced under other parameters as long as they are not weaker than its
/// own salt and key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    iterations: u32,
    salt_size: usize,
    key_size: usize,
    digest: Digest,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATION_COUNT,
            salt_size: (DEFAULT_SALT_SIZE / 8) as usize,
            key_size: (DEFAULT_KEY_SIZE / 8) as usize,
            digest: DEFAULT_DIGEST,
        }
    }
}

impl Hasher {
    /// Creates a hasher.
    ///
    /// `salt_bits` and `key_bits` are sizes in bits and must be positive
    /// multiples of 8.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first parameter out of range.
    pub fn new(
        iterations: u32,
        salt_bits: u32,
        key_bits: u32,
        digest: Digest,
    ) -> Result<Self, ConfigError> {
        if iterations < 1 {
            return Err(ConfigError::InvalidIterationCount);
        }
        if salt_bits % 8 != 0 || salt_bits / 8 < 1 {
            return Err(ConfigError::InvalidSaltSize);
        }
        if key_bits % 8 != 0 || key_bits / 8 < 1 {
            return Err(ConfigError::InvalidKeySize);
        }

        Ok(Self {
            iterations,
            salt_size: (salt_bits / 8) as usize,
            key_size: (key_bits / 8) as usize,
            digest,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Salt size in bytes.
    pub fn salt_size(&self) -> usize {
        self.salt_size
    }

    /// Derived key size in bytes.
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Hashes `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Entropy`] if the OS random generator fails.
    pub fn hash(&self, password: &[u8]) -> Result<Vec<u8>, HashError> {
        let salt = crypto::generate_salt(self.salt_size)?;
        let sub_key = crypto::derive_key(
            password,
            &salt,
            self.iterations,
            self.key_size,
            self.digest,
        )?;

        // salt_size came from a u32 bit count, so it fits
        let header = Header::new(self.digest, self.iterations, self.salt_size as u32);
        let encoded = format::serialize(&header, &salt, &sub_key);

        trace!(
            digest = %self.digest,
            iterations = self.iterations,
            len = encoded.len(),
            "password hashed"
        );

        Ok(encoded)
    }

    /// Checks `password` against an encoded hash.
    ///
    /// Returns `false` for a wrong password and for any hash that is
    /// malformed, uses an unknown digest, or stores a salt or sub-key shorter
    /// than this hasher's sizes. Never panics on arbitrary input.
    pub fn verify(&self, password: &[u8], encoded: &[u8]) -> bool {
        match self.check(password, encoded) {
            Ok(matched) => matched,
            Err(reason) => {
                debug!(%reason, "hash rejected");
                false
            }
        }
    }

    fn check(&self, password: &[u8], encoded: &[u8]) -> Result<bool, Rejection> {
        let parsed = format::parse(encoded)?;

        let salt = parsed.salt();
        if salt.len() < self.salt_size {
            return Err(Rejection::SaltTooShort {
                stored: salt.len(),
                required: self.salt_size,
            });
        }

        let expected = parsed.sub_key();
        if expected.len() < self.key_size {
            return Err(Rejection::KeyTooShort {
                stored: expected.len(),
                required: self.key_size,
            });
        }

        let header = parsed.header();
        let actual = crypto::derive_key(
            password,
            salt,
            header.iterations(),
            expected.len(),
            header.digest(),
        )
        .map_err(|_| Rejection::Derive)?;

        Ok(crypto::constant_time_eq(&actual, expected))
    }
}

#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("salt of {stored} bytes is below the required {required}")]
    SaltTooShort { stored: usize, required: usize },
    #[error("sub-key of {stored} bytes is below the required {required}")]
    KeyTooShort { stored: usize, required: usize },
    #[error("key derivation failed")]
    Derive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FORMAT_MARKER, HEADER_LEN, v1};

    const PASSWORD: &[u8] = b"MyTestPassword";

    fn fast(salt_bits: u32, key_bits: u32, digest: Digest) -> Hasher {
        Hasher::new(10, salt_bits, key_bits, digest).unwrap()
    }

    #[test]
    fn new_accepts_valid_parameters() {
        let hasher = Hasher::new(1000, 128, 256, Digest::Sha256).unwrap();

        assert_eq!(hasher.iterations(), 1000);
        assert_eq!(hasher.salt_size(), 16);
        assert_eq!(hasher.key_size(), 32);
        assert_eq!(hasher.digest(), Digest::Sha256);
    }

    #[test]
    fn new_invalid_iteration_count() {
        assert_eq!(
            Hasher::new(0, 128, 256, Digest::Sha256),
            Err(ConfigError::InvalidIterationCount)
        );
    }

    #[test]
    fn new_invalid_salt_size() {
        assert_eq!(
            Hasher::new(1000, 0, 256, Digest::Sha256),
            Err(ConfigError::InvalidSaltSize)
        );
        assert_eq!(
            Hasher::new(1000, 14, 256, Digest::Sha256),
            Err(ConfigError::InvalidSaltSize)
        );
    }

    #[test]
    fn new_invalid_key_size() {
        assert_eq!(
            Hasher::new(1000, 128, 0, Digest::Sha256),
            Err(ConfigError::InvalidKeySize)
        );
        assert_eq!(
            Hasher::new(1000, 128, 14, Digest::Sha256),
            Err(ConfigError::InvalidKeySize)
        );
    }

    #[test]
    fn new_reports_first_invalid_parameter() {
        assert_eq!(
            Hasher::new(0, 14, 14, Digest::Sha512),
            Err(ConfigError::InvalidIterationCount)
        );
        assert_eq!(
            Hasher::new(1, 14, 14, Digest::Sha512),
            Err(ConfigError::InvalidSaltSize)
        );
    }

    #[test]
    fn hash_layout() {
        let hasher = Hasher::new(1000, 128, 256, Digest::Sha256).unwrap();
        let hash = hasher.hash(PASSWORD).unwrap();

        assert_eq!(hash.len(), 13 + 16 + 32);
        assert_eq!(hash[0], FORMAT_MARKER);

        let header = v1::decode_header(&hash).unwrap();
        assert_eq!(header.digest(), Digest::Sha256);
        assert_eq!(header.iterations(), 1000);
        assert_eq!(header.salt_len(), 16);
    }

    #[test]
    fn hash_uses_fresh_salt() {
        let hasher = fast(128, 256, Digest::Sha256);
        let a = hasher.hash(PASSWORD).unwrap();
        let b = hasher.hash(PASSWORD).unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify(PASSWORD, &a));
        assert!(hasher.verify(PASSWORD, &b));
    }

    #[test]
    fn roundtrip_for_each_digest() {
        for digest in [Digest::Sha256, Digest::Sha512] {
            let hasher = fast(64, 512, digest);
            let hash = hasher.hash(PASSWORD).unwrap();

            assert!(hasher.verify(PASSWORD, &hash), "{digest}");
            assert_eq!(v1::decode_header(&hash).unwrap().digest(), digest);
        }
    }

    #[test]
    fn roundtrip_empty_password() {
        let hasher = fast(128, 256, Digest::Sha256);
        let hash = hasher.hash(b"").unwrap();

        assert!(hasher.verify(b"", &hash));
        assert!(!hasher.verify(b"x", &hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hasher = fast(128, 256, Digest::Sha512);
        let hash = hasher.hash(PASSWORD).unwrap();

        assert!(!hasher.verify(b"MyTestPassworD", &hash));
    }

    #[test]
    fn tampered_marker_fails() {
        let hasher = fast(128, 256, Digest::Sha256);
        let mut hash = hasher.hash(PASSWORD).unwrap();
        hash[0] = 0x23;

        assert!(!hasher.verify(PASSWORD, &hash));
    }

    #[test]
    fn tampered_sub_key_fails() {
        let hasher = fast(128, 256, Digest::Sha256);
        let mut hash = hasher.hash(PASSWORD).unwrap();
        let last = hash.len() - 1;
        hash[last] ^= 0x01;

        assert!(!hasher.verify(PASSWORD, &hash));
    }

    #[test]
    fn truncated_hash_fails() {
        let hasher = fast(128, 256, Digest::Sha256);
        let hash = hasher.hash(PASSWORD).unwrap();

        assert!(!hasher.verify(PASSWORD, &[]));
        assert!(!hasher.verify(PASSWORD, &hash[..12]));
        assert!(!hasher.verify(PASSWORD, &hash[..HEADER_LEN]));
        assert!(!hasher.verify(PASSWORD, &hash[..hash.len() - 1]));
    }

    #[test]
    fn unsupported_digest_selector_fails() {
        let hasher = fast(128, 256, Digest::Sha256);
        let mut hash = hasher.hash(PASSWORD).unwrap();
        hash[1..5].copy_from_slice(&237u32.to_be_bytes());

        assert!(!hasher.verify(PASSWORD, &hash));
    }

    #[test]
    fn oversized_salt_length_fails() {
        let hasher = fast(128, 256, Digest::Sha256);
        let mut hash = hasher.hash(PASSWORD).unwrap();
        hash[9..13].copy_from_slice(&u32::MAX.to_be_bytes());

        assert!(!hasher.verify(PASSWORD, &hash));
    }

    #[test]
    fn weaker_salt_is_rejected() {
        let old = fast(32, 256, Digest::Sha256);
        let hash = old.hash(PASSWORD).unwrap();

        assert!(old.verify(PASSWORD, &hash));
        assert!(!fast(128, 256, Digest::Sha256).verify(PASSWORD, &hash));
    }

    #[test]
    fn weaker_key_is_rejected() {
        let old = fast(128, 128, Digest::Sha256);
        let hash = old.hash(PASSWORD).unwrap();

        assert!(old.verify(PASSWORD, &hash));
        assert!(!fast(128, 256, Digest::Sha256).verify(PASSWORD, &hash));
    }

    #[test]
    fn stronger_hash_still_verifies() {
        let strong = Hasher::new(50, 256, 512, Digest::Sha512).unwrap();
        let hash = strong.hash(PASSWORD).unwrap();

        let current = Hasher::new(10, 64, 128, Digest::Sha256).unwrap();
        assert!(current.verify(PASSWORD, &hash));
        assert!(!current.verify(b"other", &hash));
    }

    #[test]
    fn verify_uses_stored_iterations() {
        let old = Hasher::new(3, 128, 256, Digest::Sha256).unwrap();
        let hash = old.hash(PASSWORD).unwrap();

        let current = Hasher::new(20, 128, 256, Digest::Sha512).unwrap();
        assert!(current.verify(PASSWORD, &hash));
    }

    #[test]
    fn hash_of_known_parameters_matches_derivation() {
        let hasher = fast(128, 256, Digest::Sha256);
        let hash = hasher.hash(PASSWORD).unwrap();
        let parsed = format::parse(&hash).unwrap();

        let key = crypto::derive_key(PASSWORD, parsed.salt(), 10, 32, Digest::Sha256).unwrap();
        assert_eq!(parsed.sub_key(), key.as_slice());
    }
}
