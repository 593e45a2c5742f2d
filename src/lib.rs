//! Adaptive PBKDF2 password hashing.
//!
//! Encoded hashes carry their own digest, iteration count and salt length,
//! so parameters can be raised over time while older hashes stay verifiable.
//!
//! ```no_run
//! let hash = pwhash::hash(b"hunter2")?;
//! assert!(pwhash::verify(b"hunter2", &hash));
//! # Ok::<(), pwhash::HashError>(())
//! ```

mod crypto;
mod error;
pub mod format;
mod hasher;

use std::sync::LazyLock;

pub use crate::crypto::Digest;
pub use crate::error::{ConfigError, FormatError, HashError};
pub use crate::hasher::Hasher;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATION_COUNT: u32 = 1000;
/// Default salt size in bits.
pub const DEFAULT_SALT_SIZE: u32 = 128;
/// Default derived key size in bits.
pub const DEFAULT_KEY_SIZE: u32 = 256;
/// Default PBKDF2 digest.
pub const DEFAULT_DIGEST: Digest = Digest::Sha256;

static DEFAULT_HASHER: LazyLock<Hasher> = LazyLock::new(Hasher::default);

/// Returns the shared hasher configured with the default parameters.
pub fn default_hasher() -> &'static Hasher {
    &DEFAULT_HASHER
}

/// Hashes `password` with the default hasher.
pub fn hash(password: &[u8]) -> Result<Vec<u8>, HashError> {
    default_hasher().hash(password)
}

/// Verifies `password` against `encoded` with the default hasher.
pub fn verify(password: &[u8], encoded: &[u8]) -> bool {
    default_hasher().verify(password, encoded)
}
