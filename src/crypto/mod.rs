//! Cryptographic primitives behind the hasher.
//!
//! Provides PBKDF2 derivation, salt generation and constant-time comparison.

pub mod kdf;
pub mod random;

pub use kdf::{Digest, derive_key};
pub use random::generate_salt;

use subtle::ConstantTimeEq;

/// Compares two byte strings without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
