use thiserror::Error;

/// Rejected [`Hasher`](crate::Hasher) parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("iteration count must be at least 1")]
    InvalidIterationCount,
    #[error("salt size must be positive and divisible by 8")]
    InvalidSaltSize,
    #[error("key size must be positive and divisible by 8")]
    InvalidKeySize,
}

/// Reasons an encoded hash cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("encoded hash too short")]
    TooShort,
    #[error("unknown format marker: {0:#04x}")]
    UnknownMarker(u8),
    #[error("unsupported digest selector: {0}")]
    UnsupportedDigest(u32),
    #[error("iteration count must be at least 1")]
    ZeroIterations,
    #[error("salt length exceeds encoded hash")]
    SaltOverrun,
}

/// Failures while producing a new hash.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("OS random generator unavailable")]
    Entropy,
    #[error("key derivation failed: {0}")]
    Derive(String),
}
