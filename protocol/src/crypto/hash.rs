//! # Hashing Utilities
//!
//! The ledger identifies nearly everything (transactions, ledger headers,
//! state nodes) with a single construction: **SHA-512-half** over a
//! domain-separated preimage.
//!
//! ```text
//! prefix (4 bytes) || payload  ->  SHA-512  ->  first 32 bytes
//! ```
//!
//! The 4-byte prefix (see [`HashPrefix`]) keeps record families apart so one
//! hash function can serve every identifier space. Truncating a 512-bit
//! digest to 256 bits is also markedly faster than SHA-256 on 64-bit
//! hardware, which is why the protocol settled on it.
//!
//! Everything here is a pure function over bytes: no state, no allocation
//! beyond the returned value, safe to call from any thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use thiserror::Error;
use tracing::trace;

use crate::config::{HashPrefix, HASH256_LENGTH};

/// Errors from parsing a [`Hash256`] out of text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashParseError {
    #[error("invalid hex in hash: {0}")]
    InvalidHex(String),

    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Hash256
// ---------------------------------------------------------------------------

/// A 256-bit identifier, rendered externally as 64 uppercase hex characters.
///
/// Transaction hashes are the main producer of these. The uppercase form is
/// what the network reports and indexes, so `Display`, `to_hex` and the
/// serde representation all emit uppercase. Parsing accepts either case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256([u8; HASH256_LENGTH]);

impl Hash256 {
    /// Wraps raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH256_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        let bytes = hex::decode(s).map_err(|e| HashParseError::InvalidHex(e.to_string()))?;
        if bytes.len() != HASH256_LENGTH {
            return Err(HashParseError::InvalidLength {
                expected: HASH256_LENGTH,
                got: bytes.len(),
            });
        }
        let mut out = [0u8; HASH256_LENGTH];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; HASH256_LENGTH] {
        &self.0
    }

    /// Uppercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Hash functions
// ---------------------------------------------------------------------------

/// Full SHA-512 digest.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

/// SHA-512-half: the first 32 bytes of the SHA-512 digest.
pub fn sha512_half(data: &[u8]) -> Hash256 {
    sha512_half_multi(&[data])
}

/// SHA-512-half over several slices fed in order, without concatenating
/// them into a temporary buffer first.
pub fn sha512_half_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; HASH256_LENGTH];
    out.copy_from_slice(&digest[..HASH256_LENGTH]);
    Hash256(out)
}

/// SHA-512-half of `prefix || data`.
pub fn prefixed_sha512_half(prefix: HashPrefix, data: &[u8]) -> Hash256 {
    sha512_half_multi(&[&prefix.bytes(), data])
}

/// Computes the transaction identifier from canonical signed bytes.
///
/// `hash = SHA-512-half("TXN\0" || signed_bytes)`. The result is usable as a
/// provisional handle before the transaction is ever submitted.
pub fn transaction_hash(signed_bytes: &[u8]) -> Hash256 {
    let hash = prefixed_sha512_half(HashPrefix::TransactionId, signed_bytes);
    trace!(len = signed_bytes.len(), %hash, "derived transaction hash");
    hash
}
