//! # Keys and Signatures
//!
//! Value types for the signature material this crate assembles. Nothing in
//! here signs or verifies: keys and signatures arrive already produced by a
//! wallet, HSM, or remote signer, and the job of this module is to hold them
//! faithfully and render them in the ledger's canonical form (uppercase hex).
//!
//! ## Key formats
//!
//! The ledger accepts two key types, both serialized as 33 bytes:
//!
//! - **Ed25519** - the 32-byte point prefixed with `0xED`.
//! - **secp256k1** - SEC1-compressed, first byte `0x02` or `0x03`.
//!
//! The leading byte is all that distinguishes them, so [`PublicKey`] checks
//! it at construction and rejects anything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{ED25519_KEY_PREFIX, PUBLIC_KEY_LENGTH, SECP256K1_KEY_PREFIXES};

/// Errors that can occur while parsing key or signature material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid public key length: expected {expected} bytes, got {got}")]
    InvalidPublicKeyLength { expected: usize, got: usize },

    #[error("unknown public key type prefix 0x{0:02X}")]
    UnknownKeyType(u8),

    #[error("signature must not be empty")]
    EmptySignature,
}

// ---------------------------------------------------------------------------
// KeyType
// ---------------------------------------------------------------------------

/// The signing algorithm a [`PublicKey`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ed25519,
    Secp256k1,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
            Self::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A 33-byte ledger public key.
///
/// Ordering is plain byte order and exists only so keys can live in ordered
/// sets. It is **not** the canonical signer order; that is defined over
/// account IDs (see [`crate::codec::address::AccountId`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Validates length and type prefix.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        key_type_of(bytes[0])?;
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Wraps a raw 32-byte Ed25519 point, adding the `0xED` marker.
    pub fn from_ed25519(point: [u8; 32]) -> Self {
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out[0] = ED25519_KEY_PREFIX;
        out[1..].copy_from_slice(&point);
        Self(out)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn key_type(&self) -> KeyType {
        if self.0[0] == ED25519_KEY_PREFIX {
            KeyType::Ed25519
        } else {
            KeyType::Secp256k1
        }
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Uppercase hex, 66 characters.
    pub fn base16_value(&self) -> String {
        hex::encode_upper(self.0)
    }
}

fn key_type_of(prefix: u8) -> Result<KeyType, KeyError> {
    if prefix == ED25519_KEY_PREFIX {
        Ok(KeyType::Ed25519)
    } else if SECP256K1_KEY_PREFIXES.contains(&prefix) {
        Ok(KeyType::Secp256k1)
    } else {
        Err(KeyError::UnknownKeyType(prefix))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base16_value())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.base16_value())
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.base16_value())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Opaque signature bytes.
///
/// Ed25519 signatures are 64 bytes; secp256k1 signatures are DER-encoded and
/// vary between roughly 70 and 72. This type does not care which, it only
/// refuses to hold an empty value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(KeyError::EmptySignature);
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex: the form the ledger stores in `TxnSignature`.
    pub fn base16_value(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base16_value())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.base16_value();
        if hex_str.len() > 16 {
            write!(f, "Signature({}...)", &hex_str[..16])
        } else {
            write!(f, "Signature({hex_str})")
        }
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.base16_value())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// SignatureWithPublicKey
// ---------------------------------------------------------------------------

/// A signature paired with the key that produced it.
///
/// This is the unit a signer hands back to whoever is assembling the
/// transaction. Equality and ordering are by value, so a set of these
/// naturally collapses exact duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureWithPublicKey {
    pub signing_public_key: PublicKey,
    pub transaction_signature: Signature,
}

impl SignatureWithPublicKey {
    pub fn new(signing_public_key: PublicKey, transaction_signature: Signature) -> Self {
        Self {
            signing_public_key,
            transaction_signature,
        }
    }
}
