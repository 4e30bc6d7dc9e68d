//! # Classic Addresses
//!
//! A classic address is the human-facing form of an account ID:
//!
//! ```text
//! public_key (33 bytes)
//!     -> SHA-256 -> RIPEMD-160          = account ID (20 bytes)
//!     -> 0x00 || account ID             = versioned payload
//!     -> Base58Check (ripple alphabet)  = r...
//! ```
//!
//! The ripple alphabet puts `r` where Bitcoin puts `1`, which is why every
//! account address starts with `r`. The 4-byte checksum is double SHA-256,
//! same as Bitcoin.

use std::fmt;

use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{AddressCodec, AddressError};
use crate::config::{ACCOUNT_ADDRESS_VERSION, ACCOUNT_ID_LENGTH};
use crate::crypto::keys::PublicKey;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A raw 20-byte account identifier.
///
/// `Ord` is the canonical signer order. Because every account ID has the
/// same fixed length, lexicographic byte comparison is exactly comparison of
/// the bytes read as an unsigned big-endian integer; the derived impl
/// relies on that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ACCOUNT_ID_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ACCOUNT_ID_LENGTH,
                got: bytes.len(),
            });
        }
        let mut out = [0u8; ACCOUNT_ID_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A classic account address (`r...`).
///
/// Holding an `Address` does not guarantee it decodes; parsing happens in
/// [`AddressCodec::decode_account_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// ClassicAddressCodec
// ---------------------------------------------------------------------------

/// The ledger's standard address codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicAddressCodec;

impl ClassicAddressCodec {
    pub fn new() -> Self {
        Self
    }

    /// RIPEMD-160(SHA-256(public_key)).
    pub fn account_id(&self, public_key: &PublicKey) -> AccountId {
        let sha = Sha256::digest(public_key.as_bytes());
        let mut hasher = Ripemd160::new();
        hasher.update(sha);
        let digest = hasher.finalize();
        let mut out = [0u8; ACCOUNT_ID_LENGTH];
        out.copy_from_slice(&digest);
        AccountId(out)
    }

    /// Base58Check-encodes an account ID with the account version byte.
    pub fn encode_account_id(&self, account_id: &AccountId) -> Address {
        let mut payload = Vec::with_capacity(ACCOUNT_ID_LENGTH + 1);
        payload.push(ACCOUNT_ADDRESS_VERSION);
        payload.extend_from_slice(account_id.as_bytes());
        let encoded = bs58::encode(payload)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .with_check()
            .into_string();
        Address(encoded)
    }
}

impl AddressCodec for ClassicAddressCodec {
    fn derive_address(&self, public_key: &PublicKey) -> Result<Address, AddressError> {
        Ok(self.encode_account_id(&self.account_id(public_key)))
    }

    fn decode_account_id(&self, address: &Address) -> Result<AccountId, AddressError> {
        let payload = bs58::decode(address.as_str())
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .with_check(None)
            .into_vec()
            .map_err(|e| match e {
                bs58::decode::Error::InvalidChecksum { .. } => {
                    AddressError::InvalidChecksum(address.to_string())
                }
                other => AddressError::InvalidBase58 {
                    address: address.to_string(),
                    reason: other.to_string(),
                },
            })?;

        let (version, account_id) = payload.split_first().ok_or(AddressError::InvalidLength {
            expected: ACCOUNT_ID_LENGTH,
            got: 0,
        })?;
        if *version != ACCOUNT_ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion {
                expected: ACCOUNT_ADDRESS_VERSION,
                got: *version,
            });
        }
        AccountId::from_slice(account_id)
    }
}
