//! # Codec Collaborators
//!
//! The signing core depends on two encoders it does not own:
//!
//! - a **binary codec** that turns a transaction's JSON form into canonical
//!   wire bytes (returned as hex), and
//! - an **address codec** that derives account addresses from public keys
//!   and decodes addresses back into raw 20-byte account IDs.
//!
//! Both are modelled as traits so callers can plug in whichever
//! implementation their deployment uses. The crate ships one implementation
//! of each: [`CanonicalJsonCodec`] and [`ClassicAddressCodec`].

pub mod address;
pub mod binary;

use thiserror::Error;

use crate::crypto::keys::PublicKey;

pub use address::{AccountId, Address, ClassicAddressCodec};
pub use binary::CanonicalJsonCodec;

/// Failures from a [`BinaryCodec`] or from preparing its input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The transaction could not be rendered to its canonical text form.
    #[error("transaction serialization failed: {0}")]
    Serialization(String),

    /// The codec rejected its input.
    #[error("malformed transaction: {0}")]
    Malformed(String),

    /// The codec produced output that is not valid hex.
    #[error("codec returned invalid hex: {0}")]
    InvalidHex(String),
}

/// Failures from an [`AddressCodec`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 address '{address}': {reason}")]
    InvalidBase58 { address: String, reason: String },

    #[error("address checksum mismatch: {0}")]
    InvalidChecksum(String),

    #[error("unexpected address version: expected 0x{expected:02X}, got 0x{got:02X}")]
    InvalidVersion { expected: u8, got: u8 },

    #[error("invalid account ID length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

/// Canonical binary encoding of a transaction.
///
/// Input is the transaction's JSON text; output is the canonical encoding as
/// a hex string. Implementations must be deterministic: equal input always
/// yields byte-identical output.
pub trait BinaryCodec {
    fn encode(&self, json: &str) -> Result<String, CodecError>;
}

/// Account address derivation and decoding.
pub trait AddressCodec {
    /// Derives the classic address controlled by `public_key`.
    fn derive_address(&self, public_key: &PublicKey) -> Result<Address, AddressError>;

    /// Decodes an address into its fixed-length raw account ID.
    fn decode_account_id(&self, address: &Address) -> Result<AccountId, AddressError>;
}

impl<T: BinaryCodec + ?Sized> BinaryCodec for &T {
    fn encode(&self, json: &str) -> Result<String, CodecError> {
        (**self).encode(json)
    }
}

impl<T: AddressCodec + ?Sized> AddressCodec for &T {
    fn derive_address(&self, public_key: &PublicKey) -> Result<Address, AddressError> {
        (**self).derive_address(public_key)
    }

    fn decode_account_id(&self, address: &Address) -> Result<AccountId, AddressError> {
        (**self).decode_account_id(address)
    }
}
