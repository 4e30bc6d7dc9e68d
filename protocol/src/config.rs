//! # Protocol Constants
//!
//! Every byte-exact parameter the signing core depends on lives here. If you
//! find yourself typing `0x54, 0x58` somewhere else, stop and import it.
//!
//! None of these are ours to tune. The ledger picked them years ago, and
//! "fixing" one gets you transactions that hash to something no validator
//! has ever heard of. They are wire format that happens to live in Rust.

use std::fmt;

// ---------------------------------------------------------------------------
// Hash Prefixes
// ---------------------------------------------------------------------------

/// Prefix mixed into the transaction ID hash: ASCII `"TXN"` followed by a
/// zero byte.
pub const TRANSACTION_ID_PREFIX: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// Prefix for single-signature signing data: `"STX\0"`.
pub const TRANSACTION_SIGN_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Prefix for multi-signature signing data: `"SMT\0"`.
pub const TRANSACTION_MULTI_SIGN_PREFIX: [u8; 4] = [0x53, 0x4D, 0x54, 0x00];

/// Prefix for ledger header hashes: `"LWR\0"`.
pub const LEDGER_HEADER_PREFIX: [u8; 4] = [0x4C, 0x57, 0x52, 0x00];

/// Domain-separation tags the ledger prepends before hashing a record.
///
/// Each record family hashes with the same SHA-512-half primitive but a
/// distinct 4-byte tag, so a transaction and a ledger header with identical
/// payload bytes can never share an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashPrefix {
    /// Signed transaction identifier (`TXN\0`).
    TransactionId,
    /// Single-signer signing preimage (`STX\0`).
    TransactionSign,
    /// Multi-signer signing preimage (`SMT\0`).
    TransactionMultiSign,
    /// Ledger header hash (`LWR\0`).
    LedgerHeader,
}

impl HashPrefix {
    /// The raw 4-byte tag.
    pub const fn bytes(self) -> [u8; 4] {
        match self {
            Self::TransactionId => TRANSACTION_ID_PREFIX,
            Self::TransactionSign => TRANSACTION_SIGN_PREFIX,
            Self::TransactionMultiSign => TRANSACTION_MULTI_SIGN_PREFIX,
            Self::LedgerHeader => LEDGER_HEADER_PREFIX,
        }
    }
}

impl fmt::Display for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.bytes()))
    }
}

// ---------------------------------------------------------------------------
// Lengths
// ---------------------------------------------------------------------------

/// Length of a 256-bit hash (and of a SHA-512-half digest) in bytes.
pub const HASH256_LENGTH: usize = 32;

/// Length of a raw account identifier: RIPEMD-160 output.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Length of a serialized public key. Ed25519 keys carry a one-byte type
/// marker in front of their 32 bytes; secp256k1 keys are SEC1-compressed.
pub const PUBLIC_KEY_LENGTH: usize = 33;

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

/// Base58Check version byte for classic account addresses (`r...`).
pub const ACCOUNT_ADDRESS_VERSION: u8 = 0x00;

/// First byte of every Ed25519 public key on the ledger.
pub const ED25519_KEY_PREFIX: u8 = 0xED;

/// Valid first bytes of a compressed secp256k1 public key.
pub const SECP256K1_KEY_PREFIXES: [u8; 2] = [0x02, 0x03];
