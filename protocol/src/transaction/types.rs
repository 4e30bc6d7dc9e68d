//! Core value types for ledger transactions.
//!
//! Field names serialize in the ledger's PascalCase so the JSON handed to the
//! binary codec matches what the network expects without a mapping layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::Address;
use crate::crypto::keys::{KeyError, PublicKey, Signature, SignatureWithPublicKey};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction performs.
///
/// This crate never interprets the type; it only carries it through to the
/// encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Payment,
    AccountSet,
    AccountDelete,
    SetRegularKey,
    SignerListSet,
    TrustSet,
    OfferCreate,
    OfferCancel,
    EscrowCreate,
    EscrowFinish,
    EscrowCancel,
    CheckCreate,
    CheckCash,
    CheckCancel,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug output is exactly the ledger's type name.
        write!(f, "{self:?}")
    }
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// One entry of a multi-signed transaction's `Signers` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    #[serde(rename = "Account")]
    pub account: Address,

    #[serde(rename = "SigningPubKey")]
    pub signing_public_key: PublicKey,

    #[serde(rename = "TxnSignature")]
    pub transaction_signature: Signature,
}

impl Signer {
    pub fn new(account: Address, signature: &SignatureWithPublicKey) -> Self {
        Self {
            account,
            signing_public_key: signature.signing_public_key,
            transaction_signature: signature.transaction_signature.clone(),
        }
    }
}

/// The `{"Signer": {...}}` envelope the ledger wraps around each signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerWrapper {
    #[serde(rename = "Signer")]
    pub signer: Signer,
}

impl SignerWrapper {
    pub fn of(signer: Signer) -> Self {
        Self { signer }
    }
}

// ---------------------------------------------------------------------------
// TransactionBlob
// ---------------------------------------------------------------------------

/// Canonical encoded transaction bytes, ready for submission.
///
/// Rendered as uppercase hex, the form submission endpoints accept as a
/// `tx_blob`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransactionBlob(Vec<u8>);

impl TransactionBlob {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses hex in either case.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| KeyError::InvalidHex(e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl AsRef<[u8]> for TransactionBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TransactionBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TransactionBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionBlob({} bytes)", self.0.len())
    }
}

impl Serialize for TransactionBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
