//! Transaction construction via the builder pattern.
//!
//! [`Transaction`] is a faithful, lightly-typed model of a ledger transaction:
//! the common fields every transaction type shares are typed, and the
//! type-specific ones (`Destination`, `Amount`, `LimitAmount`, ...) ride along
//! in a flattened JSON map. The signing core needs nothing more than that: it
//! attaches signature material and hands the JSON to the binary codec.
//!
//! The builder does not sign. That happens in [`super::signing`], so
//! construction stays testable without any key material.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::signing::SignableTransaction;
use super::types::{SignerWrapper, TransactionType};
use crate::codec::Address;
use crate::crypto::keys::{PublicKey, Signature};
use crate::error::SigningError;

/// Ledger field names that [`Transaction`] models as typed fields. None of
/// them may appear in [`Transaction::fields`]: the flattened map would emit
/// a second key with the same name, and whichever one the codec keeps wins.
pub const RESERVED_FIELD_NAMES: &[&str] = &[
    "TransactionType",
    "Account",
    "Fee",
    "Sequence",
    "Flags",
    "LastLedgerSequence",
    "SigningPubKey",
    "TxnSignature",
    "Signers",
];

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction, signed or not.
///
/// Signature state lives in three fields:
///
/// - `SigningPubKey`: the single signer's key, or the empty string when the
///   transaction is unsigned or multi-signed.
/// - `TxnSignature`: present only on single-signed transactions.
/// - `Signers`: present only on multi-signed transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionType")]
    pub transaction_type: TransactionType,

    /// The account that originates the transaction and pays the fee.
    #[serde(rename = "Account")]
    pub account: Address,

    /// Fee in drops. Serialized as a decimal string, as the ledger does.
    #[serde(rename = "Fee", with = "drops")]
    pub fee: u64,

    #[serde(rename = "Sequence")]
    pub sequence: u32,

    #[serde(rename = "Flags", default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,

    #[serde(
        rename = "LastLedgerSequence",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_ledger_sequence: Option<u32>,

    #[serde(rename = "SigningPubKey", default, with = "signing_pub_key")]
    pub signing_public_key: Option<PublicKey>,

    #[serde(rename = "TxnSignature", default, skip_serializing_if = "Option::is_none")]
    pub transaction_signature: Option<Signature>,

    #[serde(rename = "Signers", default, skip_serializing_if = "Vec::is_empty")]
    pub signers: Vec<SignerWrapper>,

    /// Type-specific fields, keyed by their ledger field name. Must not use
    /// any of [`RESERVED_FIELD_NAMES`].
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Transaction {
    /// Returns `true` if any signature material is attached.
    pub fn is_signed(&self) -> bool {
        self.transaction_signature.is_some() || !self.signers.is_empty()
    }

    /// Returns `true` if the transaction carries a `Signers` array.
    pub fn is_multi_signed(&self) -> bool {
        !self.signers.is_empty()
    }

    /// Looks up a type-specific field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl SignableTransaction for Transaction {
    fn validate(&self) -> Result<(), SigningError> {
        match self
            .fields
            .keys()
            .find(|name| RESERVED_FIELD_NAMES.contains(&name.as_str()))
        {
            Some(name) => Err(SigningError::ReservedField(name.clone())),
            None => Ok(()),
        }
    }

    fn signing_public_key(&self) -> Option<&PublicKey> {
        self.signing_public_key.as_ref()
    }

    fn transaction_signature(&self) -> Option<&Signature> {
        self.transaction_signature.as_ref()
    }

    fn signers(&self) -> &[SignerWrapper] {
        &self.signers
    }

    fn with_single_signature(&self, public_key: PublicKey, signature: Signature) -> Self {
        Self {
            signing_public_key: Some(public_key),
            transaction_signature: Some(signature),
            ..self.clone()
        }
    }

    fn with_signers(&self, signers: Vec<SignerWrapper>) -> Self {
        Self {
            signing_public_key: None,
            signers,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] values.
///
/// ```
/// use ledger_signing::transaction::{TransactionBuilder, TransactionType};
///
/// let tx = TransactionBuilder::new(TransactionType::Payment, "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
///     .fee(12)
///     .sequence(1)
///     .field("Destination", "rrrrrrrrrrrrrrrrrrrrBZbvji")
///     .field("Amount", "1000000")
///     .build();
///
/// assert!(!tx.is_signed());
/// ```
pub struct TransactionBuilder {
    transaction_type: TransactionType,
    account: Address,
    fee: u64,
    sequence: u32,
    flags: Option<u32>,
    last_ledger_sequence: Option<u32>,
    signing_public_key: Option<PublicKey>,
    fields: BTreeMap<String, Value>,
}

impl TransactionBuilder {
    /// Defaults: `fee` 0, `sequence` 0, no flags, no signing key.
    pub fn new(transaction_type: TransactionType, account: impl Into<Address>) -> Self {
        Self {
            transaction_type,
            account: account.into(),
            fee: 0,
            sequence: 0,
            flags: None,
            last_ledger_sequence: None,
            signing_public_key: None,
            fields: BTreeMap::new(),
        }
    }

    /// Sets the fee in drops.
    pub fn fee(mut self, drops: u64) -> Self {
        self.fee = drops;
        self
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn last_ledger_sequence(mut self, ledger_index: u32) -> Self {
        self.last_ledger_sequence = Some(ledger_index);
        self
    }

    /// Names the single signer's key up front. Single-signers sign over a
    /// transaction that already contains their key, so it is usually set
    /// here rather than at attach time.
    pub fn signing_public_key(mut self, public_key: PublicKey) -> Self {
        self.signing_public_key = Some(public_key);
        self
    }

    /// Sets a type-specific field. Setting the same name twice keeps the
    /// last value.
    ///
    /// Names in [`RESERVED_FIELD_NAMES`] have their own setters (or are
    /// signature material). Passing one here is not caught until the
    /// transaction is signed or encoded, which then fails with
    /// [`SigningError::ReservedField`].
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            transaction_type: self.transaction_type,
            account: self.account,
            fee: self.fee,
            sequence: self.sequence,
            flags: self.flags,
            last_ledger_sequence: self.last_ledger_sequence,
            signing_public_key: self.signing_public_key,
            transaction_signature: None,
            signers: Vec::new(),
            fields: self.fields,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

mod drops {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `SigningPubKey` is always present on the wire; an empty string means
/// "no single signer".
mod signing_pub_key {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::crypto::keys::PublicKey;

    pub fn serialize<S: Serializer>(
        value: &Option<PublicKey>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(pk) => serializer.serialize_str(&pk.base16_value()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PublicKey>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(None);
        }
        PublicKey::from_hex(&s)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
