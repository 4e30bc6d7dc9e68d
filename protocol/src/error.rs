//! Error type for assembling and hashing signed transactions.
//!
//! Every variant is a caller-input problem. None of them is transient, so
//! nothing in this crate retries: a transaction that fails to encode once
//! will fail the same way every time.

use thiserror::Error;

use crate::codec::{Address, AddressError, CodecError};

/// Errors produced while attaching signatures or deriving signed bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The transaction could not be canonically encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] CodecError),

    /// A public key or account address could not be derived or decoded.
    #[error("address format error: {0}")]
    AddressFormat(#[from] AddressError),

    /// Multi-signature assembly was requested with no signatures.
    #[error("signature set must not be empty")]
    EmptySignatureSet,

    /// Two signatures resolve to the same account.
    #[error("duplicate signer: {account} appears more than once")]
    DuplicateSigner { account: Address },

    /// The transaction handed in as "unsigned" already carries signature
    /// material.
    #[error("transaction is already signed: {0}")]
    AlreadySigned(String),

    /// A type-specific field uses a name the transaction already models
    /// directly (`Signers`, `TxnSignature`, `Fee`, ...). Left in, it would
    /// shadow the real field in the encoded form.
    #[error("reserved field name used as a type-specific field: {0}")]
    ReservedField(String),

    /// A builder was asked to assemble without an unsigned transaction.
    #[error("no unsigned transaction supplied")]
    MissingTransaction,

    /// The unsigned transaction names a signing key other than the one that
    /// produced the signature.
    #[error("signing public key mismatch: transaction names {expected}, signature is from {got}")]
    SigningKeyMismatch { expected: String, got: String },
}
