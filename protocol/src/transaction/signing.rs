//! Attaching finished signature material to a transaction.
//!
//! Signing itself happens elsewhere (wallet, HSM, remote signer). What
//! arrives here is a public key and a signature; the functions below check
//! that the transaction is in a state where that material can go on, and
//! produce a new transaction value carrying it. The input is never mutated.

use serde::Serialize;

use super::types::SignerWrapper;
use crate::crypto::keys::{PublicKey, Signature, SignatureWithPublicKey};
use crate::error::SigningError;

/// The operations the signing core needs from a transaction type.
///
/// Implementors are plain values: `with_*` return a new transaction and
/// leave `self` untouched. `Serialize` must produce the transaction's ledger
/// JSON form, which is what the binary codec encodes.
pub trait SignableTransaction: Clone + Serialize {
    /// The single signer's key, or `None` when the field is empty.
    fn signing_public_key(&self) -> Option<&PublicKey>;

    fn transaction_signature(&self) -> Option<&Signature>;

    fn signers(&self) -> &[SignerWrapper];

    /// Structural checks beyond signature state. Runs before any signature
    /// is attached and before every encode.
    fn validate(&self) -> Result<(), SigningError> {
        Ok(())
    }

    /// A copy with `SigningPubKey` and `TxnSignature` set.
    fn with_single_signature(&self, public_key: PublicKey, signature: Signature) -> Self;

    /// A copy with `Signers` set and `SigningPubKey` cleared to the empty
    /// multi-sign marker.
    fn with_signers(&self, signers: Vec<SignerWrapper>) -> Self;
}

/// Attaches a single signature.
///
/// Fails with [`SigningError::AlreadySigned`] if the transaction already
/// carries a signature or signers, and with
/// [`SigningError::SigningKeyMismatch`] if it names a different signing key
/// than the one that produced `signature`.
pub fn add_signature_to_transaction<T: SignableTransaction>(
    transaction: &T,
    signature: &SignatureWithPublicKey,
) -> Result<T, SigningError> {
    ensure_unsigned(transaction)?;

    if let Some(existing) = transaction.signing_public_key() {
        if *existing != signature.signing_public_key {
            return Err(SigningError::SigningKeyMismatch {
                expected: existing.base16_value(),
                got: signature.signing_public_key.base16_value(),
            });
        }
    }

    Ok(transaction.with_single_signature(
        signature.signing_public_key,
        signature.transaction_signature.clone(),
    ))
}

/// Attaches an already-ordered signer list.
///
/// The caller is responsible for ordering; see
/// [`super::multisig::canonical_signers`]. Fails with
/// [`SigningError::EmptySignatureSet`] on an empty list, and with
/// [`SigningError::AlreadySigned`] if the transaction carries a signature,
/// signers, or a non-empty `SigningPubKey`.
pub fn add_multi_signatures_to_transaction<T: SignableTransaction>(
    transaction: &T,
    signers: Vec<SignerWrapper>,
) -> Result<T, SigningError> {
    if signers.is_empty() {
        return Err(SigningError::EmptySignatureSet);
    }
    ensure_unsigned(transaction)?;
    if let Some(pk) = transaction.signing_public_key() {
        return Err(SigningError::AlreadySigned(format!(
            "multi-signed transactions must have an empty SigningPubKey, found {pk}"
        )));
    }

    Ok(transaction.with_signers(signers))
}

fn ensure_unsigned<T: SignableTransaction>(transaction: &T) -> Result<(), SigningError> {
    transaction.validate()?;
    if transaction.transaction_signature().is_some() {
        return Err(SigningError::AlreadySigned(
            "TxnSignature is already set".to_string(),
        ));
    }
    if !transaction.signers().is_empty() {
        return Err(SigningError::AlreadySigned(format!(
            "{} signer(s) already attached",
            transaction.signers().len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
