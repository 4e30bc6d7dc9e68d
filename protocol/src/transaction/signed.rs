//! Signed transactions and the values derived from them.
//!
//! A signed transaction is a pair: the transaction as it was before signing,
//! and the same transaction with signature material attached. Everything
//! else (the submission blob, the transaction hash) is a pure function of
//! the signed half and is recomputed on every call. Nothing is cached, so
//! there is no derived state that could drift from the value it came from.
//!
//! ```text
//! signed transaction -> JSON -> BinaryCodec -> hex -> bytes     (blob)
//!                                                    -> SHA-512-half("TXN\0" || bytes)  (hash)
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::signing::{add_signature_to_transaction, SignableTransaction};
use super::types::TransactionBlob;
use crate::codec::{BinaryCodec, CodecError};
use crate::crypto::hash::{transaction_hash, Hash256};
use crate::crypto::keys::SignatureWithPublicKey;
use crate::error::SigningError;

/// Encodes a transaction into its canonical bytes.
///
/// The transaction is rendered to JSON, handed to `codec`, and the codec's
/// hex output is decoded back to raw bytes. Codec failures are returned
/// unchanged as [`SigningError::Encoding`]. A transaction that fails
/// [`SignableTransaction::validate`] is never handed to the codec.
pub fn encode_transaction<T, C>(transaction: &T, codec: &C) -> Result<TransactionBlob, SigningError>
where
    T: SignableTransaction,
    C: BinaryCodec + ?Sized,
{
    transaction.validate()?;
    let json =
        serde_json::to_string(transaction).map_err(|e| CodecError::Serialization(e.to_string()))?;
    let encoded = codec.encode(&json)?;
    let bytes = hex::decode(&encoded).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
    Ok(TransactionBlob::from_bytes(bytes))
}

/// A transaction paired with its signed form.
///
/// Implementors only supply the two transactions; the blob and hash come
/// from the provided methods and must not be overridden with anything that
/// caches.
pub trait SignedTransaction {
    type Transaction: SignableTransaction;

    /// The transaction with no signature material.
    fn unsigned_transaction(&self) -> &Self::Transaction;

    /// The transaction with signature material attached.
    fn signed_transaction(&self) -> &Self::Transaction;

    /// Canonical bytes of [`signed_transaction`](Self::signed_transaction),
    /// suitable for submission.
    fn signed_transaction_bytes<C: BinaryCodec + ?Sized>(
        &self,
        codec: &C,
    ) -> Result<TransactionBlob, SigningError> {
        encode_transaction(self.signed_transaction(), codec)
    }

    /// The transaction's identifier: SHA-512-half of the hash prefix and
    /// [`signed_transaction_bytes`](Self::signed_transaction_bytes).
    ///
    /// Known before submission, so it can be used to look the transaction
    /// up once it lands in a ledger.
    fn hash<C: BinaryCodec + ?Sized>(&self, codec: &C) -> Result<Hash256, SigningError> {
        let blob = self.signed_transaction_bytes(codec)?;
        Ok(transaction_hash(blob.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// SingleSignedTransaction
// ---------------------------------------------------------------------------

/// A transaction authorized by exactly one key.
///
/// Serializes as `{"unsignedTransaction", "signature", "signedTransaction"}`.
/// Deserializing reads the first two and re-runs [`new`](Self::new), so a
/// stored signed half is never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleSignedTransaction<T> {
    #[serde(rename = "unsignedTransaction")]
    unsigned: T,
    signature: SignatureWithPublicKey,
    #[serde(rename = "signedTransaction")]
    signed: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleSignedParts<T> {
    unsigned_transaction: T,
    signature: SignatureWithPublicKey,
}

impl<'de, T> Deserialize<'de> for SingleSignedTransaction<T>
where
    T: SignableTransaction + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = SingleSignedParts::<T>::deserialize(deserializer)?;
        Self::new(parts.unsigned_transaction, parts.signature).map_err(serde::de::Error::custom)
    }
}

impl<T: SignableTransaction> SingleSignedTransaction<T> {
    /// Attaches `signature` to `unsigned`.
    ///
    /// See [`add_signature_to_transaction`] for the preconditions.
    pub fn new(unsigned: T, signature: SignatureWithPublicKey) -> Result<Self, SigningError> {
        let signed = add_signature_to_transaction(&unsigned, &signature)?;
        debug!(
            signer = %signature.signing_public_key,
            "assembled single-signed transaction"
        );
        Ok(Self {
            unsigned,
            signature,
            signed,
        })
    }

    pub fn signature(&self) -> &SignatureWithPublicKey {
        &self.signature
    }
}

impl<T: SignableTransaction> SignedTransaction for SingleSignedTransaction<T> {
    type Transaction = T;

    fn unsigned_transaction(&self) -> &T {
        &self.unsigned
    }

    fn signed_transaction(&self) -> &T {
        &self.signed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CanonicalJsonCodec;
    use crate::config::TRANSACTION_ID_PREFIX;
    use crate::crypto::hash::sha512_half;
    use crate::crypto::keys::{PublicKey, Signature};
    use crate::transaction::builder::{Transaction, TransactionBuilder};
    use crate::transaction::types::TransactionType;

    const ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    /// A codec that always fails, for checking error propagation.
    struct RejectingCodec;

    impl BinaryCodec for RejectingCodec {
        fn encode(&self, _json: &str) -> Result<String, CodecError> {
            Err(CodecError::Malformed("unsupported field".to_string()))
        }
    }

    /// A codec that returns lowercase hex, which must still decode exactly.
    struct LowercaseCodec;

    impl BinaryCodec for LowercaseCodec {
        fn encode(&self, json: &str) -> Result<String, CodecError> {
            CanonicalJsonCodec.encode(json).map(|h| h.to_lowercase())
        }
    }

    /// A codec that emits garbage.
    struct GarbageCodec;

    impl BinaryCodec for GarbageCodec {
        fn encode(&self, _json: &str) -> Result<String, CodecError> {
            Ok("XYZ".to_string())
        }
    }

    fn signed() -> SingleSignedTransaction<Transaction> {
        let unsigned = TransactionBuilder::new(TransactionType::Payment, ACCOUNT)
            .fee(12)
            .sequence(1)
            .field("Destination", "rrrrrrrrrrrrrrrrrrrrBZbvji")
            .field("Amount", "1000000")
            .build();
        let sig = SignatureWithPublicKey::new(
            PublicKey::from_ed25519([7; 32]),
            Signature::from_bytes(vec![0xAB; 64]).unwrap(),
        );
        SingleSignedTransaction::new(unsigned, sig).unwrap()
    }

    #[test]
    fn keeps_unsigned_and_signed_halves() {
        let tx = signed();
        assert!(!tx.unsigned_transaction().is_signed());
        assert!(tx.signed_transaction().is_signed());
        assert_eq!(
            tx.signed_transaction().signing_public_key,
            Some(tx.signature().signing_public_key)
        );
    }

    #[test]
    fn bytes_are_codec_output() {
        let tx = signed();
        let json = serde_json::to_string(tx.signed_transaction()).unwrap();
        let expected = CanonicalJsonCodec.encode(&json).unwrap();
        let blob = tx.signed_transaction_bytes(&CanonicalJsonCodec).unwrap();
        assert_eq!(blob.to_hex(), expected);
    }

    #[test]
    fn hash_is_prefixed_sha512_half_of_bytes() {
        let tx = signed();
        let blob = tx.signed_transaction_bytes(&CanonicalJsonCodec).unwrap();
        let mut preimage = TRANSACTION_ID_PREFIX.to_vec();
        preimage.extend_from_slice(blob.as_bytes());
        assert_eq!(tx.hash(&CanonicalJsonCodec).unwrap(), sha512_half(&preimage));
    }

    #[test]
    fn repeated_access_is_identical() {
        let tx = signed();
        let codec = CanonicalJsonCodec::new();
        assert_eq!(
            tx.signed_transaction_bytes(&codec).unwrap(),
            tx.signed_transaction_bytes(&codec).unwrap()
        );
        assert_eq!(tx.hash(&codec).unwrap(), tx.hash(&codec).unwrap());
    }

    #[test]
    fn lowercase_codec_output_decodes_to_same_bytes() {
        let tx = signed();
        assert_eq!(
            tx.signed_transaction_bytes(&LowercaseCodec).unwrap(),
            tx.signed_transaction_bytes(&CanonicalJsonCodec).unwrap()
        );
    }

    #[test]
    fn codec_errors_propagate_unchanged() {
        let err = signed().hash(&RejectingCodec).unwrap_err();
        assert_eq!(
            err,
            SigningError::Encoding(CodecError::Malformed("unsupported field".to_string()))
        );
    }

    #[test]
    fn invalid_codec_hex_is_an_encoding_error() {
        let err = signed().signed_transaction_bytes(&GarbageCodec).unwrap_err();
        assert!(matches!(err, SigningError::Encoding(CodecError::InvalidHex(_))));
    }

    #[test]
    fn reserved_field_fails_before_the_codec_runs() {
        let tx = TransactionBuilder::new(TransactionType::Payment, ACCOUNT)
            .field("Signers", serde_json::json!([]))
            .build();
        // RejectingCodec would answer with Encoding if it were reached.
        assert_eq!(
            encode_transaction(&tx, &RejectingCodec),
            Err(SigningError::ReservedField("Signers".into()))
        );
    }

    #[test]
    fn json_carries_both_halves_and_rebuilds_on_read() {
        let tx = signed();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["unsignedTransaction"]["SigningPubKey"], "");
        assert_eq!(
            json["signedTransaction"]["TxnSignature"],
            tx.signature().transaction_signature.base16_value()
        );
        assert_eq!(
            json["signature"]["signingPublicKey"],
            tx.signature().signing_public_key.base16_value()
        );

        let recovered: SingleSignedTransaction<Transaction> = serde_json::from_value(json).unwrap();
        assert_eq!(recovered, tx);
    }

    #[test]
    fn deserialize_rejects_already_signed_input() {
        let tx = signed();
        let json = serde_json::json!({
            "unsignedTransaction": tx.signed_transaction(),
            "signature": tx.signature(),
        });
        let err = serde_json::from_value::<SingleSignedTransaction<Transaction>>(json).unwrap_err();
        assert!(err.to_string().contains("already signed"), "{err}");
    }

    #[test]
    fn signature_changes_hash() {
        let a = signed();
        let b = SingleSignedTransaction::new(
            a.unsigned_transaction().clone(),
            SignatureWithPublicKey::new(
                a.signature().signing_public_key,
                Signature::from_bytes(vec![0xAC; 64]).unwrap(),
            ),
        )
        .unwrap();
        assert_ne!(
            a.hash(&CanonicalJsonCodec).unwrap(),
            b.hash(&CanonicalJsonCodec).unwrap()
        );
    }
}
