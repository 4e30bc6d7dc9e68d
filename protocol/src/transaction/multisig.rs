//! Multi-signature assembly.
//!
//! A multi-signed transaction carries one `Signers` entry per co-signer, and
//! the ledger only accepts that array in one order: ascending by account ID,
//! with each 20-byte ID read as an unsigned big-endian integer. Verifiers
//! reject anything else, and because the array is part of the signed bytes,
//! any other order also produces a different transaction hash.
//!
//! Signers therefore never control the order. They hand in an unordered set
//! of (public key, signature) pairs and [`canonical_signers`] recomputes the
//! order from scratch every time:
//!
//! 1. derive each signer's address from its public key,
//! 2. decode the address to its raw account ID,
//! 3. sort by account ID,
//! 4. reject the set if two entries share an account ID.
//!
//! Rejecting duplicates matters: keeping one and dropping the other would
//! yield a transaction with fewer signatures than the caller intended.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use super::signed::SignedTransaction;
use super::signing::{add_multi_signatures_to_transaction, SignableTransaction};
use super::types::{Signer, SignerWrapper};
use crate::codec::{AccountId, AddressCodec, ClassicAddressCodec};
use crate::crypto::keys::SignatureWithPublicKey;
use crate::error::SigningError;

/// Builds the canonically ordered `Signers` array for a signature set.
///
/// Fails with [`SigningError::EmptySignatureSet`] before touching the
/// address codec if `signatures` is empty, with
/// [`SigningError::AddressFormat`] if any key cannot be resolved to an
/// account ID, and with [`SigningError::DuplicateSigner`] if two signatures
/// resolve to the same account.
pub fn canonical_signers<'a, I, A>(
    signatures: I,
    address_codec: &A,
) -> Result<Vec<SignerWrapper>, SigningError>
where
    I: IntoIterator<Item = &'a SignatureWithPublicKey>,
    A: AddressCodec + ?Sized,
{
    let mut keyed: Vec<(AccountId, SignerWrapper)> = Vec::new();
    for signature in signatures {
        let account = address_codec.derive_address(&signature.signing_public_key)?;
        let account_id = address_codec.decode_account_id(&account)?;
        keyed.push((account_id, SignerWrapper::of(Signer::new(account, signature))));
    }

    if keyed.is_empty() {
        return Err(SigningError::EmptySignatureSet);
    }

    // Stable sort on the account ID alone: equal IDs end up adjacent, which
    // is all the duplicate check below needs.
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    if let Some(pair) = keyed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        let account = pair[0].1.signer.account.clone();
        warn!(%account, "rejecting signature set with duplicate signer");
        return Err(SigningError::DuplicateSigner { account });
    }

    Ok(keyed.into_iter().map(|(_, signer)| signer).collect())
}

// ---------------------------------------------------------------------------
// MultiSignedTransaction
// ---------------------------------------------------------------------------

/// A transaction authorized by a set of co-signers.
///
/// Constructed only through [`MultiSignedTransaction::new`] or the
/// [builder](MultiSignedTransactionBuilder), both of which derive the signed
/// transaction from the signature set. The `Signers` array of
/// [`signed_transaction`](SignedTransaction::signed_transaction) is always
/// the canonical ordering of [`signatures`](Self::signatures).
///
/// The JSON form holds `unsignedTransaction`, `signatures` and
/// `signedTransaction`. Reading it back ignores `signedTransaction` and
/// reassembles from the other two with [`ClassicAddressCodec`]; callers on
/// a different address scheme should deserialize the parts themselves and
/// call [`new`](Self::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiSignedTransaction<T> {
    #[serde(rename = "unsignedTransaction")]
    unsigned: T,
    signatures: BTreeSet<SignatureWithPublicKey>,
    #[serde(rename = "signedTransaction")]
    signed: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiSignedParts<T> {
    unsigned_transaction: T,
    signatures: BTreeSet<SignatureWithPublicKey>,
}

impl<'de, T> Deserialize<'de> for MultiSignedTransaction<T>
where
    T: SignableTransaction + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = MultiSignedParts::<T>::deserialize(deserializer)?;
        Self::new(parts.unsigned_transaction, parts.signatures, &ClassicAddressCodec)
            .map_err(serde::de::Error::custom)
    }
}

impl<T: SignableTransaction> MultiSignedTransaction<T> {
    pub fn builder() -> MultiSignedTransactionBuilder<T> {
        MultiSignedTransactionBuilder::new()
    }

    /// Orders `signatures` canonically and attaches them to `unsigned`.
    ///
    /// Exact duplicate pairs collapse (the input is a set). Distinct pairs
    /// that resolve to the same account are an error.
    pub fn new<I, A>(unsigned: T, signatures: I, address_codec: &A) -> Result<Self, SigningError>
    where
        I: IntoIterator<Item = SignatureWithPublicKey>,
        A: AddressCodec + ?Sized,
    {
        let signatures: BTreeSet<SignatureWithPublicKey> = signatures.into_iter().collect();
        if signatures.is_empty() {
            return Err(SigningError::EmptySignatureSet);
        }

        let signers = canonical_signers(&signatures, address_codec)?;
        let signed = add_multi_signatures_to_transaction(&unsigned, signers)?;
        debug!(
            signer_count = signatures.len(),
            "assembled multi-signed transaction"
        );

        Ok(Self {
            unsigned,
            signatures,
            signed,
        })
    }

    /// The signatures this transaction was assembled from.
    pub fn signatures(&self) -> &BTreeSet<SignatureWithPublicKey> {
        &self.signatures
    }
}

impl<T: SignableTransaction> SignedTransaction for MultiSignedTransaction<T> {
    type Transaction = T;

    fn unsigned_transaction(&self) -> &T {
        &self.unsigned
    }

    fn signed_transaction(&self) -> &T {
        &self.signed
    }
}

// ---------------------------------------------------------------------------
// MultiSignedTransactionBuilder
// ---------------------------------------------------------------------------

/// Collects an unsigned transaction and signatures, then assembles.
///
/// Useful when signatures trickle in from several co-signers:
///
/// ```
/// use ledger_signing::codec::ClassicAddressCodec;
/// use ledger_signing::crypto::{PublicKey, Signature, SignatureWithPublicKey};
/// use ledger_signing::transaction::{
///     MultiSignedTransaction, SignedTransaction, TransactionBuilder, TransactionType,
/// };
///
/// let unsigned = TransactionBuilder::new(TransactionType::Payment, "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
///     .fee(30)
///     .sequence(4)
///     .build();
///
/// let alice = SignatureWithPublicKey::new(
///     PublicKey::from_ed25519([1; 32]),
///     Signature::from_bytes(vec![0x11; 64]).unwrap(),
/// );
/// let bob = SignatureWithPublicKey::new(
///     PublicKey::from_ed25519([2; 32]),
///     Signature::from_bytes(vec![0x22; 64]).unwrap(),
/// );
///
/// let multi = MultiSignedTransaction::builder()
///     .unsigned_transaction(unsigned)
///     .add_signature(bob)
///     .add_signature(alice)
///     .build(&ClassicAddressCodec)
///     .unwrap();
///
/// assert_eq!(multi.signed_transaction().signers.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MultiSignedTransactionBuilder<T> {
    unsigned: Option<T>,
    signatures: BTreeSet<SignatureWithPublicKey>,
}

impl<T: SignableTransaction> MultiSignedTransactionBuilder<T> {
    pub fn new() -> Self {
        Self {
            unsigned: None,
            signatures: BTreeSet::new(),
        }
    }

    pub fn unsigned_transaction(mut self, transaction: T) -> Self {
        self.unsigned = Some(transaction);
        self
    }

    pub fn add_signature(mut self, signature: SignatureWithPublicKey) -> Self {
        self.signatures.insert(signature);
        self
    }

    pub fn signatures(mut self, signatures: impl IntoIterator<Item = SignatureWithPublicKey>) -> Self {
        self.signatures.extend(signatures);
        self
    }

    /// Assembles the transaction.
    ///
    /// Fails with [`SigningError::EmptySignatureSet`] if no signature was
    /// added and [`SigningError::MissingTransaction`] if no unsigned
    /// transaction was set.
    pub fn build<A: AddressCodec + ?Sized>(
        self,
        address_codec: &A,
    ) -> Result<MultiSignedTransaction<T>, SigningError> {
        if self.signatures.is_empty() {
            return Err(SigningError::EmptySignatureSet);
        }
        let unsigned = self.unsigned.ok_or(SigningError::MissingTransaction)?;
        MultiSignedTransaction::new(unsigned, self.signatures, address_codec)
    }
}

impl<T: SignableTransaction> Default for MultiSignedTransactionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;

    use super::*;
    use crate::codec::{Address, AddressError, CanonicalJsonCodec, ClassicAddressCodec};
    use crate::crypto::keys::{PublicKey, Signature};
    use crate::transaction::builder::{Transaction, TransactionBuilder};
    use crate::transaction::types::TransactionType;

    const ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    /// Resolves keys through a fixed table so tests can pick account IDs.
    /// Addresses are simply the account ID in hex.
    #[derive(Default)]
    struct TableCodec {
        ids: BTreeMap<PublicKey, [u8; 20]>,
        calls: Cell<usize>,
    }

    impl TableCodec {
        fn with(mut self, key: PublicKey, id: [u8; 20]) -> Self {
            self.ids.insert(key, id);
            self
        }
    }

    impl AddressCodec for TableCodec {
        fn derive_address(&self, public_key: &PublicKey) -> Result<Address, AddressError> {
            self.calls.set(self.calls.get() + 1);
            self.ids
                .get(public_key)
                .map(|id| Address::new(hex::encode_upper(id)))
                .ok_or_else(|| AddressError::InvalidBase58 {
                    address: public_key.base16_value(),
                    reason: "unknown key".to_string(),
                })
        }

        fn decode_account_id(&self, address: &Address) -> Result<AccountId, AddressError> {
            let bytes = hex::decode(address.as_str()).map_err(|e| AddressError::InvalidBase58 {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
            AccountId::from_slice(&bytes)
        }
    }

    fn key(fill: u8) -> PublicKey {
        PublicKey::from_ed25519([fill; 32])
    }

    fn sig(key_fill: u8, sig_fill: u8) -> SignatureWithPublicKey {
        SignatureWithPublicKey::new(
            key(key_fill),
            Signature::from_bytes(vec![sig_fill; 64]).unwrap(),
        )
    }

    fn id_with_first_byte(first: u8, rest: u8) -> [u8; 20] {
        let mut id = [rest; 20];
        id[0] = first;
        id
    }

    fn unsigned() -> Transaction {
        TransactionBuilder::new(TransactionType::Payment, ACCOUNT)
            .fee(30)
            .sequence(4)
            .field("Destination", "rrrrrrrrrrrrrrrrrrrrBZbvji")
            .field("Amount", "1000000")
            .build()
    }

    fn accounts(tx: &MultiSignedTransaction<Transaction>) -> Vec<String> {
        tx.signed_transaction()
            .signers
            .iter()
            .map(|w| w.signer.account.to_string())
            .collect()
    }

    #[test]
    fn json_rebuilds_signed_half_from_signatures() {
        let multi =
            MultiSignedTransaction::new(unsigned(), [sig(2, 0xB2), sig(1, 0xA1)], &ClassicAddressCodec)
                .unwrap();
        let mut json = serde_json::to_value(&multi).unwrap();
        assert_eq!(json["signatures"].as_array().unwrap().len(), 2);
        assert_eq!(json["signedTransaction"]["Signers"].as_array().unwrap().len(), 2);

        // A tampered signed half is recomputed, not trusted.
        json["signedTransaction"]["Signers"] = serde_json::json!([]);
        let recovered: MultiSignedTransaction<Transaction> = serde_json::from_value(json).unwrap();
        assert_eq!(recovered, multi);
    }

    #[test]
    fn json_with_empty_signatures_is_rejected() {
        let json = serde_json::json!({
            "unsignedTransaction": unsigned(),
            "signatures": [],
        });
        let err = serde_json::from_value::<MultiSignedTransaction<Transaction>>(json).unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{err}");
    }

    #[test]
    fn reserved_signers_field_cannot_erase_signers() {
        let tx = TransactionBuilder::new(TransactionType::Payment, ACCOUNT)
            .fee(30)
            .sequence(4)
            .field("Signers", serde_json::json!([]))
            .build();
        let err = MultiSignedTransaction::new(tx, [sig(1, 0xA1), sig(2, 0xB2)], &ClassicAddressCodec)
            .unwrap_err();
        assert_eq!(err, SigningError::ReservedField("Signers".into()));
    }

    #[test]
    fn reserved_signature_field_is_not_treated_as_unsigned() {
        let tx = TransactionBuilder::new(TransactionType::Payment, ACCOUNT)
            .field("TxnSignature", "DEADBEEF")
            .build();
        let err = MultiSignedTransaction::new(tx, [sig(1, 0xA1)], &ClassicAddressCodec).unwrap_err();
        assert_eq!(err, SigningError::ReservedField("TxnSignature".into()));
    }

    #[test]
    fn single_signature_yields_single_signer() {
        let codec = ClassicAddressCodec::new();
        let s = sig(1, 0xA1);
        let multi = MultiSignedTransaction::new(unsigned(), [s.clone()], &codec).unwrap();

        let signers = &multi.signed_transaction().signers;
        assert_eq!(signers.len(), 1);
        let signer = &signers[0].signer;
        assert_eq!(signer.account, codec.derive_address(&s.signing_public_key).unwrap());
        assert_eq!(signer.signing_public_key, s.signing_public_key);
        assert_eq!(signer.transaction_signature, s.transaction_signature);
    }

    #[test]
    fn orders_by_account_id_not_public_key() {
        // Key 1 < key 2 < key 3 byte-wise, but their account IDs run the
        // other way.
        let codec = TableCodec::default()
            .with(key(1), id_with_first_byte(0x30, 0))
            .with(key(2), id_with_first_byte(0x20, 0))
            .with(key(3), id_with_first_byte(0x10, 0));

        let multi =
            MultiSignedTransaction::new(unsigned(), [sig(1, 1), sig(2, 2), sig(3, 3)], &codec)
                .unwrap();
        let keys: Vec<PublicKey> = multi
            .signed_transaction()
            .signers
            .iter()
            .map(|w| w.signer.signing_public_key)
            .collect();
        assert_eq!(keys, vec![key(3), key(2), key(1)]);
    }

    #[test]
    fn orders_by_account_id_not_signature() {
        let codec = TableCodec::default()
            .with(key(1), id_with_first_byte(0x02, 0))
            .with(key(2), id_with_first_byte(0x01, 0));

        // Signature bytes sort key 1 first; account IDs sort key 2 first.
        let multi =
            MultiSignedTransaction::new(unsigned(), [sig(1, 0x01), sig(2, 0xFF)], &codec).unwrap();
        assert_eq!(
            multi.signed_transaction().signers[0].signer.signing_public_key,
            key(2)
        );
    }

    #[test]
    fn high_bit_is_magnitude() {
        // 0x80.. must sort after 0x7F.. (unsigned), and 0x00FF.. before 0x0100..
        let codec = TableCodec::default()
            .with(key(1), id_with_first_byte(0x80, 0x00))
            .with(key(2), id_with_first_byte(0x7F, 0xFF))
            .with(key(3), id_with_first_byte(0x00, 0xFF))
            .with(key(4), id_with_first_byte(0x01, 0x00));

        let multi = MultiSignedTransaction::new(
            unsigned(),
            [sig(1, 1), sig(2, 2), sig(3, 3), sig(4, 4)],
            &codec,
        )
        .unwrap();
        let keys: Vec<PublicKey> = multi
            .signed_transaction()
            .signers
            .iter()
            .map(|w| w.signer.signing_public_key)
            .collect();
        assert_eq!(keys, vec![key(3), key(4), key(2), key(1)]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let codec = ClassicAddressCodec::new();
        let a = sig(1, 0x11);
        let b = sig(2, 0x22);
        let c = sig(3, 0x33);

        let forward =
            MultiSignedTransaction::new(unsigned(), [a.clone(), b.clone(), c.clone()], &codec)
                .unwrap();
        let backward = MultiSignedTransaction::new(unsigned(), [c, a, b], &codec).unwrap();

        assert_eq!(forward.signed_transaction(), backward.signed_transaction());
        assert_eq!(
            forward.hash(&CanonicalJsonCodec).unwrap(),
            backward.hash(&CanonicalJsonCodec).unwrap()
        );
    }

    #[test]
    fn signer_accounts_are_sorted_by_decoded_id() {
        let codec = ClassicAddressCodec::new();
        let multi = MultiSignedTransaction::new(
            unsigned(),
            (1..=6).map(|i| sig(i, i)),
            &codec,
        )
        .unwrap();

        let ids: Vec<AccountId> = accounts(&multi)
            .iter()
            .map(|a| codec.decode_account_id(&Address::from(a.as_str())).unwrap())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn empty_set_rejected_before_codec_use() {
        let codec = TableCodec::default();
        let none: Vec<SignatureWithPublicKey> = Vec::new();
        let err = MultiSignedTransaction::new(unsigned(), none, &codec).unwrap_err();
        assert_eq!(err, SigningError::EmptySignatureSet);
        assert_eq!(codec.calls.get(), 0);

        let empty: BTreeSet<SignatureWithPublicKey> = BTreeSet::new();
        let err = canonical_signers(&empty, &codec).unwrap_err();
        assert_eq!(err, SigningError::EmptySignatureSet);
        assert_eq!(codec.calls.get(), 0);
    }

    #[test]
    fn same_key_twice_is_duplicate_signer() {
        let codec = ClassicAddressCodec::new();
        let err = MultiSignedTransaction::new(unsigned(), [sig(1, 0x01), sig(1, 0x02)], &codec)
            .unwrap_err();
        let expected = codec.derive_address(&key(1)).unwrap();
        assert_eq!(err, SigningError::DuplicateSigner { account: expected });
    }

    #[test]
    fn distinct_keys_same_account_is_duplicate_signer() {
        let shared = id_with_first_byte(0x42, 0x42);
        let codec = TableCodec::default()
            .with(key(1), shared)
            .with(key(2), shared)
            .with(key(3), id_with_first_byte(0x01, 0));
        let err =
            MultiSignedTransaction::new(unsigned(), [sig(1, 1), sig(2, 2), sig(3, 3)], &codec)
                .unwrap_err();
        assert!(matches!(err, SigningError::DuplicateSigner { .. }), "{err:?}");
    }

    #[test]
    fn identical_pairs_collapse() {
        let codec = ClassicAddressCodec::new();
        let s = sig(5, 0x55);
        let multi =
            MultiSignedTransaction::new(unsigned(), [s.clone(), s.clone()], &codec).unwrap();
        assert_eq!(multi.signatures().len(), 1);
        assert_eq!(multi.signed_transaction().signers.len(), 1);
    }

    #[test]
    fn address_errors_propagate() {
        let codec = TableCodec::default().with(key(1), [1; 20]);
        let err = MultiSignedTransaction::new(unsigned(), [sig(1, 1), sig(9, 9)], &codec)
            .unwrap_err();
        assert!(matches!(err, SigningError::AddressFormat(_)), "{err:?}");
    }

    #[test]
    fn signed_input_is_rejected() {
        let codec = ClassicAddressCodec::new();
        let once = MultiSignedTransaction::new(unsigned(), [sig(1, 1)], &codec).unwrap();
        let err = MultiSignedTransaction::new(
            once.signed_transaction().clone(),
            [sig(2, 2)],
            &codec,
        )
        .unwrap_err();
        assert!(matches!(err, SigningError::AlreadySigned(_)));
    }

    #[test]
    fn unsigned_half_is_untouched() {
        let tx = unsigned();
        let multi =
            MultiSignedTransaction::new(tx.clone(), [sig(1, 1), sig(2, 2)], &ClassicAddressCodec)
                .unwrap();
        assert_eq!(multi.unsigned_transaction(), &tx);

        // Only the signature fields differ between the halves.
        let mut stripped = multi.signed_transaction().clone();
        stripped.signers.clear();
        assert_eq!(stripped, tx);
    }

    #[test]
    fn builder_matches_direct_construction() {
        let codec = ClassicAddressCodec::new();
        let direct =
            MultiSignedTransaction::new(unsigned(), [sig(1, 1), sig(2, 2)], &codec).unwrap();
        let built = MultiSignedTransaction::builder()
            .unsigned_transaction(unsigned())
            .add_signature(sig(2, 2))
            .signatures([sig(1, 1)])
            .build(&codec)
            .unwrap();
        assert_eq!(direct, built);
    }

    #[test]
    fn builder_requires_signatures_and_transaction() {
        let codec = ClassicAddressCodec::new();
        let err = MultiSignedTransaction::<Transaction>::builder()
            .unsigned_transaction(unsigned())
            .build(&codec)
            .unwrap_err();
        assert_eq!(err, SigningError::EmptySignatureSet);

        let err = MultiSignedTransaction::<Transaction>::builder()
            .add_signature(sig(1, 1))
            .build(&codec)
            .unwrap_err();
        assert_eq!(err, SigningError::MissingTransaction);
    }
}
