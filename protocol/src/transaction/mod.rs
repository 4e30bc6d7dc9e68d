//! # Transaction Module
//!
//! Turning an unsigned transaction plus finished signatures into something
//! the ledger will accept, and computing the identifier it will be known by.
//!
//! Most of the code here is plain value plumbing. The one place that is not is
//! [`canonical_signers`]: get the signer order wrong and the network rejects
//! the transaction with an error message that will not tell you why.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     - Value types (TransactionType, Signer, SignerWrapper, TransactionBlob)
//! builder.rs   - Transaction record and fluent TransactionBuilder
//! signing.rs   - SignableTransaction seam and signature attach operations
//! signed.rs    - SignedTransaction: canonical bytes and hash, single-signer form
//! multisig.rs  - Canonical signer ordering and MultiSignedTransaction
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** - [`TransactionBuilder`] produces an unsigned [`Transaction`].
//! 2. **Sign** - external signers return [`SignatureWithPublicKey`] values.
//! 3. **Assemble** - [`SingleSignedTransaction::new`] for one signer, or
//!    [`MultiSignedTransaction::new`] for a signer set.
//! 4. **Derive** - [`SignedTransaction::signed_transaction_bytes`] for the
//!    submission blob and [`SignedTransaction::hash`] for the identifier.
//!
//! [`SignatureWithPublicKey`]: crate::crypto::SignatureWithPublicKey

pub mod builder;
pub mod multisig;
pub mod signed;
pub mod signing;
pub mod types;

pub use builder::{Transaction, TransactionBuilder};
pub use multisig::{canonical_signers, MultiSignedTransaction, MultiSignedTransactionBuilder};
pub use signed::{encode_transaction, SignedTransaction, SingleSignedTransaction};
pub use signing::{
    add_multi_signatures_to_transaction, add_signature_to_transaction, SignableTransaction,
};
pub use types::{Signer, SignerWrapper, TransactionBlob, TransactionType};
