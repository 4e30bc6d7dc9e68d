//! # Cryptographic Primitives
//!
//! The two things the signing core needs from cryptography:
//!
//! - **SHA-512-half** with domain-separation prefixes, for transaction IDs.
//! - **Key and signature value types**, for holding material produced
//!   elsewhere.
//!
//! There is no signing or verification here. Signatures arrive finished
//! from a wallet, an HSM, or a co-signer three time zones away; this crate
//! only orders, attaches, and hashes them. If you came looking for a place
//! to add `sign()`, you want a different crate.
//!
//! SHA-512-half looks odd the first time you see it (why compute 64 bytes
//! and throw half away?). It is what the ledger uses, so it is what we use.

pub mod hash;
pub mod keys;

pub use hash::{prefixed_sha512_half, sha512, sha512_half, transaction_hash, Hash256};
pub use keys::{KeyError, KeyType, PublicKey, Signature, SignatureWithPublicKey};
