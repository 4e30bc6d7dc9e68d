// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Signing - Core Library
//!
//! The last step before a transaction can be submitted: take an unsigned
//! transaction and finished signatures, produce the exact signed form the
//! ledger expects, and compute the hash the ledger will index it under.
//!
//! Correctness here is byte-exact. The network hashes the signed bytes with
//! a fixed prefix and verifies multi-signer arrays in one mandated order; a
//! transaction that is "equivalent" but differently ordered is a different
//! transaction.
//!
//! ## Architecture
//!
//! - **config** - Hash prefixes, field lengths, address version bytes.
//! - **crypto** - SHA-512-half hashing and key/signature value types.
//! - **codec** - Binary and address codec seams, with default implementations.
//! - **transaction** - Transaction model, single- and multi-signed assembly.
//! - **error** - The [`SigningError`] taxonomy.
//! - **logging** - Optional tracing subscriber setup.
//!
//! ## Design Philosophy
//!
//! 1. Everything is a value. Nothing is mutated; signing produces new values.
//! 2. Derived data (blobs, hashes) is recomputed, never cached.
//! 3. No signing or verification. Signatures arrive finished.
//! 4. Every failure is the caller's input. Nothing retries.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod transaction;

pub use error::SigningError;
