//! # Gatewire Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Gatewire Cryptography
//!
//! Concrete cryptographic implementations backing the `gatewire-api` traits:
//! Ed25519 signing keys and the hash functions used for transaction-ID
//! derivation.

pub mod algorithms;
pub mod error;
pub mod sign;
