//! # Gatewire API Crate Lints
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
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Gatewire API
//!
//! Core traits and interfaces for the Gatewire SDK. This crate defines the
//! stable contract between the protocol core and its two external
//! collaborators: the identity/signing backend and the gateway transport.

/// Defines unified traits for cryptographic signing primitives.
pub mod crypto;
/// Re-exports all core error types from the central `gatewire-types` crate.
pub mod error;
/// Defines the three-method gateway service boundary.
pub mod gateway;
/// Defines the `Identity` boundary for caller-held identities.
pub mod identity;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::crypto::{SerializableBytes, Signer, SigningKey, VerifyingKey};
    pub use crate::error::{ErrorCode, GatewayError};
    pub use crate::gateway::GatewayApi;
    pub use crate::identity::Identity;
}
