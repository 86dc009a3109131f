//! Local error types for the `gatewire-crypto` crate.

// Re-export the canonical error type from the API crate.
pub use gatewire_api::error::CryptoError;
