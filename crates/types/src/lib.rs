#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Gatewire Types
//!
//! This crate is the foundational library for the Gatewire SDK, containing
//! the error taxonomy shared by every other crate in the workspace.
//!
//! ## Architectural Role
//!
//! As the base crate, `gatewire-types` has minimal dependencies and is itself
//! a dependency for almost every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical definition
//! for the error enums that describe each phase of the transaction
//! submission protocol.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::GatewayError> = std::result::Result<T, E>;

/// A unified set of all error types used across the SDK.
pub mod error;
