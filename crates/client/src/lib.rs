//! # Gatewire Client Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Gatewire Client
//!
//! The client-side transaction submission protocol. A caller builds a
//! cryptographically addressed proposal, has it signed by a caller-held
//! identity, and drives it through one of three fates against the remote
//! gateway: endorsement (`Prepare`), commitment (`Commit`, with a streamed
//! finality outcome), or direct read-only query (`Evaluate`).

pub mod gateway;
pub mod identity;
pub mod proposal;
pub mod transaction;

// Re-export for convenience
pub use gateway::{Contract, Gateway, GrpcGateway, Network};
pub use identity::{KeyIdentity, SigningIdentity};
pub use proposal::{Proposal, ProposalBuilder};
pub use transaction::{CommitContext, Transaction};
