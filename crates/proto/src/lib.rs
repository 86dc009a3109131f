//! # Gatewire Proto
//!
//! The wire schema for the gateway submission protocol:
//! 1. **Ledger envelope family**: the canonical proposal, headers, and
//!    signed-envelope messages (`gatewire.ledger.v1`).
//! 2. **Gateway service**: the three-method `Gateway` gRPC service and its
//!    request/response messages (`gatewire.gateway.v1`).
//!
//! The `.proto` sources under `proto/` are the source of truth. The bindings
//! under `src/gen/` are committed so the workspace builds without a host
//! `protoc`; they mirror `tonic-build` output for these packages.

// Ledger envelope family.
// Nested inside `v1` to match the proto package hierarchy
// `gatewire.ledger.v1` so cross-package references resolve.
pub mod ledger {
    pub mod v1 {
        include!("gen/gatewire.ledger.v1.rs");
    }
    // Flatten the API for users
    pub use v1::*;
}

// Gateway service.
pub mod gateway {
    pub mod v1 {
        include!("gen/gatewire.gateway.v1.rs");
    }
    pub use v1::*;
}
