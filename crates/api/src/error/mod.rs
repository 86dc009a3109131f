// Re-export all core error types from the central types crate.
pub use gatewire_types::error::{
    BuildError, CommitError, CryptoError, ErrorCode, GatewayError, IdentityError, StateError,
    SubmitError,
};
pub use gatewire_types::Result;
