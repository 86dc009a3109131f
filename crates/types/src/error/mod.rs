//! Core error types for the Gatewire SDK.
//!
//! Each enum covers one phase of the transaction submission protocol, so a
//! caller can always tell which phase failed without parsing message text.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from the identity and signing backend.
///
/// These are always fatal to the current build or sign operation and are
/// never retried internally.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity's credential material could not be serialized.
    #[error("Failed to serialize identity credential: {0}")]
    Credential(String),
    /// The signing backend failed to produce a signature.
    #[error("Failed to sign message: {0}")]
    Sign(String),
}

impl ErrorCode for IdentityError {
    fn code(&self) -> &'static str {
        match self {
            Self::Credential(_) => "IDENTITY_CREDENTIAL_ERROR",
            Self::Sign(_) => "IDENTITY_SIGN_ERROR",
        }
    }
}

/// Errors constructing a proposal, surfaced before any network call is made.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No contract name was supplied.
    #[error("Contract name must not be empty")]
    MissingContract,
    /// No transaction function name was supplied.
    #[error("Transaction function name must not be empty")]
    MissingFunction,
    /// The identity backend failed while assembling the proposal header.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
    /// The proposal payload could not be serialized.
    #[error("Failed to encode proposal: {0}")]
    Encode(String),
}

impl ErrorCode for BuildError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingContract => "BUILD_MISSING_CONTRACT",
            Self::MissingFunction => "BUILD_MISSING_FUNCTION",
            Self::Identity(_) => "BUILD_IDENTITY_ERROR",
            Self::Encode(_) => "BUILD_ENCODE_ERROR",
        }
    }
}

/// Errors submitting a proposal to the gateway over the wire.
///
/// `Rejected` means the gateway processed the request and refused it;
/// `Transport` means the infrastructure failed and the request's fate at the
/// server is unknown. Retry policy is a caller concern, not this SDK's.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The gateway rejected the request after processing it.
    #[error("Gateway rejected request ({code}): {message}")]
    Rejected {
        /// Stable identifier of the rejection class reported by the gateway.
        code: String,
        /// Human-readable rejection detail from the gateway.
        message: String,
    },
    /// The request failed at the transport layer.
    #[error("Gateway transport error: {0}")]
    Transport(String),
}

impl ErrorCode for SubmitError {
    fn code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "SUBMIT_REJECTED",
            Self::Transport(_) => "SUBMIT_TRANSPORT_ERROR",
        }
    }
}

/// Errors observing the finality outcome of a committed transaction.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The commit stream ended cleanly without delivering an event, so the
    /// network reported nothing about the transaction's fate.
    #[error("Commit stream closed without a finality event")]
    NoOutcome,
    /// The commit stream failed mid-flight.
    #[error("Commit stream error: {0}")]
    Stream(String),
}

impl ErrorCode for CommitError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoOutcome => "COMMIT_NO_OUTCOME",
            Self::Stream(_) => "COMMIT_STREAM_ERROR",
        }
    }
}

/// Local misuse of the transaction state machine.
///
/// These are synchronous errors raised before any network I/O happens.
#[derive(Debug, Error)]
pub enum StateError {
    /// `commit` was invoked while a commit was already in flight.
    #[error("Transaction is already committing")]
    AlreadyCommitting,
    /// `commit` was invoked after the transaction reached a terminal state.
    #[error("Transaction already reached a terminal state")]
    AlreadyCommitted,
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyCommitting => "STATE_ALREADY_COMMITTING",
            Self::AlreadyCommitted => "STATE_ALREADY_COMMITTED",
        }
    }
}

/// The umbrella error returned by client-facing gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The identity backend failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
    /// Proposal construction failed before any network call.
    #[error("Failed to create proposal: {0}")]
    Build(#[from] BuildError),
    /// Submission to the gateway failed.
    #[error("Failed to submit to gateway: {0}")]
    Submit(#[from] SubmitError),
    /// The commit outcome could not be observed.
    #[error("Failed to obtain commit outcome: {0}")]
    Commit(#[from] CommitError),
    /// The transaction state machine was misused locally.
    #[error("Invalid transaction state: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for GatewayError {
    fn code(&self) -> &'static str {
        match self {
            Self::Identity(e) => e.code(),
            Self::Build(e) => e.code(),
            Self::Submit(e) => e.code(),
            Self::Commit(e) => e.code(),
            Self::State(e) => e.code(),
        }
    }
}

/// Errors from cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The signature failed cryptographic verification.
    #[error("Signature verification failed")]
    VerificationFailed,
    /// The provided key material is malformed or invalid for the algorithm.
    #[error("Invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed for the algorithm.
    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),
    /// A generic failure in an underlying cryptographic library.
    #[error("Cryptographic operation failed: {0}")]
    OperationFailed(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::VerificationFailed => "CRYPTO_VERIFICATION_FAILED",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::OperationFailed(_) => "CRYPTO_OPERATION_FAILED",
        }
    }
}
