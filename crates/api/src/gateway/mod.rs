//! Defines the three-method gateway service boundary.
//!
//! The protocol core is written against [`GatewayApi`] rather than a concrete
//! transport so the submission workflow can be exercised against in-process
//! stubs and so alternative transports can be slotted in without touching the
//! proposal/transaction logic.

use async_trait::async_trait;
use futures::stream::BoxStream;
use gatewire_proto::gateway::v1::{
    FinalityEvent, PreparedTransaction, ProposedTransaction,
};
use gatewire_types::error::{CommitError, SubmitError};

/// The stream over which a commit's single finality event is delivered.
///
/// The stream terminates after delivering the event or an error; a clean end
/// without any item means the network reported nothing.
pub type FinalityEventStream = BoxStream<'static, Result<FinalityEvent, CommitError>>;

/// The remote gateway service: endorsement, commitment, and direct query.
///
/// All three methods address the target channel and transaction through the
/// message payloads, not separate call parameters. Implementations surface
/// transport and server errors as-is; retry policy belongs to the caller.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Submits a signed proposal for endorsement (unary).
    async fn prepare(
        &self,
        proposed: ProposedTransaction,
    ) -> Result<PreparedTransaction, SubmitError>;

    /// Submits a prepared transaction for ordering and opens the finality
    /// event stream (server-streaming; the request is sent once and the
    /// client half-closes).
    async fn commit(
        &self,
        prepared: PreparedTransaction,
    ) -> Result<FinalityEventStream, SubmitError>;

    /// Evaluates a signed proposal read-only (unary). Never changes ledger
    /// state and is safe to retry from the client's perspective.
    async fn evaluate(
        &self,
        proposed: ProposedTransaction,
    ) -> Result<Vec<u8>, SubmitError>;
}
