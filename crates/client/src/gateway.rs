//! Gateway connection handles and the tonic transport adapter.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use gatewire_api::gateway::{FinalityEventStream, GatewayApi};
use gatewire_proto::gateway::v1::gateway_client::GatewayClient;
use gatewire_proto::gateway::v1::{PreparedTransaction, ProposedTransaction};
use gatewire_types::error::{CommitError, GatewayError, SubmitError};
use tokio::sync::Mutex;
use tonic::transport::Channel;

use crate::identity::SigningIdentity;
use crate::proposal::ProposalBuilder;

/// Helper to distinguish logic errors (from the remote) vs transport errors (from tonic)
fn map_grpc_error(status: tonic::Status) -> SubmitError {
    match status.code() {
        // InvalidArgument and FailedPrecondition mean the gateway processed
        // the request and rejected it (bad signature, policy failure, state
        // conflict).
        tonic::Code::InvalidArgument | tonic::Code::FailedPrecondition => SubmitError::Rejected {
            code: format!("{:?}", status.code()),
            message: status.message().to_string(),
        },

        // Everything else (Unavailable, DeadlineExceeded, Internal, etc.)
        // suggests the infrastructure failed, not the logic.
        _ => SubmitError::Transport(status.to_string()),
    }
}

/// A connection to a gateway endpoint on behalf of one signing identity.
///
/// The gateway and the signing identity are shared, read-mostly
/// collaborators: any number of proposals and transactions may reference
/// them concurrently.
pub struct Gateway {
    api: Arc<dyn GatewayApi>,
    signing_id: Arc<SigningIdentity>,
}

impl Gateway {
    /// Fronts an existing gateway service with the given signing identity.
    pub fn new(api: Arc<dyn GatewayApi>, signing_id: SigningIdentity) -> Self {
        Self {
            api,
            signing_id: Arc::new(signing_id),
        }
    }

    /// Connects lazily to a gateway endpoint over gRPC.
    ///
    /// The connection is established when the first RPC is attempted, so
    /// construction succeeds even while the endpoint is still coming up.
    pub fn connect(addr: &str, signing_id: SigningIdentity) -> Result<Self, GatewayError> {
        let api = GrpcGateway::connect_lazy(addr)?;
        Ok(Self::new(Arc::new(api), signing_id))
    }

    /// A handle on the named channel.
    pub fn network(&self, name: impl Into<String>) -> Network {
        Network {
            api: Arc::clone(&self.api),
            signing_id: Arc::clone(&self.signing_id),
            name: name.into(),
        }
    }
}

/// A handle on one ledger channel.
pub struct Network {
    api: Arc<dyn GatewayApi>,
    signing_id: Arc<SigningIdentity>,
    name: String,
}

impl Network {
    /// The channel name this handle addresses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A handle on the named contract within this channel.
    pub fn contract(&self, name: impl Into<String>) -> Contract {
        Contract {
            api: Arc::clone(&self.api),
            signing_id: Arc::clone(&self.signing_id),
            channel_name: self.name.clone(),
            contract_name: name.into(),
        }
    }
}

/// A handle on one contract, from which proposals are built.
pub struct Contract {
    api: Arc<dyn GatewayApi>,
    signing_id: Arc<SigningIdentity>,
    channel_name: String,
    contract_name: String,
}

impl Contract {
    /// The contract name this handle addresses.
    pub fn name(&self) -> &str {
        &self.contract_name
    }

    /// Starts a proposal for one invocation of `transaction_name`.
    pub fn prepare(&self, transaction_name: impl Into<String>) -> ProposalBuilder {
        ProposalBuilder::new(
            Arc::clone(&self.api),
            Arc::clone(&self.signing_id),
            self.channel_name.clone(),
            self.contract_name.clone(),
            transaction_name,
        )
    }

    /// Builds, endorses, and commits an invocation, waiting for finality.
    ///
    /// Returns the endorsement-time result bytes once the finality event
    /// arrives.
    pub async fn submit_transaction<I, S>(
        &self,
        transaction_name: impl Into<String>,
        args: I,
    ) -> Result<Vec<u8>, GatewayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut proposal = self
            .prepare(transaction_name)
            .add_string_arguments(args)
            .build()?;
        let mut transaction = proposal.endorse().await?;

        let context = transaction.commit().await?;
        context.outcome().await?;

        Ok(transaction.result().map(<[u8]>::to_vec).unwrap_or_default())
    }

    /// Builds and evaluates an invocation read-only, bypassing endorsement
    /// and commitment entirely.
    pub async fn evaluate_transaction<I, S>(
        &self,
        transaction_name: impl Into<String>,
        args: I,
    ) -> Result<Vec<u8>, GatewayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prepare(transaction_name)
            .add_string_arguments(args)
            .build()?
            .evaluate()
            .await
    }
}

/// The tonic-backed gateway transport.
pub struct GrpcGateway {
    client: Mutex<GatewayClient<Channel>>,

    // Stored address for logging/debugging
    addr: String,
}

impl std::fmt::Debug for GrpcGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcGateway")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl GrpcGateway {
    /// Creates a client for the endpoint without connecting yet.
    ///
    /// Connection errors surface on the first RPC, which keeps construction
    /// usable during startup races where the gateway is not listening yet.
    pub fn connect_lazy(addr: &str) -> Result<Self, SubmitError> {
        let endpoint = if addr.starts_with("http") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        };

        let channel = Channel::from_shared(endpoint)
            .map_err(|e| SubmitError::Transport(format!("invalid gateway address: {}", e)))?
            .connect_lazy();

        log::debug!("gateway client created for {}", addr);
        Ok(Self {
            client: Mutex::new(GatewayClient::new(channel)),
            addr: addr.to_string(),
        })
    }

    /// The address this client was created for.
    pub fn destination_addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl GatewayApi for GrpcGateway {
    async fn prepare(
        &self,
        proposed: ProposedTransaction,
    ) -> Result<PreparedTransaction, SubmitError> {
        let mut client = self.client.lock().await;
        let resp = client
            .prepare(proposed)
            .await
            .map_err(map_grpc_error)?
            .into_inner();
        Ok(resp)
    }

    async fn commit(
        &self,
        prepared: PreparedTransaction,
    ) -> Result<FinalityEventStream, SubmitError> {
        let mut client = self.client.lock().await;
        let stream = client
            .commit(prepared)
            .await
            .map_err(map_grpc_error)?
            .into_inner();

        Ok(stream
            .map_err(|status| CommitError::Stream(status.to_string()))
            .boxed())
    }

    async fn evaluate(&self, proposed: ProposedTransaction) -> Result<Vec<u8>, SubmitError> {
        let mut client = self.client.lock().await;
        let resp = client
            .evaluate(proposed)
            .await
            .map_err(map_grpc_error)?
            .into_inner();
        Ok(resp.value)
    }
}
