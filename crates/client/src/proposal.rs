//! Proposal construction and the two read paths: evaluate and endorse.

use std::collections::BTreeMap;
use std::sync::Arc;

use gatewire_api::gateway::GatewayApi;
use gatewire_crypto::algorithms::hash::{HashFunction, Sha256Hash};
use gatewire_proto::gateway::v1::ProposedTransaction;
use gatewire_proto::ledger::v1::{
    ChannelHeader, ContractHeaderExtension, ContractId, ContractInput, ContractInvocationSpec,
    ContractProposalPayload, ContractSpec, Header, HeaderType, ProposalEnvelope, SignatureHeader,
    SignedProposal,
};
use gatewire_types::error::{BuildError, GatewayError};
use prost::Message;
use rand::RngCore;

use crate::identity::SigningIdentity;
use crate::transaction::Transaction;

/// Number of random bytes drawn for each proposal's nonce.
const NONCE_LENGTH: usize = 24;

/// Assembles a channel/contract invocation into a canonical, unsigned
/// proposal and derives its transaction identifier.
///
/// Arguments accumulate across calls in the order given; the transient data
/// map is replaced wholesale by each [`ProposalBuilder::transient`] call.
pub struct ProposalBuilder {
    api: Arc<dyn GatewayApi>,
    signing_id: Arc<SigningIdentity>,
    channel_name: String,
    contract_name: String,
    transaction_name: String,
    transient: BTreeMap<String, Vec<u8>>,
    args: Vec<Vec<u8>>,
}

impl ProposalBuilder {
    /// Starts a builder for one invocation of `transaction_name` on the
    /// named contract and channel.
    pub fn new(
        api: Arc<dyn GatewayApi>,
        signing_id: Arc<SigningIdentity>,
        channel_name: impl Into<String>,
        contract_name: impl Into<String>,
        transaction_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            signing_id,
            channel_name: channel_name.into(),
            contract_name: contract_name.into(),
            transaction_name: transaction_name.into(),
            transient: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    /// Appends to the positional argument vector. Repeatable; order is
    /// preserved across calls.
    pub fn add_arguments<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.args.extend(args);
        self
    }

    /// Convenience form of [`ProposalBuilder::add_arguments`] taking UTF-8
    /// strings.
    pub fn add_string_arguments<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_arguments(args.into_iter().map(|s| s.into().into_bytes()))
    }

    /// Replaces the transient data map. Last call wins.
    pub fn transient(mut self, transient: BTreeMap<String, Vec<u8>>) -> Self {
        self.transient = transient;
        self
    }

    /// Assembles the canonical unsigned proposal and derives its
    /// transaction ID. No partial proposal is returned on failure.
    pub fn build(self) -> Result<Proposal, GatewayError> {
        let mut nonce = vec![0u8; NONCE_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        let timestamp = prost_types::Timestamp::from(std::time::SystemTime::now());

        Ok(self.build_with(nonce, timestamp)?)
    }

    // The deterministic core of build(): everything below this point is a
    // pure function of the builder state, the nonce, and the timestamp.
    fn build_with(
        self,
        nonce: Vec<u8>,
        timestamp: prost_types::Timestamp,
    ) -> Result<Proposal, BuildError> {
        if self.contract_name.is_empty() {
            return Err(BuildError::MissingContract);
        }
        if self.transaction_name.is_empty() {
            return Err(BuildError::MissingFunction);
        }

        let creator = self.signing_id.creator()?;
        let tx_id = derive_transaction_id(&nonce, &creator)?;

        // The invoked function name becomes argument zero, matching the
        // contract runtime's invocation convention.
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.transaction_name.into_bytes());
        args.extend(self.args);

        let invocation = ContractInvocationSpec {
            contract_spec: Some(ContractSpec {
                contract_id: Some(ContractId {
                    name: self.contract_name.clone(),
                }),
                input: Some(ContractInput { args }),
            }),
        };

        let extension = ContractHeaderExtension {
            contract_id: Some(ContractId {
                name: self.contract_name,
            }),
        };

        let channel_header = ChannelHeader {
            r#type: HeaderType::EndorserTransaction as i32,
            version: 0,
            timestamp: Some(timestamp),
            channel_id: self.channel_name.clone(),
            tx_id: tx_id.clone(),
            epoch: 0,
            extension: extension.encode_to_vec(),
        };

        let signature_header = SignatureHeader { creator, nonce };

        let header = Header {
            channel_header: channel_header.encode_to_vec(),
            signature_header: signature_header.encode_to_vec(),
        };

        let payload = ContractProposalPayload {
            input: invocation.encode_to_vec(),
            transient_map: self.transient,
        };

        let envelope = ProposalEnvelope {
            header: header.encode_to_vec(),
            payload: payload.encode_to_vec(),
        };

        Ok(Proposal {
            api: self.api,
            signing_id: self.signing_id,
            proposal_bytes: envelope.encode_to_vec(),
            tx_id,
            channel_id: self.channel_name,
            state: SignState::Unsigned,
        })
    }
}

/// Derives the transaction ID binding the nonce to the creator identity.
fn derive_transaction_id(nonce: &[u8], creator: &[u8]) -> Result<String, BuildError> {
    let mut material = Vec::with_capacity(nonce.len() + creator.len());
    material.extend_from_slice(nonce);
    material.extend_from_slice(creator);

    let digest = Sha256Hash
        .hash(&material)
        .map_err(|e| BuildError::Encode(e.to_string()))?;
    Ok(hex::encode(digest))
}

enum SignState {
    Unsigned,
    Signed { signature: Vec<u8> },
}

/// A built proposal, signed lazily at most once at first send.
///
/// The canonical proposal bytes are fixed at build time and never
/// re-serialized; the signature produced on first use is reused verbatim by
/// every subsequent send. A single `Proposal` is not meant for concurrent
/// use by multiple callers.
pub struct Proposal {
    api: Arc<dyn GatewayApi>,
    signing_id: Arc<SigningIdentity>,
    proposal_bytes: Vec<u8>,
    tx_id: String,
    channel_id: String,
    state: SignState,
}

impl std::fmt::Debug for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proposal")
            .field("tx_id", &self.tx_id)
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}

impl Proposal {
    /// The transaction ID derived at build time.
    pub fn transaction_id(&self) -> &str {
        &self.tx_id
    }

    /// The canonical proposal bytes the signature covers.
    pub fn proposal_bytes(&self) -> &[u8] {
        &self.proposal_bytes
    }

    /// Submits the proposal read-only and returns the raw result bytes.
    ///
    /// Never produces ledger state change; safe to retry from the client's
    /// perspective.
    pub async fn evaluate(&mut self) -> Result<Vec<u8>, GatewayError> {
        let proposed = self.signed_proposal()?;
        Ok(self.api.evaluate(proposed).await?)
    }

    /// Submits the proposal for endorsement, yielding a [`Transaction`]
    /// ready to commit. Endorsement failures are surfaced without retry.
    pub async fn endorse(&mut self) -> Result<Transaction, GatewayError> {
        let proposed = self.signed_proposal()?;
        let prepared = self.api.prepare(proposed).await?;
        Ok(Transaction::new(Arc::clone(&self.api), prepared))
    }

    // Signs on first use; later calls reuse the cached signature so the
    // wire request is byte-identical across evaluate/endorse.
    fn signed_proposal(&mut self) -> Result<ProposedTransaction, GatewayError> {
        let signature = match &self.state {
            SignState::Signed { signature } => signature.clone(),
            SignState::Unsigned => {
                let signature = self.signing_id.sign(&self.proposal_bytes)?;
                self.state = SignState::Signed {
                    signature: signature.clone(),
                };
                signature
            }
        };

        Ok(ProposedTransaction {
            proposal: Some(SignedProposal {
                proposal_bytes: self.proposal_bytes.clone(),
                signature,
            }),
            tx_id: self.tx_id.clone(),
            channel_id: self.channel_id.clone(),
        })
    }
}
