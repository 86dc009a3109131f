//! End-to-end submission workflow against an in-process stub gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use gatewire_api::crypto::{SerializableBytes, Signer, SigningKeyPair, VerifyingKey};
use gatewire_api::gateway::{FinalityEventStream, GatewayApi};
use gatewire_client::{Gateway, KeyIdentity, SigningIdentity};
use gatewire_crypto::sign::eddsa::{Ed25519KeyPair, Ed25519PrivateKey, Ed25519Signature};
use gatewire_proto::gateway::v1::{
    EvaluateResult, FinalityEvent, PreparedTransaction, ProposedTransaction,
};
use gatewire_proto::ledger::v1::Envelope;
use gatewire_types::error::{CryptoError, ErrorCode, SubmitError};

/// A scriptable gateway that records every request it sees.
struct StubGateway {
    prepare_calls: AtomicUsize,
    commit_calls: AtomicUsize,
    evaluate_calls: AtomicUsize,
    seen_proposals: Mutex<Vec<ProposedTransaction>>,
    eval_value: Vec<u8>,
    events: Vec<Vec<u8>>,
    fail_prepare: bool,
}

impl StubGateway {
    fn new() -> Self {
        Self {
            prepare_calls: AtomicUsize::new(0),
            commit_calls: AtomicUsize::new(0),
            evaluate_calls: AtomicUsize::new(0),
            seen_proposals: Mutex::new(Vec::new()),
            eval_value: b"42".to_vec(),
            events: vec![b"VALID".to_vec()],
            fail_prepare: false,
        }
    }

    fn seen_proposals(&self) -> Vec<ProposedTransaction> {
        self.seen_proposals.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayApi for StubGateway {
    async fn prepare(
        &self,
        proposed: ProposedTransaction,
    ) -> Result<PreparedTransaction, SubmitError> {
        self.prepare_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_prepare {
            return Err(SubmitError::Transport("connection refused".into()));
        }
        self.seen_proposals.lock().unwrap().push(proposed);

        Ok(PreparedTransaction {
            tx_id: "tx123".into(),
            response: Some(EvaluateResult {
                value: b"endorse-result".to_vec(),
            }),
            envelope: Some(Envelope {
                payload: b"opaque".to_vec(),
                signature: Vec::new(),
            }),
        })
    }

    async fn commit(
        &self,
        _prepared: PreparedTransaction,
    ) -> Result<FinalityEventStream, SubmitError> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        let events: Vec<_> = self
            .events
            .iter()
            .map(|value| Ok(FinalityEvent { value: value.clone() }))
            .collect();
        Ok(futures::stream::iter(events).boxed())
    }

    async fn evaluate(&self, proposed: ProposedTransaction) -> Result<Vec<u8>, SubmitError> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_proposals.lock().unwrap().push(proposed);
        Ok(self.eval_value.clone())
    }
}

/// A signer that counts how many times the backend is asked to sign.
struct CountingSigner {
    inner: Ed25519PrivateKey,
    calls: Arc<AtomicUsize>,
}

impl Signer for CountingSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Signer::sign(&self.inner, message)
    }
}

fn test_gateway(api: Arc<StubGateway>) -> (Gateway, Ed25519KeyPair) {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let identity = KeyIdentity::new("Org1", &keypair.public_key());
    let signing_id = SigningIdentity::new(Arc::new(identity), Arc::new(keypair.private_key()));
    (Gateway::new(api, signing_id), keypair)
}

#[tokio::test]
async fn endorse_commit_round_trip() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let (gateway, _) = test_gateway(Arc::clone(&api));

    let mut proposal = gateway
        .network("mychannel")
        .contract("mycc")
        .prepare("put")
        .add_string_arguments(["key1", "value1"])
        .build()?;

    let mut transaction = proposal.endorse().await?;
    assert_eq!(transaction.transaction_id(), "tx123");
    assert_eq!(transaction.result(), Some(b"endorse-result".as_slice()));

    let context = transaction.commit().await?;
    let event = context.outcome().await?;
    assert_eq!(event.value, b"VALID");

    assert_eq!(api.prepare_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.commit_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn evaluate_bypasses_prepare_and_commit() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let (gateway, _) = test_gateway(Arc::clone(&api));

    let mut proposal = gateway
        .network("mychannel")
        .contract("mycc")
        .prepare("get")
        .add_string_arguments(["key1"])
        .build()?;

    let value = proposal.evaluate().await?;
    assert_eq!(value, b"42");

    assert_eq!(api.evaluate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.prepare_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.commit_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn one_signature_covers_evaluate_then_endorse() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let keypair = Ed25519KeyPair::generate().unwrap();
    let sign_calls = Arc::new(AtomicUsize::new(0));
    let signer = CountingSigner {
        inner: keypair.private_key(),
        calls: Arc::clone(&sign_calls),
    };
    let identity = KeyIdentity::new("Org1", &keypair.public_key());
    let gateway = Gateway::new(
        Arc::clone(&api) as Arc<dyn GatewayApi>,
        SigningIdentity::new(Arc::new(identity), Arc::new(signer)),
    );

    let mut proposal = gateway
        .network("mychannel")
        .contract("mycc")
        .prepare("put")
        .build()?;

    proposal.evaluate().await?;
    proposal.endorse().await?;

    assert_eq!(sign_calls.load(Ordering::SeqCst), 1);

    let seen = api.seen_proposals();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    Ok(())
}

#[tokio::test]
async fn signature_verifies_against_the_exact_proposal_bytes() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let (gateway, keypair) = test_gateway(Arc::clone(&api));

    let mut proposal = gateway
        .network("mychannel")
        .contract("mycc")
        .prepare("put")
        .build()?;
    proposal.endorse().await?;

    let seen = api.seen_proposals();
    let signed = seen[0].proposal.as_ref().unwrap();

    let signature = Ed25519Signature::from_bytes(&signed.signature)?;
    keypair
        .public_key()
        .verify(&signed.proposal_bytes, &signature)?;
    Ok(())
}

#[tokio::test]
async fn transport_failure_on_prepare_is_surfaced_unretried() {
    let api = Arc::new(StubGateway {
        fail_prepare: true,
        ..StubGateway::new()
    });
    let (gateway, _) = test_gateway(Arc::clone(&api));

    let mut proposal = gateway
        .network("mychannel")
        .contract("mycc")
        .prepare("put")
        .build()
        .unwrap();

    let err = proposal.endorse().await.unwrap_err();
    assert_eq!(err.code(), "SUBMIT_TRANSPORT_ERROR");
    assert_eq!(api.prepare_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn submit_transaction_drives_the_full_workflow() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let (gateway, _) = test_gateway(Arc::clone(&api));

    let result = gateway
        .network("mychannel")
        .contract("mycc")
        .submit_transaction("put", ["key1", "value1"])
        .await?;

    assert_eq!(result, b"endorse-result");
    assert_eq!(api.prepare_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.commit_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn evaluate_transaction_returns_the_raw_result() -> anyhow::Result<()> {
    let api = Arc::new(StubGateway::new());
    let (gateway, _) = test_gateway(Arc::clone(&api));

    let value = gateway
        .network("mychannel")
        .contract("mycc")
        .evaluate_transaction("get", ["key1"])
        .await?;

    assert_eq!(value, b"42");
    assert_eq!(api.commit_calls.load(Ordering::SeqCst), 0);
    Ok(())
}
