//! The post-endorsement transaction and its streamed commit outcome.

use std::sync::Arc;

use futures::StreamExt;
use gatewire_api::gateway::{FinalityEventStream, GatewayApi};
use gatewire_proto::gateway::v1::{FinalityEvent, PreparedTransaction};
use gatewire_types::error::{CommitError, GatewayError, StateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitState {
    Endorsed,
    Committing,
    Committed,
    Failed,
}

/// An endorsed transaction awaiting commitment.
///
/// The state machine is `Endorsed → Committing → {Committed | Failed}`;
/// `Committing` is entered at most once, so the same endorsement envelope is
/// never submitted twice. A commit whose outcome was never observed (for
/// example because the caller cancelled) stays `Committing`: finality is
/// decided by the network and must then be reconciled out of band.
pub struct Transaction {
    api: Arc<dyn GatewayApi>,
    prepared: PreparedTransaction,
    state: CommitState,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("tx_id", &self.prepared.tx_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    pub(crate) fn new(api: Arc<dyn GatewayApi>, prepared: PreparedTransaction) -> Self {
        Self {
            api,
            prepared,
            state: CommitState::Endorsed,
        }
    }

    /// The transaction ID correlating endorsement with commitment.
    pub fn transaction_id(&self) -> &str {
        &self.prepared.tx_id
    }

    /// The optional evaluate-style result captured at endorsement time.
    pub fn result(&self) -> Option<&[u8]> {
        self.prepared.response.as_ref().map(|r| r.value.as_slice())
    }

    /// Submits the endorsement envelope for ordering and opens the finality
    /// event stream.
    ///
    /// Fails locally, without any network call, if a commit was already
    /// started on this transaction.
    pub async fn commit(&mut self) -> Result<CommitContext<'_>, GatewayError> {
        match self.state {
            CommitState::Endorsed => {}
            CommitState::Committing => return Err(StateError::AlreadyCommitting.into()),
            CommitState::Committed | CommitState::Failed => {
                return Err(StateError::AlreadyCommitted.into())
            }
        }

        // Transition before the call: once the request may have left the
        // client, the envelope must never be submitted again.
        self.state = CommitState::Committing;

        log::debug!("opening commit stream for tx {}", self.prepared.tx_id);
        let events = self.api.commit(self.prepared.clone()).await?;

        Ok(CommitContext {
            transaction: self,
            events,
        })
    }
}

/// A handle over which exactly one finality event is expected.
pub struct CommitContext<'a> {
    transaction: &'a mut Transaction,
    events: FinalityEventStream,
}

impl std::fmt::Debug for CommitContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitContext")
            .field("transaction", &self.transaction)
            .finish_non_exhaustive()
    }
}

impl CommitContext<'_> {
    /// Waits for the single streamed finality event.
    ///
    /// A stream that ends without delivering an event reports
    /// [`CommitError::NoOutcome`], distinct from a transport failure
    /// mid-stream, so callers can tell "the network told us nothing" from
    /// "the network told us it failed".
    pub async fn outcome(mut self) -> Result<FinalityEvent, GatewayError> {
        match self.events.next().await {
            Some(Ok(event)) => {
                self.transaction.state = CommitState::Committed;
                Ok(event)
            }
            Some(Err(e)) => {
                self.transaction.state = CommitState::Failed;
                Err(e.into())
            }
            None => {
                self.transaction.state = CommitState::Failed;
                Err(CommitError::NoOutcome.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gatewire_proto::gateway::v1::ProposedTransaction;
    use gatewire_types::error::{ErrorCode, SubmitError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StreamOnceGateway {
        commit_calls: AtomicUsize,
        events: Vec<Result<FinalityEvent, CommitError>>,
    }

    impl StreamOnceGateway {
        fn new(events: Vec<Result<FinalityEvent, CommitError>>) -> Self {
            Self {
                commit_calls: AtomicUsize::new(0),
                events,
            }
        }
    }

    #[async_trait]
    impl GatewayApi for StreamOnceGateway {
        async fn prepare(
            &self,
            _proposed: ProposedTransaction,
        ) -> Result<PreparedTransaction, SubmitError> {
            Err(SubmitError::Transport("not wired".into()))
        }

        async fn commit(
            &self,
            _prepared: PreparedTransaction,
        ) -> Result<FinalityEventStream, SubmitError> {
            self.commit_calls.fetch_add(1, Ordering::SeqCst);
            let events: Vec<_> = self
                .events
                .iter()
                .map(|e| match e {
                    Ok(ev) => Ok(ev.clone()),
                    Err(CommitError::NoOutcome) => Err(CommitError::NoOutcome),
                    Err(CommitError::Stream(s)) => Err(CommitError::Stream(s.clone())),
                })
                .collect();
            Ok(futures::stream::iter(events).boxed())
        }

        async fn evaluate(&self, _proposed: ProposedTransaction) -> Result<Vec<u8>, SubmitError> {
            Err(SubmitError::Transport("not wired".into()))
        }
    }

    fn endorsed_transaction(api: Arc<StreamOnceGateway>) -> Transaction {
        Transaction::new(
            api,
            PreparedTransaction {
                tx_id: "tx123".into(),
                response: None,
                envelope: None,
            },
        )
    }

    #[tokio::test]
    async fn outcome_returns_the_single_event() {
        let api = Arc::new(StreamOnceGateway::new(vec![Ok(FinalityEvent {
            value: b"VALID".to_vec(),
        })]));
        let mut tx = endorsed_transaction(Arc::clone(&api));

        let ctx = tx.commit().await.unwrap();
        let event = ctx.outcome().await.unwrap();

        assert_eq!(event.value, b"VALID");
        assert_eq!(tx.state, CommitState::Committed);
    }

    #[tokio::test]
    async fn second_commit_is_rejected_without_an_rpc() {
        let api = Arc::new(StreamOnceGateway::new(vec![Ok(FinalityEvent {
            value: b"VALID".to_vec(),
        })]));
        let mut tx = endorsed_transaction(Arc::clone(&api));

        let ctx = tx.commit().await.unwrap();
        ctx.outcome().await.unwrap();

        let err = tx.commit().await.unwrap_err();
        assert_eq!(err.code(), "STATE_ALREADY_COMMITTED");
        assert_eq!(api.commit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unresolved_commit_stays_committing() {
        let api = Arc::new(StreamOnceGateway::new(vec![Ok(FinalityEvent {
            value: b"VALID".to_vec(),
        })]));
        let mut tx = endorsed_transaction(Arc::clone(&api));

        // Open the stream but drop the context without awaiting the outcome,
        // as a cancelled caller would.
        let ctx = tx.commit().await.unwrap();
        drop(ctx);

        assert_eq!(tx.state, CommitState::Committing);
        let err = tx.commit().await.unwrap_err();
        assert_eq!(err.code(), "STATE_ALREADY_COMMITTING");
        assert_eq!(api.commit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_stream_reports_no_outcome() {
        let api = Arc::new(StreamOnceGateway::new(vec![]));
        let mut tx = endorsed_transaction(api);

        let ctx = tx.commit().await.unwrap();
        let err = ctx.outcome().await.unwrap_err();

        assert_eq!(err.code(), "COMMIT_NO_OUTCOME");
        assert_eq!(tx.state, CommitState::Failed);
    }

    #[tokio::test]
    async fn stream_error_is_distinct_from_no_outcome() {
        let api = Arc::new(StreamOnceGateway::new(vec![Err(CommitError::Stream(
            "connection reset".into(),
        ))]));
        let mut tx = endorsed_transaction(api);

        let ctx = tx.commit().await.unwrap();
        let err = ctx.outcome().await.unwrap_err();

        assert_eq!(err.code(), "COMMIT_STREAM_ERROR");
        assert_eq!(tx.state, CommitState::Failed);
    }
}
