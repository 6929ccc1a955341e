//! Async front-end: one task owns one [`Relayer`].
//!
//! Callers talk to the task through a bounded channel and await a reply per
//! command, so votes for a proposal are applied strictly in arrival order and
//! a batch boundary is never crossed concurrently. Relayers for different
//! proposals are separate tasks with nothing shared.

use crate::relayer::{Relayer, RelayerStatus};
use crate::sink::BatchSink;
use crate::{RelayerConfig, RelayerError};
use svrp_codec::SignedVote;
use svrp_types::{BatchId, Timestamp};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Vote {
        vote: SignedVote,
        now: Timestamp,
        reply: Reply<Result<Option<BatchId>, RelayerError>>,
    },
    Flush {
        now: Timestamp,
        reply: Reply<Result<Option<BatchId>, RelayerError>>,
    },
    Status {
        reply: Reply<RelayerStatus>,
    },
}

/// Cloneable handle to a running relayer task.
#[derive(Clone)]
pub struct RelayerHandle {
    tx: mpsc::Sender<Command>,
}

impl RelayerHandle {
    /// Spawn a relayer task on the current runtime.
    ///
    /// The task ends once every handle is dropped; its join handle yields the
    /// relayer back so pending votes and history can be inspected.
    pub fn spawn<S>(config: &RelayerConfig, sink: S) -> (Self, JoinHandle<Relayer<S>>)
    where
        S: BatchSink + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let relayer = Relayer::new(config, sink);
        let task = tokio::spawn(run(relayer, rx));
        (Self { tx }, task)
    }

    /// Submit a vote using the wall clock.
    pub async fn vote(&self, vote: SignedVote) -> Result<Option<BatchId>, RelayerError> {
        self.vote_at(vote, Timestamp::now()).await
    }

    pub async fn vote_at(
        &self,
        vote: SignedVote,
        now: Timestamp,
    ) -> Result<Option<BatchId>, RelayerError> {
        self.request(|reply| Command::Vote { vote, now, reply })
            .await?
    }

    /// Submit whatever is pending, using the wall clock.
    pub async fn flush(&self) -> Result<Option<BatchId>, RelayerError> {
        self.flush_at(Timestamp::now()).await
    }

    pub async fn flush_at(&self, now: Timestamp) -> Result<Option<BatchId>, RelayerError> {
        self.request(|reply| Command::Flush { now, reply }).await?
    }

    pub async fn status(&self) -> Result<RelayerStatus, RelayerError> {
        self.request(|reply| Command::Status { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, RelayerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| RelayerError::Stopped)?;
        rx.await.map_err(|_| RelayerError::Stopped)
    }
}

async fn run<S: BatchSink>(mut relayer: Relayer<S>, mut rx: mpsc::Receiver<Command>) -> Relayer<S> {
    tracing::info!(proposal = %relayer.status().proposal_id, "relayer task started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Vote { vote, now, reply } => {
                let _ = reply.send(relayer.vote(vote, now));
            }
            Command::Flush { now, reply } => {
                let _ = reply.send(relayer.submit_batch(now));
            }
            Command::Status { reply } => {
                let _ = reply.send(relayer.status());
            }
        }
    }
    tracing::info!(
        proposal = %relayer.status().proposal_id,
        pending = relayer.current().len(),
        "relayer task stopped"
    );
    relayer
}
