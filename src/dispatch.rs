//! Mutation Dispatch
//!
//! Persistence calls run as tokio tasks keyed by the container they write.
//! Each dispatch gets a per-container sequence number; results come back
//! over a channel as `Completion`s.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::commands::{BoardBackend, MoveCardArgs, ReorderCardsArgs, ReorderColumnsArgs};

/// Container a mutation writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKey {
    /// Column order of a board
    Board(u32),
    /// Card order of a column
    Column(u32),
}

/// What the server keeps when writes to one container overlap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionOrdering {
    /// Tasks run concurrently; whichever finishes last is stored
    #[default]
    LastCompletedWins,
    /// Tasks of a container run in issue order; older completions are stale.
    /// A card move waits on both its source and target columns.
    LastIssuedWins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ReorderColumns(ReorderColumnsArgs),
    ReorderCards(ReorderCardsArgs),
    MoveCard { source_column_id: u32, args: MoveCardArgs },
}

impl Mutation {
    pub fn key(&self) -> ContainerKey {
        match self {
            Mutation::ReorderColumns(args) => ContainerKey::Board(args.board_id),
            Mutation::ReorderCards(args) => ContainerKey::Column(args.column_id),
            Mutation::MoveCard { args, .. } => ContainerKey::Column(args.target_column_id),
        }
    }

    /// Every container the mutation rewrites, `key()` first
    pub fn touched(&self) -> Vec<ContainerKey> {
        let key = self.key();
        match self {
            Mutation::MoveCard { source_column_id, .. } if ContainerKey::Column(*source_column_id) != key => {
                vec![key, ContainerKey::Column(*source_column_id)]
            }
            _ => vec![key],
        }
    }

    /// Message shown to the user when this mutation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Mutation::ReorderColumns(_) => "Failed to save column order",
            Mutation::ReorderCards(_) => "Failed to save card order",
            Mutation::MoveCard { .. } => "Failed to move card",
        }
    }

    async fn send<B: BoardBackend + ?Sized>(&self, backend: &B) -> Result<(), String> {
        match self {
            Mutation::ReorderColumns(args) => backend.reorder_columns(args.clone()).await,
            Mutation::ReorderCards(args) => backend.reorder_cards(args.clone()).await,
            Mutation::MoveCard { args, .. } => backend.move_card(args.clone()).await,
        }
    }
}

/// Result of one dispatched mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub key: ContainerKey,
    pub seq: u64,
    pub mutation: Mutation,
    pub result: Result<(), String>,
}

pub struct MutationQueue<B: BoardBackend + 'static> {
    backend: Arc<B>,
    ordering: CompletionOrdering,
    latest_seq: HashMap<ContainerKey, u64>,
    /// Done signal of the last task per container, awaited by the next one under `LastIssuedWins`
    tails: HashMap<ContainerKey, watch::Receiver<bool>>,
    in_flight: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<B: BoardBackend + 'static> MutationQueue<B> {
    pub fn new(backend: Arc<B>, ordering: CompletionOrdering) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            ordering,
            latest_seq: HashMap::new(),
            tails: HashMap::new(),
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn ordering(&self) -> CompletionOrdering {
        self.ordering
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Dispatches not yet received back
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn latest_issued(&self, key: ContainerKey) -> u64 {
        self.latest_seq.get(&key).copied().unwrap_or(0)
    }

    /// Spawn the backend call and return its sequence number. Never blocks.
    pub fn dispatch(&mut self, mutation: Mutation) -> u64 {
        let key = mutation.key();
        let seq = self.latest_seq.entry(key).or_insert(0);
        *seq += 1;
        let seq = *seq;

        let (done_tx, done_rx) = watch::channel(false);
        let mut previous = Vec::new();
        if self.ordering == CompletionOrdering::LastIssuedWins {
            for touched in mutation.touched() {
                if let Some(tail) = self.tails.insert(touched, done_rx.clone()) {
                    previous.push(tail);
                }
            }
        }

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            for mut tail in previous {
                // A dropped sender (panicked predecessor) also releases the chain
                let _ = tail.wait_for(|done| *done).await;
            }
            let result = mutation.send(backend.as_ref()).await;
            let _ = done_tx.send(true);
            if tx.send(Completion { key, seq, mutation, result }).is_err() {
                log::debug!("[DISPATCH] queue dropped before {:?}#{} completed", key, seq);
            }
        });

        self.in_flight += 1;
        log::debug!("[DISPATCH] issued {:?}#{}", key, seq);
        seq
    }

    /// A completion older than the latest dispatch of its container, under `LastIssuedWins`
    pub fn is_stale(&self, completion: &Completion) -> bool {
        self.ordering == CompletionOrdering::LastIssuedWins && completion.seq < self.latest_issued(completion.key)
    }

    /// Next finished completion, if any, without waiting
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Wait for the next completion. `None` when nothing is in flight.
    pub async fn next(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }
}
