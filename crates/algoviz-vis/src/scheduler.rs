//! Tick scheduling for playback.
//!
//! The controller owns exactly one scheduler and keeps at most one tick
//! pending on it. Every tick carries a [`TickId`]; the controller only acts
//! on the id it is currently waiting for, so a tick delivered after it was
//! cancelled is dropped instead of advancing the run twice.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::playback::Playback;

/// Identifier of one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickId(pub u64);

/// Something that can fire a tick after a delay and forget it again.
pub trait TickScheduler {
    /// Register a tick to fire after `delay`.
    fn schedule(&mut self, delay: Duration) -> TickId;

    /// Drop a registered tick. Unknown or already fired ids are ignored.
    fn cancel(&mut self, tick: TickId);
}

/// A scheduler that only fires when told to.
///
/// Keeps counts of every registration, cancellation, and firing so tests
/// can check the controller never leaves more than one tick outstanding.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<(TickId, Duration)>,
    registrations: usize,
    cancellations: usize,
    fired: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest pending tick.
    pub fn fire(&mut self) -> Option<TickId> {
        let (tick, _) = self.pending.pop_front()?;
        self.fired += 1;
        Some(tick)
    }

    /// Ticks registered but neither fired nor cancelled.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Delay of the most recently registered pending tick.
    pub fn last_delay(&self) -> Option<Duration> {
        self.pending.back().map(|(_, delay)| *delay)
    }

    pub fn registrations(&self) -> usize {
        self.registrations
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations
    }

    pub fn fired(&self) -> usize {
        self.fired
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TickId {
        let tick = TickId(self.next_id);
        self.next_id += 1;
        self.registrations += 1;
        self.pending.push_back((tick, delay));
        tick
    }

    fn cancel(&mut self, tick: TickId) {
        if let Some(pos) = self.pending.iter().position(|(id, _)| *id == tick) {
            self.pending.remove(pos);
            self.cancellations += 1;
        }
    }
}

/// Tokio-backed scheduler: one sleeping task per tick.
///
/// When the sleep ends the task sends its [`TickId`] on a channel; [`drive`]
/// reads that channel and hands the tick to the controller. Cancelling
/// aborts the task.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TickId>,
    next_id: u64,
    pending: Option<(TickId, JoinHandle<()>)>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiving end its ticks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            next_id: 0,
            pending: None,
        };
        (scheduler, rx)
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TickId {
        let tick = TickId(self.next_id);
        self.next_id += 1;

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // Receiver gone means the server is shutting down.
            let _ = tx.send(tick);
        });

        if let Some((old, task)) = self.pending.replace((tick, handle)) {
            trace!(?old, "replacing scheduled tick");
            task.abort();
        }
        tick
    }

    fn cancel(&mut self, tick: TickId) {
        if matches!(self.pending, Some((id, _)) if id == tick) {
            if let Some((_, task)) = self.pending.take() {
                task.abort();
            }
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Some((_, task)) = self.pending.take() {
            task.abort();
        }
    }
}

/// Feed fired ticks into the controller until every sender is gone.
pub async fn drive<S: TickScheduler>(
    playback: Arc<RwLock<Playback<S>>>,
    mut ticks: mpsc::UnboundedReceiver<TickId>,
) {
    while let Some(tick) = ticks.recv().await {
        playback.write().await.tick(tick);
    }
    debug!("tick channel closed, playback driver exiting");
}
