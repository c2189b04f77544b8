//! Playback controller for algorithm runs.

use std::fmt;
use std::time::Duration;

use algoviz_steps::{
    select, Advance, AlgorithmKind, Highlight, Outcome, RunHandle, SelectionError, Step,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::events::{PlaybackEvent, PlaybackStatus};
use crate::scheduler::{TickId, TickScheduler};

/// Element type of the visualized arrays.
pub type Value = i64;

/// Capacity of the event channel. Slow subscribers lag rather than block.
const EVENT_CAPACITY: usize = 1024;

/// Playback speed, clamped to `1..=100`. Higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Clamp any value into the valid range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Wait between two ticks at this speed.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(Self::MAX + 1 - self.0))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

impl From<i64> for Speed {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// Current phase of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No run exists
    Idle,
    /// Ticks are advancing the run
    Running,
    /// The run is held; single steps are allowed
    Paused,
    /// The last run completed
    Finished,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Finished => "finished",
        }
    }

    /// Whether a run is live in this phase.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Running | Phase::Paused)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to run and how fast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub algorithm: AlgorithmKind,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub speed: Option<Speed>,
}

impl RunRequest {
    pub fn new(algorithm: AlgorithmKind) -> Self {
        Self {
            algorithm,
            target: None,
            speed: None,
        }
    }

    #[must_use]
    pub fn target(mut self, target: Value) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn speed(mut self, speed: Speed) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Observable state, read by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: Phase,
    pub speed: Speed,
    pub algorithm: Option<AlgorithmKind>,
    pub highlighted: Highlight,
    /// The user-visible array: the latest snapshot of the run, or the
    /// loaded array when no run has touched it.
    pub snapshot: Vec<Value>,
    pub outcome: Option<Outcome<Value>>,
    /// Last validation error, cleared by the next successful start.
    pub error: Option<String>,
    pub steps_taken: usize,
}

impl PlaybackState {
    fn idle(snapshot: Vec<Value>, speed: Speed) -> Self {
        Self {
            phase: Phase::Idle,
            speed,
            algorithm: None,
            highlighted: Highlight::none(),
            snapshot,
            outcome: None,
            error: None,
            steps_taken: 0,
        }
    }
}

/// Drives one run at a time through its steps.
///
/// All transitions go through `&mut self`, so the controller is only ever
/// touched by one caller at a time. At most one tick is pending on the
/// scheduler; every transition that schedules cancels the previous tick
/// first.
pub struct Playback<S> {
    scheduler: S,
    pending: Option<TickId>,
    run: Option<RunHandle<Value>>,
    state: PlaybackState,
    events: broadcast::Sender<PlaybackEvent>,
}

impl<S: TickScheduler> Playback<S> {
    /// Create an idle controller showing `sequence`.
    pub fn new(scheduler: S, sequence: Vec<Value>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            scheduler,
            pending: None,
            run: None,
            state: PlaybackState::idle(sequence, Speed::default()),
            events,
        }
    }

    /// Set the initial speed.
    #[must_use]
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.state.speed = speed;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn speed(&self) -> Speed {
        self.state.speed
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Whether a tick is currently scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Replace the visible array. A live run is stopped first.
    pub fn load(&mut self, sequence: Vec<Value>) {
        if self.state.phase.is_active() {
            self.halt();
            self.publish(PlaybackEvent::Stopped {
                steps_taken: self.state.steps_taken,
            });
        }
        self.cancel_pending();
        self.run = None;
        self.state = PlaybackState::idle(sequence, self.state.speed);
        debug!(len = self.state.snapshot.len(), "array loaded");
        self.publish(PlaybackEvent::ArrayLoaded {
            snapshot: self.state.snapshot.clone(),
        });
    }

    /// Start a run over a copy of the current array.
    pub fn start(&mut self, request: RunRequest) -> Result<()> {
        let sequence = self.state.snapshot.clone();
        self.start_run(sequence, request)
    }

    /// Start a run over `sequence`.
    ///
    /// The choice is validated before anything changes: on failure no run
    /// is created and the phase stays where it was. A run that is still
    /// live is stopped and replaced.
    pub fn start_run(&mut self, sequence: Vec<Value>, request: RunRequest) -> Result<()> {
        let prepared = match select(request.algorithm, &sequence, request.target) {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.reject(err)),
        };

        if self.state.phase.is_active() {
            debug!(phase = %self.state.phase, "replacing live run");
            self.halt();
            self.publish(PlaybackEvent::Stopped {
                steps_taken: self.state.steps_taken,
            });
        }
        self.cancel_pending();

        let speed = request.speed.unwrap_or(self.state.speed);
        self.run = Some(prepared.launch(sequence.clone()));
        self.state = PlaybackState {
            phase: Phase::Running,
            algorithm: Some(request.algorithm),
            ..PlaybackState::idle(sequence, speed)
        };

        info!(
            algorithm = %request.algorithm,
            len = self.state.snapshot.len(),
            speed = speed.value(),
            "run started"
        );
        self.publish(PlaybackEvent::Started {
            algorithm: request.algorithm,
            speed,
            snapshot: self.state.snapshot.clone(),
        });
        self.schedule_tick(Duration::ZERO);
        Ok(())
    }

    /// Handle a fired tick. Ticks other than the pending one are ignored.
    pub fn tick(&mut self, tick: TickId) -> Option<PlaybackEvent> {
        if self.pending != Some(tick) {
            trace!(?tick, "ignoring stale tick");
            return None;
        }
        self.pending = None;
        if self.state.phase != Phase::Running {
            return None;
        }

        let event = self.advance();
        if self.state.phase == Phase::Running {
            self.schedule_tick(self.state.speed.delay());
        }
        event
    }

    /// Hold the run. The pending tick is cancelled.
    pub fn pause(&mut self) -> Result<()> {
        self.expect_phase(Phase::Running, "running")?;
        self.cancel_pending();
        self.state.phase = Phase::Paused;
        debug!(steps = self.state.steps_taken, "paused");
        self.publish(PlaybackEvent::Paused {
            steps_taken: self.state.steps_taken,
        });
        Ok(())
    }

    /// Continue a paused run; the next tick fires immediately.
    pub fn resume(&mut self) -> Result<()> {
        self.expect_phase(Phase::Paused, "paused")?;
        self.state.phase = Phase::Running;
        debug!(steps = self.state.steps_taken, "resumed");
        self.publish(PlaybackEvent::Resumed {
            steps_taken: self.state.steps_taken,
        });
        self.schedule_tick(Duration::ZERO);
        Ok(())
    }

    /// Advance a paused run by exactly one step, synchronously.
    ///
    /// Stays paused unless the run completes.
    pub fn step(&mut self) -> Result<PlaybackEvent> {
        self.expect_phase(Phase::Paused, "paused")?;
        self.advance()
            .ok_or_else(|| Error::invalid_state("a live run", self.state.phase))
    }

    /// Abandon the run and return to idle. The array keeps its last snapshot.
    pub fn stop(&mut self) -> Result<()> {
        if !self.state.phase.is_active() {
            return Err(Error::invalid_state("running or paused", self.state.phase));
        }
        self.halt();
        debug!(steps = self.state.steps_taken, "stopped");
        self.publish(PlaybackEvent::Stopped {
            steps_taken: self.state.steps_taken,
        });
        Ok(())
    }

    /// Change speed. A tick already waiting keeps its delay.
    pub fn set_speed(&mut self, value: i64) -> Speed {
        let speed = Speed::new(value);
        self.state.speed = speed;
        trace!(speed = speed.value(), "speed changed");
        self.publish(PlaybackEvent::SpeedChanged { speed });
        speed
    }

    /// Pull one step from the run and publish it.
    fn advance(&mut self) -> Option<PlaybackEvent> {
        let advance = self.run.as_mut()?.advance();
        let event = match advance {
            Advance::Step(step) => {
                self.state.steps_taken += 1;
                match step {
                    Step::Mutation {
                        snapshot,
                        highlighted,
                    } => {
                        self.state.snapshot = snapshot;
                        self.state.highlighted = highlighted;
                    }
                    Step::Probe { highlighted } => self.state.highlighted = highlighted,
                }
                trace!(
                    step = self.state.steps_taken,
                    highlighted = ?self.state.highlighted.indices(),
                    "step"
                );
                PlaybackEvent::Step {
                    index: self.state.steps_taken,
                    phase: self.state.phase,
                    snapshot: self.state.snapshot.clone(),
                    highlighted: self.state.highlighted.clone(),
                }
            }
            Advance::Finished(outcome) => self.finish(outcome),
        };
        self.publish(event.clone());
        Some(event)
    }

    fn finish(&mut self, outcome: Outcome<Value>) -> PlaybackEvent {
        self.cancel_pending();
        self.run = None;
        if let Outcome::Sorted(values) = &outcome {
            self.state.snapshot = values.clone();
        }
        self.state.phase = Phase::Finished;
        self.state.highlighted = Highlight::none();
        self.state.outcome = Some(outcome.clone());

        info!(
            algorithm = ?self.state.algorithm,
            steps = self.state.steps_taken,
            found = ?outcome.found_index(),
            "run finished"
        );
        PlaybackEvent::Finished {
            outcome,
            snapshot: self.state.snapshot.clone(),
            steps_taken: self.state.steps_taken,
        }
    }

    /// Record a failed selection. A missing target is a silent no-op.
    fn reject(&mut self, err: SelectionError) -> Error {
        match &err {
            SelectionError::MissingTarget { algorithm } => {
                debug!(%algorithm, "no search target, run not started");
            }
            _ => {
                warn!(error = %err, "run rejected");
                let message = err.to_string();
                self.state.error = Some(message.clone());
                self.publish(PlaybackEvent::ValidationFailed { message });
            }
        }
        Error::Selection(err)
    }

    /// Drop the live run without publishing.
    fn halt(&mut self) {
        self.cancel_pending();
        self.run = None;
        self.state.phase = Phase::Idle;
        self.state.highlighted = Highlight::none();
    }

    fn expect_phase(&self, expected: Phase, name: &'static str) -> Result<()> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(Error::invalid_state(name, self.state.phase))
        }
    }

    fn schedule_tick(&mut self, delay: Duration) {
        self.cancel_pending();
        self.pending = Some(self.scheduler.schedule(delay));
    }

    fn cancel_pending(&mut self) {
        if let Some(tick) = self.pending.take() {
            self.scheduler.cancel(tick);
        }
    }

    fn publish(&self, event: PlaybackEvent) {
        // No subscribers is fine; the state is still readable.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use proptest::prelude::*;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio_test::{assert_err, assert_ok};

    fn playback(values: &[Value]) -> Playback<ManualScheduler> {
        Playback::new(ManualScheduler::new(), values.to_vec())
    }

    /// Fire ticks until the scheduler has nothing left.
    fn run_out(playback: &mut Playback<ManualScheduler>) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Some(tick) = playback.scheduler_mut().fire() {
            events.extend(playback.tick(tick));
        }
        events
    }

    fn drain(rx: &mut broadcast::Receiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    #[test]
    fn starts_idle() {
        let pb = playback(&[3, 1, 2]);
        assert_eq!(pb.phase(), Phase::Idle);
        assert_eq!(pb.state().snapshot, vec![3, 1, 2]);
        assert_eq!(pb.speed(), Speed::default());
        assert!(!pb.has_pending_tick());
    }

    #[test]
    fn bubble_sort_plays_to_completion() {
        let mut pb = playback(&[3, 1, 2]);
        let mut rx = pb.subscribe();

        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_eq!(pb.phase(), Phase::Running);
        assert_eq!(pb.scheduler().last_delay(), Some(Duration::ZERO));

        let events = run_out(&mut pb);
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            PlaybackEvent::Step { index: 1, snapshot, .. } if snapshot == &vec![1, 3, 2]
        ));
        assert!(matches!(
            &events[1],
            PlaybackEvent::Step { index: 2, snapshot, .. } if snapshot == &vec![1, 2, 3]
        ));
        assert!(matches!(&events[2], PlaybackEvent::Finished { .. }));

        assert_eq!(pb.phase(), Phase::Finished);
        assert_eq!(pb.state().outcome, Some(Outcome::Sorted(vec![1, 2, 3])));
        assert!(pb.state().highlighted.is_empty());
        assert!(!pb.has_pending_tick());

        let published = drain(&mut rx);
        assert!(matches!(published[0], PlaybackEvent::Started { .. }));
        assert_eq!(&published[1..], &events[..]);
    }

    #[test]
    fn ticks_use_speed_delay() {
        let mut pb = playback(&[5, 4, 3, 2, 1]);
        pb.set_speed(91);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));

        let first = pb.scheduler_mut().fire().unwrap();
        pb.tick(first);
        assert_eq!(pb.scheduler().last_delay(), Some(Duration::from_millis(10)));

        // Takes effect on the next scheduled tick only.
        pb.set_speed(100);
        assert_eq!(pb.scheduler().last_delay(), Some(Duration::from_millis(10)));
        let second = pb.scheduler_mut().fire().unwrap();
        pb.tick(second);
        assert_eq!(pb.scheduler().last_delay(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn pause_cancels_and_resume_reschedules() {
        let mut pb = playback(&[5, 4, 3, 2, 1]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        let tick = pb.scheduler_mut().fire().unwrap();
        pb.tick(tick);

        assert_ok!(pb.pause());
        assert_eq!(pb.phase(), Phase::Paused);
        assert_eq!(pb.scheduler().outstanding(), 0);
        assert!(!pb.has_pending_tick());

        assert_ok!(pb.resume());
        assert_eq!(pb.phase(), Phase::Running);
        assert_eq!(pb.scheduler().outstanding(), 1);
        assert_eq!(pb.scheduler().last_delay(), Some(Duration::ZERO));
    }

    #[test]
    fn step_while_paused_is_synchronous() {
        let mut pb = playback(&[3, 1, 2]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_ok!(pb.pause());

        let event = pb.step().unwrap();
        assert!(matches!(event, PlaybackEvent::Step { index: 1, phase: Phase::Paused, .. }));
        assert_eq!(pb.phase(), Phase::Paused);
        assert_eq!(pb.state().highlighted, Highlight::pair(0, 1));
        assert_eq!(pb.scheduler().outstanding(), 0);

        pb.step().unwrap();
        let last = pb.step().unwrap();
        assert!(matches!(last, PlaybackEvent::Finished { steps_taken: 2, .. }));
        assert_eq!(pb.phase(), Phase::Finished);
        assert_err!(pb.step());
    }

    #[test]
    fn step_requires_pause() {
        let mut pb = playback(&[3, 1, 2]);
        assert_eq!(
            pb.step().unwrap_err(),
            Error::InvalidState {
                expected: "paused",
                actual: Phase::Idle
            }
        );
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_err!(pb.step());
        assert_err!(pb.resume());
    }

    #[test]
    fn stop_discards_run_and_keeps_snapshot() {
        let mut pb = playback(&[3, 1, 2]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        let tick = pb.scheduler_mut().fire().unwrap();
        pb.tick(tick);

        assert_ok!(pb.stop());
        assert_eq!(pb.phase(), Phase::Idle);
        assert!(pb.state().highlighted.is_empty());
        assert_eq!(pb.state().snapshot, vec![1, 3, 2]);
        assert_eq!(pb.scheduler().outstanding(), 0);
        assert_err!(pb.stop());
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut pb = playback(&[3, 1, 2]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_ok!(pb.pause());
        // A tick from before the pause shows up late.
        assert_eq!(pb.tick(TickId(0)), None);
        assert_eq!(pb.state().steps_taken, 0);
    }

    #[test]
    fn binary_search_on_unsorted_stays_idle() {
        let mut pb = playback(&[5, 2, 9, 1]);
        let mut rx = pb.subscribe();

        let err = pb
            .start(RunRequest::new(AlgorithmKind::BinarySearch).target(9))
            .unwrap_err();
        assert!(matches!(err, Error::Selection(SelectionError::NotSorted { .. })));
        assert_eq!(pb.phase(), Phase::Idle);
        assert!(pb.state().error.is_some());
        assert_eq!(pb.scheduler().registrations(), 0);
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [PlaybackEvent::ValidationFailed { .. }]
        ));
    }

    #[test]
    fn missing_target_is_a_quiet_no_op() {
        let mut pb = playback(&[4, 7, 2]);
        let mut rx = pb.subscribe();

        assert_err!(pb.start(RunRequest::new(AlgorithmKind::LinearSearch)));
        assert_eq!(pb.phase(), Phase::Idle);
        assert_eq!(pb.state().error, None);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn linear_search_reports_probes() {
        let mut pb = playback(&[4, 7, 2]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::LinearSearch).target(7)));
        let events = run_out(&mut pb);

        let highlights: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::Step { highlighted, snapshot, .. } => {
                    assert_eq!(snapshot, &vec![4, 7, 2]);
                    Some(highlighted.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(highlights, vec![Highlight::one(0), Highlight::one(1)]);
        assert_eq!(pb.state().outcome, Some(Outcome::Found(1)));
    }

    #[test]
    fn restart_after_finish_and_replace_live_run() {
        let mut pb = playback(&[2, 1]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::QuickSort)));
        run_out(&mut pb);
        assert_eq!(pb.phase(), Phase::Finished);

        assert_ok!(pb.start_run(vec![9, 8, 7], RunRequest::new(AlgorithmKind::MergeSort)));
        assert_eq!(pb.phase(), Phase::Running);
        assert_eq!(pb.state().outcome, None);

        // Starting again while running replaces the run.
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_eq!(pb.state().algorithm, Some(AlgorithmKind::BubbleSort));
        assert_eq!(pb.scheduler().outstanding(), 1);
    }

    #[test]
    fn rejected_start_leaves_live_run_alone() {
        let mut pb = playback(&[3, 1, 2]);
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));
        assert_ok!(pb.pause());

        assert_err!(pb.start(RunRequest::new(AlgorithmKind::BinarySearch).target(1)));
        assert_eq!(pb.phase(), Phase::Paused);
        assert_ok!(pb.step());
    }

    #[test]
    fn load_stops_live_run() {
        let mut pb = playback(&[3, 1, 2]);
        let mut rx = pb.subscribe();
        assert_ok!(pb.start(RunRequest::new(AlgorithmKind::BubbleSort)));

        pb.load(vec![1, 2, 3, 4]);
        assert_eq!(pb.phase(), Phase::Idle);
        assert_eq!(pb.state().snapshot, vec![1, 2, 3, 4]);
        assert_eq!(pb.scheduler().outstanding(), 0);

        let events = drain(&mut rx);
        assert!(matches!(
            events.as_slice(),
            [
                PlaybackEvent::Started { .. },
                PlaybackEvent::Stopped { .. },
                PlaybackEvent::ArrayLoaded { .. }
            ]
        ));
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(Speed::new(0).value(), 1);
        assert_eq!(Speed::new(-40).value(), 1);
        assert_eq!(Speed::new(250).value(), 100);
        assert_eq!(Speed::new(1).delay(), Duration::from_millis(100));
        assert_eq!(Speed::new(100).delay(), Duration::from_millis(1));

        let speed: Speed = serde_json::from_str("500").unwrap();
        assert_eq!(speed.value(), 100);
        assert_eq!(serde_json::to_string(&Speed::new(42)).unwrap(), "42");
    }

    #[derive(Debug, Clone)]
    enum Control {
        Start(AlgorithmKind),
        Tick,
        StaleTick,
        Pause,
        Resume,
        Step,
        Stop,
        Speed(i64),
        Load,
    }

    fn control() -> impl Strategy<Value = Control> {
        prop_oneof![
            prop::sample::select(AlgorithmKind::ALL.to_vec()).prop_map(Control::Start),
            Just(Control::Tick),
            Just(Control::Tick),
            Just(Control::Tick),
            Just(Control::StaleTick),
            Just(Control::Pause),
            Just(Control::Resume),
            Just(Control::Step),
            Just(Control::Stop),
            (-10i64..120).prop_map(Control::Speed),
            Just(Control::Load),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_pending_tick(
            values in prop::collection::vec(0i64..10, 0..12),
            controls in prop::collection::vec(control(), 1..60),
        ) {
            let mut pb = playback(&values);
            for control in controls {
                match control {
                    Control::Start(kind) => {
                        let _ = pb.start(RunRequest::new(kind).target(3));
                    }
                    Control::Tick => {
                        if let Some(tick) = pb.scheduler_mut().fire() {
                            pb.tick(tick);
                        }
                    }
                    Control::StaleTick => {
                        prop_assert_eq!(pb.tick(TickId(u64::MAX)), None);
                    }
                    Control::Pause => { let _ = pb.pause(); }
                    Control::Resume => { let _ = pb.resume(); }
                    Control::Step => { let _ = pb.step(); }
                    Control::Stop => { let _ = pb.stop(); }
                    Control::Speed(n) => { pb.set_speed(n); }
                    Control::Load => pb.load(values.clone()),
                }

                let scheduler = pb.scheduler();
                prop_assert!(scheduler.outstanding() <= 1);
                prop_assert_eq!(
                    scheduler.registrations(),
                    scheduler.cancellations() + scheduler.fired() + scheduler.outstanding()
                );
                prop_assert_eq!(pb.has_pending_tick(), scheduler.outstanding() == 1);
                prop_assert_eq!(pb.has_pending_tick(), pb.phase() == Phase::Running);
            }
        }
    }
}
