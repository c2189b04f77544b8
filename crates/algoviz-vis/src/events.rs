//! Playback events published to observers.

use algoviz_steps::{AlgorithmKind, Highlight, Outcome};
use serde::{Deserialize, Serialize};

use crate::playback::{Phase, Playback, Speed, Value};

/// Events that occur during playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    /// A new array replaced the visible one
    ArrayLoaded { snapshot: Vec<Value> },

    /// A run began on this array
    Started {
        algorithm: AlgorithmKind,
        speed: Speed,
        snapshot: Vec<Value>,
    },

    /// The run advanced one step. `snapshot` is the array after the step
    /// (unchanged for search probes).
    Step {
        index: usize,
        phase: Phase,
        snapshot: Vec<Value>,
        highlighted: Highlight,
    },

    Paused { steps_taken: usize },

    Resumed { steps_taken: usize },

    /// The run was abandoned
    Stopped { steps_taken: usize },

    SpeedChanged { speed: Speed },

    /// The run completed
    Finished {
        outcome: Outcome<Value>,
        snapshot: Vec<Value>,
        steps_taken: usize,
    },

    /// A run was refused before it started
    ValidationFailed { message: String },
}

/// What an observer knows after folding the event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedState {
    pub phase: Option<Phase>,
    pub snapshot: Vec<Value>,
    pub highlighted: Highlight,
    pub outcome: Option<Outcome<Value>>,
    pub steps_taken: usize,
    pub error: Option<String>,
}

impl ObservedState {
    /// Rebuild observer state from events up to (but not including) the given event index.
    pub fn from_events(events: &[PlaybackEvent], up_to_event: usize) -> Self {
        let mut state = Self::default();
        for event in events.iter().take(up_to_event) {
            state.apply(event);
        }
        state
    }

    pub fn apply(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::ArrayLoaded { snapshot } => {
                *self = Self {
                    phase: Some(Phase::Idle),
                    snapshot: snapshot.clone(),
                    ..Self::default()
                };
            }
            PlaybackEvent::Started { snapshot, .. } => {
                *self = Self {
                    phase: Some(Phase::Running),
                    snapshot: snapshot.clone(),
                    ..Self::default()
                };
            }
            PlaybackEvent::Step {
                index,
                phase,
                snapshot,
                highlighted,
            } => {
                self.phase = Some(*phase);
                self.snapshot = snapshot.clone();
                self.highlighted = highlighted.clone();
                self.steps_taken = *index;
            }
            PlaybackEvent::Paused { .. } => self.phase = Some(Phase::Paused),
            PlaybackEvent::Resumed { .. } => self.phase = Some(Phase::Running),
            PlaybackEvent::Stopped { .. } => {
                self.phase = Some(Phase::Idle);
                self.highlighted = Highlight::none();
            }
            PlaybackEvent::SpeedChanged { .. } => {}
            PlaybackEvent::Finished {
                outcome,
                snapshot,
                steps_taken,
            } => {
                self.phase = Some(Phase::Finished);
                self.snapshot = snapshot.clone();
                self.highlighted = Highlight::none();
                self.outcome = Some(outcome.clone());
                self.steps_taken = *steps_taken;
            }
            PlaybackEvent::ValidationFailed { message } => {
                self.error = Some(message.clone());
            }
        }
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub phase: Phase,
    pub speed: Speed,
    pub algorithm: Option<AlgorithmKind>,
    pub steps_taken: usize,
    pub array_len: usize,
    pub error: Option<String>,
}

impl<S> From<&Playback<S>> for PlaybackStatus
where
    S: crate::scheduler::TickScheduler,
{
    fn from(playback: &Playback<S>) -> Self {
        let state = playback.state();
        Self {
            phase: state.phase,
            speed: state.speed,
            algorithm: state.algorithm,
            steps_taken: state.steps_taken,
            array_len: state.snapshot.len(),
            error: state.error.clone(),
        }
    }
}
