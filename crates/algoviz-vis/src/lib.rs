//! Algoviz Playback
//!
//! Step-by-step playback of sorting and searching algorithms.
//!
//! # Architecture
//!
//! - **Playback**: state machine owning the live run, its timing, and the
//!   observable state (Idle, Running, Paused, Finished)
//! - **Scheduler**: one cancellable pending tick at a time; manual for tests,
//!   tokio-backed for the server
//! - **Events**: every step and transition is broadcast to subscribers
//! - **WebSocket**: streams events to the frontend and accepts commands
//! - **REST API**: start runs, control playback, get state
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::default();
//! let server = VisServer::new(&config);
//! server.serve(config.port).await;
//! ```

mod config;
mod error;
mod events;
mod playback;
mod scheduler;
mod server;

pub use config::VisConfig;
pub use error::{Error, Result};
pub use events::{ObservedState, PlaybackEvent, PlaybackStatus};
pub use playback::{Phase, Playback, PlaybackState, RunRequest, Speed, Value};
pub use scheduler::{drive, ManualScheduler, TickId, TickScheduler, TokioScheduler};
pub use server::{ApiError, AppState, VisServer};
