//! Axum web server with WebSocket streaming for visualization.

use std::sync::Arc;

use algoviz_steps::{generate_random, generate_seeded, parse_target, AlgorithmKind, ArrayConfig};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::error::Error;
use crate::events::{PlaybackEvent, PlaybackStatus};
use crate::playback::{Playback, PlaybackState, RunRequest, Speed, Value};
use crate::scheduler::{drive, TickId, TokioScheduler};

type SharedPlayback = Arc<RwLock<Playback<TokioScheduler>>>;

/// Shared application state.
pub struct AppState {
    playback: SharedPlayback,
    array: ArrayConfig,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
    ticks: mpsc::UnboundedReceiver<TickId>,
}

impl VisServer {
    /// Create a server showing a freshly generated array.
    pub fn new(config: &VisConfig) -> Self {
        let initial = match config.seed {
            Some(seed) => generate_seeded(&config.array, seed),
            None => generate_random(&config.array),
        };
        let (scheduler, ticks) = TokioScheduler::new();
        let playback = Playback::new(scheduler, initial).with_speed(config.speed);
        Self {
            state: Arc::new(AppState {
                playback: Arc::new(RwLock::new(playback)),
                array: config.array,
            }),
            ticks,
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            // API routes
            .route("/api/status", get(status_handler))
            .route("/api/state", get(state_handler))
            .route("/api/array", post(generate_handler))
            .route("/api/run", post(run_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/resume", post(resume_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/stop", post(stop_handler))
            .route("/api/playback/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Spawn the task that turns fired ticks into playback steps.
    fn spawn_driver(self) -> (Router, tokio::task::JoinHandle<()>) {
        let router = self.router();
        let driver = tokio::spawn(drive(self.state.playback.clone(), self.ticks));
        (router, driver)
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://localhost:{}", port);

        let (router, driver) = self.spawn_driver();
        let result = axum::serve(listener, router).await;
        driver.abort();
        result
    }
}

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError(Error);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::Selection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidState { .. } => StatusCode::CONFLICT,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// A search target as typed by a user or sent by a script.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TargetInput {
    Number(Value),
    Text(String),
}

impl TargetInput {
    fn value(&self) -> Option<Value> {
        match self {
            TargetInput::Number(n) => Some(*n),
            TargetInput::Text(s) => parse_target(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunBody {
    algorithm: AlgorithmKind,
    #[serde(default)]
    target: Option<TargetInput>,
    #[serde(default)]
    speed: Option<Speed>,
    /// Run on this array instead of the current one.
    #[serde(default)]
    array: Option<Vec<Value>>,
}

impl RunBody {
    fn request(&self) -> RunRequest {
        RunRequest {
            algorithm: self.algorithm,
            target: self.target.as_ref().and_then(TargetInput::value),
            speed: self.speed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    len: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SpeedBody {
    speed: Speed,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let playback = state.playback.read().await;
    Json(playback.status())
}

async fn state_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackState> {
    let playback = state.playback.read().await;
    Json(playback.state().clone())
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<GenerateBody>>,
) -> Json<PlaybackState> {
    let len = body.and_then(|Json(body)| body.len);
    Json(state.generate(len).await)
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RunBody>,
) -> ApiResult<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    let request = body.request();
    match body.array {
        Some(array) => playback.start_run(array, request)?,
        None => playback.start(request)?,
    }
    Ok(Json(playback.status()))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.pause()?;
    Ok(Json(playback.status()))
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.resume()?;
    Ok(Json(playback.status()))
}

async fn step_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackState> {
    let mut playback = state.playback.write().await;
    playback.step()?;
    Ok(Json(playback.state().clone()))
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.stop()?;
    Ok(Json(playback.status()))
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedBody>,
) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.set_speed(i64::from(req.speed.value()));
    Json(playback.status())
}

impl AppState {
    /// Replace the array with a new random one. `len` is clamped to
    /// [`MAX_LEN`](algoviz_steps::MAX_LEN).
    async fn generate(&self, len: Option<usize>) -> PlaybackState {
        let config = match len {
            Some(len) => self.array.with_len(len),
            None => self.array,
        };
        let values = generate_random(&config);
        let mut playback = self.playback.write().await;
        playback.load(values);
        playback.state().clone()
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");

    // Subscribe before reading state so no event falls in between.
    let (initial, mut events) = {
        let playback = state.playback.read().await;
        (playback.state().clone(), playback.subscribe())
    };
    if send_response(&mut socket, &WsResponse::State(initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(text.as_str()) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { message: format!("bad command: {e}") },
                        };
                        if send_response(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                let response = match event {
                    Ok(event) => WsResponse::Event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "WebSocket client lagged, resending state");
                        WsResponse::State(state.playback.read().await.state().clone())
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if send_response(&mut socket, &response).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn send_response(socket: &mut WebSocket, response: &WsResponse) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to encode WebSocket response: {}", e);
            return Ok(());
        }
    };
    let result = socket.send(Message::Text(json.into())).await;
    if let Err(e) = &result {
        warn!("Failed to send WebSocket message: {}", e);
    }
    result
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WsCommand {
    #[serde(rename = "get_state")]
    GetState,
    #[serde(rename = "get_status")]
    GetStatus,
    #[serde(rename = "generate")]
    Generate {
        #[serde(default)]
        len: Option<usize>,
    },
    #[serde(rename = "start")]
    Start {
        algorithm: AlgorithmKind,
        #[serde(default)]
        target: Option<TargetInput>,
        #[serde(default)]
        speed: Option<Speed>,
    },
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "resume")]
    Resume,
    #[serde(rename = "step")]
    Step,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "speed")]
    Speed { speed: Speed },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data")]
enum WsResponse {
    #[serde(rename = "state")]
    State(PlaybackState),
    #[serde(rename = "status")]
    Status(PlaybackStatus),
    #[serde(rename = "event")]
    Event(PlaybackEvent),
    #[serde(rename = "error")]
    Error { message: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    if let WsCommand::Generate { len } = cmd {
        return WsResponse::State(state.generate(len).await);
    }

    let mut playback = state.playback.write().await;
    let result = match cmd {
        WsCommand::GetState => return WsResponse::State(playback.state().clone()),
        WsCommand::GetStatus | WsCommand::Generate { .. } => Ok(()),
        WsCommand::Start {
            algorithm,
            target,
            speed,
        } => playback.start(RunRequest {
            algorithm,
            target: target.as_ref().and_then(TargetInput::value),
            speed,
        }),
        WsCommand::Pause => playback.pause(),
        WsCommand::Resume => playback.resume(),
        WsCommand::Step => playback.step().map(|_| ()),
        WsCommand::Stop => playback.stop(),
        WsCommand::Speed { speed } => {
            playback.set_speed(i64::from(speed.value()));
            Ok(())
        }
    };
    match result {
        Ok(()) => WsResponse::Status(playback.status()),
        Err(e) => WsResponse::Error {
            message: e.to_string(),
        },
    }
}
