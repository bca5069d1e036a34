//! Client for an Ollama-compatible model-serving endpoint
//!
//! The client keeps one logical connection (base URL + HTTP session) and
//! exposes connect, model listing and streamed generation. A connection is
//! only considered established after a successful listing probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use parking_lot::Mutex;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::{
    error::ClientError,
    models::{GenerationParams, GenerationResult, ModelInfo, TagsResponse},
    service::ModelService,
    stream::{LineBuffer, StreamAccumulator},
    Result,
};

/// Default transport timeout for a whole request (5 minutes; generations can be slow)
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default pool idle timeout (90 seconds)
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Default TCP keep-alive interval (60 seconds)
const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 60;

/// Prompts and responses longer than this are truncated in log lines
const LOG_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Default)]
struct ConnectionState {
    base_url: Option<String>,
    session: Option<Client>,
    connected: bool,
    last_error: Option<String>,
    last_request_at: Option<DateTime<Utc>>,
    last_response_time: Option<Duration>,
    last_model_count: Option<usize>,
}

/// Snapshot of the client's connection state, for callers that want to
/// explain a failure or an empty listing
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDiagnostics {
    pub base_url: Option<String>,
    pub connected: bool,
    pub last_error: Option<String>,
    pub last_request_at: Option<DateTime<Utc>>,
    /// Time until response headers arrived for the last request
    pub last_response_time: Option<Duration>,
    /// Number of models in the last listing; `Some(0)` flags an empty listing
    pub last_model_count: Option<usize>,
}

/// Model service client
///
/// All operations take `&self` so one client can be shared by concurrently
/// running tests. The state lock is never held across an await point.
pub struct OllamaClient {
    state: Mutex<ConnectionState>,
    timeout: Duration,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaClient {
    /// Create a disconnected client with the default transport timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a disconnected client with a custom transport timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Mutex::new(ConnectionState::default()),
            timeout,
        }
    }

    /// Get the configured transport timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL of the current (or last attempted) connection, e.g. `http://localhost:11434/api`
    pub fn base_url(&self) -> Option<String> {
        self.state.lock().base_url.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Reason of the most recent failure, if any
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn diagnostics(&self) -> ClientDiagnostics {
        let state = self.state.lock();
        ClientDiagnostics {
            base_url: state.base_url.clone(),
            connected: state.connected,
            last_error: state.last_error.clone(),
            last_request_at: state.last_request_at,
            last_response_time: state.last_response_time,
            last_model_count: state.last_model_count,
        }
    }

    /// Connect to the endpoint at `http://{host}:{port}/api`.
    ///
    /// Reuses the open HTTP session if there is one and always probes the
    /// endpoint by listing models. On failure the client stays disconnected and
    /// the reason is kept in [`Self::last_error`].
    pub async fn connect(&self, host: &str, port: u16) -> Result<()> {
        if host.trim().is_empty() {
            let err = ClientError::ConnectionFailed("host cannot be empty".to_string());
            error!("Failed to connect to model service: {}", err);
            let mut state = self.state.lock();
            state.connected = false;
            state.base_url = None;
            state.last_error = Some(err.to_string());
            return Err(err);
        }

        let base_url = format!("http://{}:{}/api", host, port);
        info!("Connecting to model service at {}:{}", host, port);

        let session = {
            let mut state = self.state.lock();
            state.base_url = Some(base_url.clone());
            state.connected = false;
            state.last_error = None;

            match &state.session {
                Some(session) => session.clone(),
                None => {
                    debug!("Creating new HTTP session");
                    let session = self.build_session()?;
                    state.session = Some(session.clone());
                    session
                }
            }
        };

        debug!("Testing connection by listing models...");
        match self.fetch_models(&session, &base_url).await {
            Ok(models) => {
                self.state.lock().connected = true;
                info!(
                    "Connected to model service at {}:{} ({} models)",
                    host,
                    port,
                    models.len()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to connect to model service: {}", e);
                debug!("Connection error details: {:?}", e);
                self.record_error(&e);
                Err(ClientError::ConnectionFailed(e.to_string()))
            }
        }
    }

    /// Drop the HTTP session and mark the client disconnected.
    ///
    /// Closing an already closed (or never opened) client is a no-op.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.session.take().is_some() {
            debug!("Closed model service session");
        }
        state.connected = false;
    }

    /// List the models available on the endpoint.
    ///
    /// An empty listing is returned as-is and logged as a warning.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let (session, base_url) = self.connected_session("list models")?;
        self.fetch_models(&session, &base_url).await.map_err(|e| {
            self.record_error(&e);
            e
        })
    }

    /// Look up one model by name in a fresh listing
    pub async fn get_model_info(&self, model: &str) -> Result<ModelInfo> {
        let models = self.list_models().await?;
        models
            .into_iter()
            .find(|m| m.name == model)
            .ok_or_else(|| {
                warn!("Model '{}' is not served by the endpoint", model);
                ClientError::ModelNotFound(model.to_string())
            })
    }

    /// Send a prompt to `model` and collect the streamed answer.
    ///
    /// Reading stops at the first fragment with `done = true`. If the stream
    /// ends without one, whatever was received is returned with `done = false`.
    /// `total_duration` is the wall-clock duration of this call.
    pub async fn generate_response(
        &self,
        model: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> Result<GenerationResult> {
        let (session, base_url) = self.connected_session("generate response")?;

        let mut body = GenerationParams::new();
        body.insert("model".to_string(), model.into());
        body.insert("prompt".to_string(), prompt.into());
        if let Some(params) = params {
            body.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        debug!(
            "Generating response for model '{}' with prompt: '{}'",
            model,
            preview(prompt)
        );
        debug!("Request parameters: {:?}", params);

        let started = Instant::now();
        self.state.lock().last_request_at = Some(Utc::now());

        let result = self
            .stream_generation(&session, &base_url, model, &body, started)
            .await;

        match result {
            Ok(result) => {
                debug!(
                    "Response from model '{}': '{}' (time={:.3}s, tokens={})",
                    model,
                    preview(&result.response),
                    result.total_duration as f64 / 1000.0,
                    result.eval_count
                );
                Ok(result)
            }
            Err(e) => {
                error!("Failed to generate response with model '{}': {}", model, e);
                self.record_error(&e);
                Err(e)
            }
        }
    }

    async fn stream_generation(
        &self,
        session: &Client,
        base_url: &str,
        model: &str,
        body: &GenerationParams,
        started: Instant,
    ) -> Result<GenerationResult> {
        const OPERATION: &str = "generate response";

        let response = session
            .post(format!("{}/generate", base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::transport(OPERATION, e))?;

        let header_time = started.elapsed();
        self.state.lock().last_response_time = Some(header_time);
        debug!(
            "Response received in {:.3}s with status {}",
            header_time.as_secs_f64(),
            response.status()
        );

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus {
                operation: OPERATION,
                status: status.as_u16(),
                body,
            });
        }

        info!("Starting response generation with model {}...", model);

        let mut lines = LineBuffer::new();
        let mut accumulator = StreamAccumulator::new();
        let mut stream = response.bytes_stream();

        'read: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ClientError::transport(OPERATION, e))?;
            for line in lines.push(&chunk) {
                if accumulator.push_line(&line) {
                    break 'read;
                }
            }
        }

        if !accumulator.is_done() {
            if let Some(rest) = lines.finish() {
                accumulator.push_line(&rest);
            }
        }

        if accumulator.is_done() {
            info!("Response completed with model {}", model);
        } else {
            warn!(
                "Stream from model '{}' ended without a completion marker ({} fragments, {} skipped lines)",
                model,
                accumulator.fragments(),
                accumulator.skipped_lines()
            );
        }

        Ok(accumulator.finish(model, started.elapsed()))
    }

    async fn fetch_models(&self, session: &Client, base_url: &str) -> Result<Vec<ModelInfo>> {
        const OPERATION: &str = "list models";

        let url = format!("{}/tags", base_url);
        debug!("Listing models from: {}", url);

        let started = Instant::now();
        self.state.lock().last_request_at = Some(Utc::now());

        let response = session.get(&url).send().await.map_err(|e| {
            error!("Client error while listing models: {}", e);
            ClientError::transport(OPERATION, e)
        })?;

        let elapsed = started.elapsed();
        self.state.lock().last_response_time = Some(elapsed);
        debug!(
            "Response received in {:.3}s with status {}",
            elapsed.as_secs_f64(),
            response.status()
        );

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Failed to list models with status {}: {}", status, body);
            return Err(ClientError::HttpStatus {
                operation: OPERATION,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(OPERATION, e))?;
        let tags: TagsResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse tags response: {}", e);
            debug!("Raw models data: {}", body);
            ClientError::InvalidPayload(format!("tags response: {}", e))
        })?;

        let models = tags.models.unwrap_or_default();
        if models.is_empty() {
            warn!("No models found in model service response");
        }
        self.state.lock().last_model_count = Some(models.len());

        info!("Retrieved {} models", models.len());
        Ok(models)
    }

    fn connected_session(&self, operation: &str) -> Result<(Client, String)> {
        let state = self.state.lock();
        match (&state.session, &state.base_url, state.connected) {
            (Some(session), Some(base_url), true) => Ok((session.clone(), base_url.clone())),
            _ => {
                error!("Cannot {}: not connected to model service", operation);
                Err(ClientError::NotConnected)
            }
        }
    }

    fn build_session(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(DEFAULT_TCP_KEEPALIVE_SECS))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
    }

    fn record_error(&self, err: &ClientError) {
        self.state.lock().last_error = Some(err.to_string());
    }
}

#[async_trait]
impl ModelService for OllamaClient {
    async fn generate_response(
        &self,
        model: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> Result<GenerationResult> {
        OllamaClient::generate_response(self, model, prompt, params).await
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > LOG_PREVIEW_CHARS {
        let head: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
