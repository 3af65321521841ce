//! Line-delimited JSON adapter over stdin/stdout.
//!
//! Every input line is an envelope:
//!
//! ```json
//! {"method": "start_run", "config": {"step_duration": "1s"}, "payload": {"plan_id": "release"}}
//! ```
//!
//! and produces exactly one output line, either `{"result": ...}` or
//! `{"error": {"code": ..., "message": ...}}`. Blank lines produce nothing.
//! The engine is built from the first well-formed envelope's `config`, layered
//! over the command-line defaults; later `config` objects are ignored.
//! Non-string config values are treated as absent and fall back to defaults.
//!
//! Logging goes to stderr so stdout carries only responses.

use anyhow::{Context, Result};
use conductor_core::{
    params::{CompleteStep, Id, QueryPlans, QueryRuns, StartRun},
    Engine, EngineBuilder, EngineError, PlanCatalog, RawEngineConfig,
};
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

const INVALID_REQUEST: &str = "invalid_request";
const INTERNAL: &str = "internal";

/// One request line.
#[derive(Debug, Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    config: Option<RawEngineConfig>,
    #[serde(default)]
    payload: Option<Value>,
}

/// One response line.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Result(Value),
    Error(WireError),
}

/// Error body with a stable machine-readable code.
#[derive(Debug, Serialize, PartialEq)]
pub struct WireError {
    pub code: String,
    pub message: String,
}

impl WireError {
    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_REQUEST.to_string(),
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: INTERNAL.to_string(),
            message: message.into(),
        }
    }
}

impl From<EngineError> for WireError {
    fn from(error: EngineError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Request dispatcher holding the lazily built engine.
pub struct StdioAdapter {
    catalog: Option<PlanCatalog>,
    defaults: RawEngineConfig,
    engine: Option<Engine>,
}

impl StdioAdapter {
    pub fn new(catalog: PlanCatalog, defaults: RawEngineConfig) -> Self {
        Self {
            catalog: Some(catalog),
            defaults,
            engine: None,
        }
    }

    /// Handles one input line. Returns `None` for blank lines.
    pub async fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match self.handle_envelope(line).await {
            Ok(result) => Response::Result(result),
            Err(error) => {
                debug!("request failed with {}: {}", error.code, error.message);
                Response::Error(error)
            }
        };
        Some(response)
    }

    async fn handle_envelope(&mut self, line: &str) -> Result<Value, WireError> {
        let envelope: Envelope = serde_json::from_str(line)
            .map_err(|e| WireError::invalid_request(format!("malformed request: {e}")))?;
        debug!("stdio request: {}", envelope.method);

        let engine = self.engine(envelope.config)?;
        dispatch(&engine, &envelope.method, envelope.payload).await
    }

    fn engine(&mut self, config: Option<RawEngineConfig>) -> Result<Engine, WireError> {
        if let Some(engine) = &self.engine {
            if config.is_some() {
                debug!("ignoring config on a later request; the engine is already built");
            }
            return Ok(engine.clone());
        }

        let raw = config.unwrap_or_default().or(self.defaults.clone());
        let engine = EngineBuilder::new()
            .with_catalog(self.catalog.take().unwrap_or_default())
            .with_raw_config(&raw)
            .build()?;
        info!(
            "engine ready: source '{}', step duration {:?}",
            engine.config().source,
            engine.config().step_duration
        );

        self.engine = Some(engine.clone());
        Ok(engine)
    }
}

async fn dispatch(
    engine: &Engine,
    method: &str,
    payload: Option<Value>,
) -> Result<Value, WireError> {
    match method {
        "query_plans" => {
            let params: QueryPlans = optional_payload(payload)?;
            to_result(engine.query_plans(&params).await?)
        }
        "get_plan" => {
            let params: Id = required_payload(method, payload)?;
            to_result(engine.get_plan(&params).await?)
        }
        "query_runs" => {
            let params: QueryRuns = optional_payload(payload)?;
            to_result(engine.query_runs(&params).await?)
        }
        "get_run" => {
            let params: Id = required_payload(method, payload)?;
            to_result(engine.get_run(&params).await?)
        }
        "start_run" => {
            let params: StartRun = required_payload(method, payload)?;
            to_result(engine.start_run(&params).await?)
        }
        "complete_step" => {
            let params: CompleteStep = required_payload(method, payload)?;
            to_result(engine.complete_step(&params).await?)
        }
        other => Err(WireError::invalid_request(format!("unknown method '{other}'"))),
    }
}

fn optional_payload<T>(payload: Option<Value>) -> Result<T, WireError>
where
    T: DeserializeOwned + Default,
{
    match payload {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => decode(value),
    }
}

fn required_payload<T>(method: &str, payload: Option<Value>) -> Result<T, WireError>
where
    T: DeserializeOwned,
{
    match payload {
        None | Some(Value::Null) => Err(WireError::invalid_request(format!(
            "method '{method}' requires a payload"
        ))),
        Some(value) => decode(value),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, WireError> {
    serde_json::from_value(value)
        .map_err(|e| WireError::invalid_request(format!("invalid payload: {e}")))
}

fn to_result<T: Serialize>(value: T) -> Result<Value, WireError> {
    serde_json::to_value(value)
        .map_err(|e| WireError::internal(format!("failed to encode result: {e}")))
}

/// Serves requests from stdin until EOF.
pub async fn serve(catalog: PlanCatalog, defaults: RawEngineConfig) -> Result<()> {
    info!("Starting Conductor stdio adapter");

    let mut adapter = StdioAdapter::new(catalog, defaults);
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let Some(response) = adapter.handle_line(&line).await else {
            continue;
        };

        let mut encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("failed to encode response: {e}");
                continue;
            }
        };
        encoded.push('\n');
        stdout
            .write_all(encoded.as_bytes())
            .await
            .context("Failed to write response")?;
        stdout.flush().await.context("Failed to flush stdout")?;
    }

    info!("stdin closed, stdio adapter stopping");
    Ok(())
}
