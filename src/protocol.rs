//! JSON line protocol for the network surface.
//!
//! Requests and responses are single JSON objects, one per line, with
//! size-bounded parse/serialize buffers. The protocol carries the full step
//! report so a remote training loop can record transitions without a second
//! round trip. The core simulator stays free of I/O; this module only frames.

use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plant::{Observation, StepOutcome};

pub const MAX_REQUEST_SIZE: usize = 512;
pub const MAX_RESPONSE_SIZE: usize = 1024;

pub type RequestBuffer = ArrayString<MAX_REQUEST_SIZE>;
pub type ResponseBuffer = ArrayString<MAX_RESPONSE_SIZE>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u32,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RequestKind {
    /// Replace the plant state with the initial values.
    Reset,
    /// Read the current observation without stepping.
    Observe,
    /// Liveness probe; answered with the current observation.
    Status,
    /// Advance one step. The raw code is forwarded to the simulator so the
    /// configured permissive/strict contract applies on the wire too.
    Step { code: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    /// Strict mode rejected the action code; the plant state is untouched.
    InvalidAction,
    InvalidRequest,
    Error,
}

/// The step result fields a training loop needs besides the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub reward: f64,
    pub anomaly_detected: bool,
    pub had_effect: bool,
    pub energy: f64,
    pub anomaly_messages: String,
}

impl From<&StepOutcome> for StepReport {
    fn from(outcome: &StepOutcome) -> Self {
        Self {
            reward: outcome.reward,
            anomaly_detected: outcome.anomaly_detected,
            had_effect: outcome.info.had_effect,
            energy: outcome.info.energy,
            anomaly_messages: outcome.info.anomaly_messages.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u32,
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub observation: Option<Observation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub step: Option<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid JSON payload")]
    InvalidJson,
    #[error("message exceeds buffer size")]
    MessageTooLarge,
    #[error("serialization failed")]
    SerializationError,
}

/// Frames requests and responses through preallocated buffers.
#[derive(Debug, Default)]
pub struct ProtocolHandler {
    request_buffer: RequestBuffer,
    response_buffer: ResponseBuffer,
}

impl ProtocolHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_request(&mut self, json_str: &str) -> Result<Request, ProtocolError> {
        self.request_buffer.clear();
        if json_str.len() > MAX_REQUEST_SIZE {
            return Err(ProtocolError::MessageTooLarge);
        }
        self.request_buffer.push_str(json_str);

        serde_json::from_str::<Request>(&self.request_buffer).map_err(|_| ProtocolError::InvalidJson)
    }

    pub fn serialize_response(&mut self, response: &Response) -> Result<&str, ProtocolError> {
        self.response_buffer.clear();

        let json_str =
            serde_json::to_string(response).map_err(|_| ProtocolError::SerializationError)?;

        if json_str.len() > MAX_RESPONSE_SIZE {
            return Err(ProtocolError::MessageTooLarge);
        }
        self.response_buffer.push_str(&json_str);

        Ok(&self.response_buffer)
    }

    pub fn observation_response(&self, id: u32, observation: Observation) -> Response {
        Response {
            id,
            status: ResponseStatus::Success,
            observation: Some(observation),
            step: None,
            message: None,
        }
    }

    pub fn step_response(&self, id: u32, outcome: &StepOutcome) -> Response {
        Response {
            id,
            status: ResponseStatus::Success,
            observation: Some(outcome.observation),
            step: Some(StepReport::from(outcome)),
            message: None,
        }
    }

    pub fn invalid_action_response(&self, id: u32, code: u8) -> Response {
        Response {
            id,
            status: ResponseStatus::InvalidAction,
            observation: None,
            step: None,
            message: Some(format!("unknown action code {code}")),
        }
    }

    pub fn error_response(&self, id: u32, status: ResponseStatus, message: &str) -> Response {
        Response {
            id,
            status,
            observation: None,
            step: None,
            message: Some(message.to_string()),
        }
    }
}
