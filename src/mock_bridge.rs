//! Replaying host bridge for deterministic tests and the replay command.
//!
//! Outbound calls that return a value (`open_wallet`, `generate_wallet`, `close_wallet`,
//! `transfer`, `request_aliases`) consume recorded replies in order. `message_box` and
//! `get_version` never consume a recording.

use crate::bridge::HostBridge;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub const OPEN_WALLET: &str = "open_wallet";
pub const GENERATE_WALLET: &str = "generate_wallet";
pub const CLOSE_WALLET: &str = "close_wallet";
pub const TRANSFER: &str = "transfer";
pub const REQUEST_ALIASES: &str = "request_aliases";

/// A recorded outbound call and the host's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCall {
    pub call: String,
    /// Expected request body; empty means "don't check".
    #[serde(default)]
    pub request: String,
    pub response: String,
}

impl RecordedCall {
    pub fn new(call: &str, response: impl Into<String>) -> Self {
        Self {
            call: call.to_string(),
            request: String::new(),
            response: response.into(),
        }
    }
}

/// A call the adapter actually made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedCall {
    pub call: String,
    pub request: String,
}

/// One line of a recorded event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RecordedEvent {
    /// Payload as the host would send it. A JSON string is passed through unquoted.
    pub fn payload_text(&self) -> String {
        match &self.payload {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MockBridge {
    recordings: Arc<Vec<RecordedCall>>,
    replay_index: Arc<Mutex<usize>>,
    observed: Arc<Mutex<Vec<ObservedCall>>>,
    messages: Arc<Mutex<Vec<String>>>,
    version: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockBridge {
    /// Create a new mock bridge from a recording file.
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(file_path.as_ref())
            .map_err(|e| format!("Failed to read recording file: {}", e))?;

        let recordings: Vec<RecordedCall> = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse recording file: {}", e))?;

        Ok(Self::from_recordings(recordings))
    }

    pub fn from_recordings(recordings: Vec<RecordedCall>) -> Self {
        Self {
            recordings: Arc::new(recordings),
            replay_index: Arc::new(Mutex::new(0)),
            observed: Arc::new(Mutex::new(Vec::new())),
            messages: Arc::new(Mutex::new(Vec::new())),
            version: "0.0.0".to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Reset the replay index and forget observed calls and messages.
    pub fn reset(&self) {
        *lock(&self.replay_index) = 0;
        lock(&self.observed).clear();
        lock(&self.messages).clear();
    }

    pub fn recording_count(&self) -> usize {
        self.recordings.len()
    }

    /// Number of recordings not yet consumed.
    pub fn remaining(&self) -> usize {
        self.recordings.len().saturating_sub(*lock(&self.replay_index))
    }

    pub fn calls(&self) -> Vec<ObservedCall> {
        lock(&self.observed).clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        lock(&self.observed).iter().filter(|c| c.call == call).count()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    fn replay(&self, call: &str, request: &str) -> Option<String> {
        lock(&self.observed).push(ObservedCall {
            call: call.to_string(),
            request: request.to_string(),
        });

        let mut index = lock(&self.replay_index);
        let Some(recorded) = self.recordings.get(*index) else {
            tracing::warn!(
                "replay exhausted: requested call #{} ({}) but only {} calls recorded",
                *index + 1,
                call,
                self.recordings.len()
            );
            return None;
        };
        *index += 1;

        if recorded.call != call {
            tracing::warn!(
                "call mismatch in replay at index {} - expected '{}', got '{}'",
                *index - 1,
                recorded.call,
                call
            );
        }
        if !recorded.request.is_empty() && recorded.request != request {
            tracing::warn!(
                "request mismatch in replay at index {}: expected {}, got {}",
                *index - 1,
                recorded.request,
                request
            );
        }
        Some(recorded.response.clone())
    }

    fn replay_flag(&self, call: &str) -> bool {
        self.replay(call, "")
            .map(|response| response.trim() == "true")
            .unwrap_or(false)
    }
}

impl HostBridge for MockBridge {
    fn open_wallet(&self) -> bool {
        self.replay_flag(OPEN_WALLET)
    }

    fn generate_wallet(&self) -> bool {
        self.replay_flag(GENERATE_WALLET)
    }

    fn close_wallet(&self) -> bool {
        self.replay_flag(CLOSE_WALLET)
    }

    fn transfer(&self, request_json: &str) -> String {
        self.replay(TRANSFER, request_json).unwrap_or_default()
    }

    fn request_aliases(&self) -> String {
        self.replay(REQUEST_ALIASES, "").unwrap_or_default()
    }

    fn message_box(&self, text: &str) {
        tracing::info!("message box: {}", text);
        lock(&self.messages).push(text.to_string());
    }

    fn get_version(&self) -> String {
        self.version.clone()
    }
}
