//! Recording transport for dry-run mode and tests
//!
//! Answers every request with a deterministic synthetic success and never
//! touches the network; orchestration code cannot tell the difference.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::requests::GraphqlRequest;
use crate::api::Transport;
use crate::errors::DeployError;
use crate::output;

/// One captured GraphQL call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub variables: Value,
}

/// Transport that records every request instead of sending it
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    echo: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording transport that also echoes each would-be request; used by
    /// dry-run mode
    pub fn echoing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// Calls captured so far, in execution order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, DeployError> {
        if self.echo {
            output::progress(&format!(
                "[dry-run] {} variables: {}",
                request.operation, request.variables
            ));
        }

        self.calls.lock().unwrap().push(RecordedCall {
            operation: request.operation.to_string(),
            variables: request.variables.clone(),
        });

        let mut data = serde_json::Map::new();
        data.insert(request.operation.to_string(), Value::Bool(true));
        Ok(json!({ "data": data }))
    }
}
