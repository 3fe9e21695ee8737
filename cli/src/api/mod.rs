//! Railway API access layer

pub mod client;
pub mod fake;
pub mod requests;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::DeployError;
use self::requests::GraphqlRequest;

/// Railway GraphQL endpoint
pub const ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";

/// Transport trait so orchestration runs identically against the real API
/// and the recording fake
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one GraphQL request and return the parsed response body
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, DeployError>;
}
