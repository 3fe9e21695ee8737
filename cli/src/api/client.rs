//! HTTP transport for the Railway GraphQL API

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error};

use crate::api::requests::GraphqlRequest;
use crate::api::{Transport, ENDPOINT};
use crate::config::{DeployConfig, TokenType};
use crate::errors::{DeployError, TransportKind};

/// HTTP client for the Railway API
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: SecretString,
    token_type: TokenType,
}

impl HttpTransport {
    /// Create a transport from the deploy configuration
    pub fn new(config: &DeployConfig) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DeployError::Transport {
                kind: TransportKind::Other,
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: ENDPOINT.to_string(),
            token: config.token.clone(),
            token_type: config.token_type,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, DeployError> {
        debug!("POST {} ({})", self.endpoint, request.operation);

        let builder = self.client.post(&self.endpoint).json(request);
        let builder = match self.token_type {
            TokenType::Bearer => builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            ),
            TokenType::Project => {
                builder.header("Project-Access-Token", self.token.expose_secret())
            }
        };

        let response = builder.send().await.map_err(|e| {
            error!("{} request failed: {}", request.operation, e);
            DeployError::Transport {
                kind: classify(&e),
                details: chain_text(&e),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| DeployError::Transport {
            kind: TransportKind::Other,
            details: chain_text(&e),
        })?;

        if status.as_u16() != 200 {
            error!("{} returned HTTP {}: {}", request.operation, status, body);
            return Err(DeployError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;
        if let Some(messages) = graphql_errors(&parsed) {
            error!("{} rejected: {}", request.operation, messages.join("; "));
            return Err(DeployError::Api { messages });
        }

        debug!("{} succeeded", request.operation);
        Ok(parsed)
    }
}

/// Map a reqwest failure onto a transport kind
///
/// reqwest does not expose DNS and TLS failures as typed variants, so the
/// error chain text is inspected for them.
fn classify(err: &reqwest::Error) -> TransportKind {
    if err.is_timeout() {
        return TransportKind::Timeout;
    }
    let chain = chain_text(err).to_lowercase();
    if chain.contains("dns") {
        return TransportKind::Dns;
    }
    if chain.contains("certificate") || chain.contains("tls") || chain.contains("handshake") {
        return TransportKind::Tls;
    }
    if err.is_connect() {
        return TransportKind::Connect;
    }
    TransportKind::Other
}

/// Flatten an error and its sources into one line
fn chain_text(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Extract GraphQL error messages from a 200 response body, if any
fn graphql_errors(body: &Value) -> Option<Vec<String>> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|entry| {
                entry
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| entry.to_string())
            })
            .collect(),
    )
}
