//! Error types for the deploy orchestrator

use thiserror::Error;

/// Transport-level failure kinds, distinguished for the hint shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Dns,
    Connect,
    Timeout,
    Tls,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TransportKind::Dns => "DNS resolution failed",
            TransportKind::Connect => "connection failed",
            TransportKind::Timeout => "request timed out",
            TransportKind::Tls => "TLS handshake failed",
            TransportKind::Other => "network error",
        };
        f.write_str(text)
    }
}

/// Main error type for the deploy orchestrator
///
/// Every variant is fatal: the run stops at the first error raised.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid token type: {0}")]
    InvalidTokenType(String),

    #[error("Invalid wait-seconds value: {0}")]
    InvalidWaitSeconds(String),

    #[error("Registry credentials are incomplete")]
    PartialRegistryCredentials,

    #[error("Service list is empty")]
    EmptyServiceList,

    #[error("Malformed service line: {0}")]
    MalformedServiceLine(String),

    #[error("Service line has an empty {field}")]
    EmptyServiceField { field: &'static str, line: String },

    #[error("Duplicate service label: {0}")]
    DuplicateServiceLabel(String),

    #[error("Unknown first service: {label}")]
    UnknownFirstService { label: String, available: String },

    #[error("{kind}")]
    Transport { kind: TransportKind, details: String },

    #[error("Railway API returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Railway API reported errors")]
    Api { messages: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Contextual details for the error block, when there are any beyond
    /// the message itself
    pub fn details(&self) -> Option<String> {
        match self {
            DeployError::MalformedServiceLine(line) => {
                Some(format!("line `{}` has no `label:id` separator", line))
            }
            DeployError::EmptyServiceField { line, .. } => Some(format!("offending line: `{}`", line)),
            DeployError::UnknownFirstService { available, .. } => {
                Some(format!("available labels: {}", available))
            }
            DeployError::Transport { details, .. } => Some(details.clone()),
            DeployError::Http { body, .. } => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(truncate(trimmed, 500))
                }
            }
            DeployError::Api { messages } => Some(messages.join("; ")),
            _ => None,
        }
    }

    /// Remediation hint shown under the error message
    pub fn hint(&self) -> &'static str {
        match self {
            DeployError::MissingInput(_) => {
                "provide the railway-token, environment-id, image and services inputs"
            }
            DeployError::InvalidTokenType(_) => "token-type must be `bearer` or `project`",
            DeployError::InvalidWaitSeconds(_) => "wait-seconds must be a non-negative integer",
            DeployError::PartialRegistryCredentials => {
                "set both registry-username and registry-password, or neither"
            }
            DeployError::EmptyServiceList => "provide one `label:id` pair per line",
            DeployError::MalformedServiceLine(_) => "each non-empty line must be `label:id`",
            DeployError::EmptyServiceField { .. } => "labels and ids must be non-empty",
            DeployError::DuplicateServiceLabel(_) => "service labels must be unique",
            DeployError::UnknownFirstService { .. } => {
                "first-service must match one of the service labels"
            }
            DeployError::Transport { kind, .. } => match kind {
                TransportKind::Dns => "check your network and that backboard.railway.app resolves",
                TransportKind::Connect => "check your network connection and proxy settings",
                TransportKind::Timeout => "the Railway API did not respond in time; try again later",
                TransportKind::Tls => "check system certificates and any TLS-intercepting proxies",
                TransportKind::Other => "check your network connection",
            },
            DeployError::Http { status, .. } => match status {
                401 => "check that the Railway token is valid and not expired",
                403 => "the token lacks permission for this environment or service",
                404 => "check that the token matches the project being deployed",
                429 => "rate limited by the Railway API; wait before retrying",
                500..=599 => "the Railway API had an internal problem; try again later",
                _ => "unexpected response from the Railway API",
            },
            DeployError::Api { messages } => {
                let text = messages.join(" ").to_lowercase();
                if text.contains("not found") {
                    "check that the service and environment ids are correct"
                } else if text.contains("permission") {
                    "the token lacks access to this resource"
                } else if text.contains("invalid") {
                    "a request value was rejected; check the ids and the image reference"
                } else {
                    "the Railway API rejected the request"
                }
            }
            DeployError::IoError(_) => "a filesystem operation failed; check paths and permissions",
            DeployError::JsonError(_) => "the response body was not valid JSON",
            DeployError::Internal(_) => "this is a bug in the orchestrator",
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
