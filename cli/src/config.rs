//! Deploy configuration built from action inputs
//!
//! Inputs arrive as `INPUT_*` environment variables (the CI action
//! convention) with `--key=value` command-line overrides. The resolved
//! map is validated into an immutable [`DeployConfig`] before any
//! network activity.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::DeployError;

/// Default stabilization wait after the canary redeploy
pub const DEFAULT_WAIT_SECONDS: u64 = 30;

/// Input keys recognized from the environment and the command line
const INPUT_KEYS: [&str; 11] = [
    "railway-token",
    "token-type",
    "environment-id",
    "image",
    "services",
    "first-service",
    "wait-seconds",
    "registry-username",
    "registry-password",
    "dry-run",
    "debug",
];

/// How the API token is presented to the Railway API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenType {
    /// Account or team token, sent as `Authorization: Bearer`
    #[default]
    Bearer,

    /// Project-scoped token, sent as `Project-Access-Token`
    Project,
}

impl std::str::FromStr for TokenType {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bearer" => Ok(TokenType::Bearer),
            "project" => Ok(TokenType::Project),
            _ => Err(DeployError::InvalidTokenType(s.to_string())),
        }
    }
}

/// Credentials for pulling the image from a private registry
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Immutable snapshot of validated configuration
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Railway API token
    pub token: SecretString,

    /// Auth scheme for the token
    pub token_type: TokenType,

    /// Target environment id
    pub environment_id: String,

    /// Full image reference with tag
    pub image: String,

    /// Raw multiline `label:id` service list
    pub services_input: String,

    /// Label of the canary service, when sequencing is requested
    pub first_service: Option<String>,

    /// Stabilization wait between the canary and the rest
    pub wait: Duration,

    /// Optional private registry credentials
    pub registry: Option<RegistryCredentials>,

    /// Substitute the recording transport for the real API
    pub dry_run: bool,

    /// Emit diagnostic traces to stderr
    pub debug: bool,
}

impl DeployConfig {
    /// Build configuration from the process environment plus CLI overrides
    pub fn from_env(cli_args: &HashMap<String, String>) -> Result<Self, DeployError> {
        let mut inputs: HashMap<String, String> = HashMap::new();
        for key in INPUT_KEYS {
            let env_name = format!("INPUT_{}", key.to_uppercase().replace('-', "_"));
            if let Ok(value) = env::var(env_name) {
                inputs.insert(key.to_string(), value);
            }
        }
        for (key, value) in cli_args {
            inputs.insert(key.clone(), value.clone());
        }
        Self::from_inputs(&inputs)
    }

    /// Build and validate configuration from a resolved input map
    pub fn from_inputs(inputs: &HashMap<String, String>) -> Result<Self, DeployError> {
        let token = required(inputs, "railway-token")?;
        let environment_id = required(inputs, "environment-id")?;
        let image = required(inputs, "image")?;
        let services_input = required(inputs, "services")?;

        let token_type = match optional(inputs, "token-type") {
            Some(raw) => raw.parse()?,
            None => TokenType::default(),
        };

        let wait_secs = match optional(inputs, "wait-seconds") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| DeployError::InvalidWaitSeconds(raw))?,
            None => DEFAULT_WAIT_SECONDS,
        };

        // The password is kept verbatim; only its presence check is trimmed
        let username = optional(inputs, "registry-username");
        let password = inputs
            .get("registry-password")
            .filter(|value| !value.trim().is_empty())
            .cloned();
        let registry = match (username, password) {
            (Some(username), Some(password)) => Some(RegistryCredentials {
                username,
                password: SecretString::from(password),
            }),
            (None, None) => None,
            _ => return Err(DeployError::PartialRegistryCredentials),
        };

        Ok(Self {
            token: SecretString::from(token),
            token_type,
            environment_id,
            image,
            services_input,
            first_service: optional(inputs, "first-service"),
            wait: Duration::from_secs(wait_secs),
            registry,
            dry_run: flag(inputs, "dry-run"),
            debug: flag(inputs, "debug"),
        })
    }
}

fn required(inputs: &HashMap<String, String>, key: &'static str) -> Result<String, DeployError> {
    match inputs.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(DeployError::MissingInput(key)),
    }
}

fn optional(inputs: &HashMap<String, String>, key: &str) -> Option<String> {
    inputs
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn flag(inputs: &HashMap<String, String>, key: &str) -> bool {
    matches!(
        inputs.get(key).map(|value| value.trim().to_lowercase()),
        Some(value) if value == "true" || value == "1"
    )
}
