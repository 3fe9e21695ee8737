//! GraphQL request construction
//!
//! Variables are always built through `serde_json` so arbitrary characters
//! in image references and registry passwords survive serialization intact.

use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::DeployConfig;
use crate::services::ServiceEntry;

const UPDATE_IMAGE_QUERY: &str = "\
mutation serviceInstanceUpdate($serviceId: String!, $environmentId: String!, $input: ServiceInstanceUpdateInput!) {
  serviceInstanceUpdate(serviceId: $serviceId, environmentId: $environmentId, input: $input)
}";

const REDEPLOY_QUERY: &str = "\
mutation serviceInstanceRedeploy($serviceId: String!, $environmentId: String!) {
  serviceInstanceRedeploy(serviceId: $serviceId, environmentId: $environmentId)
}";

/// A GraphQL request envelope, serialized as `{query, variables}`
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    /// Operation name for progress and diagnostics, not part of the body
    #[serde(skip)]
    pub operation: &'static str,

    pub query: &'static str,
    pub variables: Value,
}

/// Build the mutation that points a service at a new image
pub fn update_image(service: &ServiceEntry, config: &DeployConfig) -> GraphqlRequest {
    let mut input = json!({
        "source": {
            "image": config.image,
        },
    });
    if let Some(registry) = &config.registry {
        input["registryCredentials"] = json!({
            "username": registry.username,
            "password": registry.password.expose_secret(),
        });
    }

    GraphqlRequest {
        operation: "serviceInstanceUpdate",
        query: UPDATE_IMAGE_QUERY,
        variables: json!({
            "serviceId": service.id,
            "environmentId": config.environment_id,
            "input": input,
        }),
    }
}

/// Build the mutation that redeploys a service on its current image
pub fn redeploy(service: &ServiceEntry, config: &DeployConfig) -> GraphqlRequest {
    GraphqlRequest {
        operation: "serviceInstanceRedeploy",
        query: REDEPLOY_QUERY,
        variables: json!({
            "serviceId": service.id,
            "environmentId": config.environment_id,
        }),
    }
}
