//! Deploy orchestration
//!
//! Sequencing: update the image source on every service, then redeploy.
//! When a first service is configured, it is redeployed alone, given a
//! fixed stabilization wait, and only then are the remaining services
//! redeployed. Any failure aborts the run; already-updated services are
//! left as they are.

use tokio::time::sleep;
use tracing::debug;

use crate::api::requests;
use crate::api::Transport;
use crate::config::DeployConfig;
use crate::errors::DeployError;
use crate::output;
use crate::services::{ServiceEntry, ServiceSet};

/// Labels redeployed, in order, plus the image they now run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub deployed: Vec<String>,
    pub image: String,
}

/// Run the full deployment sequence against the given transport
pub async fn run_deploy(
    config: &DeployConfig,
    services: &ServiceSet,
    transport: &dyn Transport,
) -> Result<DeployOutcome, DeployError> {
    // first-service must name a parsed label before anything is touched
    let canary = match &config.first_service {
        Some(first) => Some(services.get(first).ok_or_else(|| {
            DeployError::UnknownFirstService {
                label: first.clone(),
                available: services.labels().join(", "),
            }
        })?),
        None => None,
    };

    output::progress(&format!(
        "Updating {} service(s) to image {}",
        services.len(),
        config.image
    ));
    for service in services.iter() {
        debug!("updating image source for {} ({})", service.label, service.id);
        transport
            .execute(&requests::update_image(service, config))
            .await?;
        output::progress(&format!("  updated {}", service.label));
    }

    let mut deployed = Vec::new();
    match canary {
        None => {
            output::progress("Redeploying all services");
            for service in services.iter() {
                redeploy_one(service, config, transport).await?;
                deployed.push(service.label.clone());
            }
        }
        Some(canary) => {
            output::progress(&format!("Redeploying {} first", canary.label));
            redeploy_one(canary, config, transport).await?;
            deployed.push(canary.label.clone());

            if !config.wait.is_zero() {
                output::progress(&format!(
                    "Waiting {}s for {} to stabilize",
                    config.wait.as_secs(),
                    canary.label
                ));
            }
            sleep(config.wait).await;

            output::progress("Redeploying remaining services");
            for service in services.iter().filter(|s| s.label != canary.label) {
                redeploy_one(service, config, transport).await?;
                deployed.push(service.label.clone());
            }
        }
    }

    output::progress(&format!("Deployed services: {}", deployed.join(", ")));
    Ok(DeployOutcome {
        deployed,
        image: config.image.clone(),
    })
}

async fn redeploy_one(
    service: &ServiceEntry,
    config: &DeployConfig,
    transport: &dyn Transport,
) -> Result<(), DeployError> {
    debug!("redeploying {} ({})", service.label, service.id);
    transport
        .execute(&requests::redeploy(service, config))
        .await?;
    output::progress(&format!("  redeployed {}", service.label));
    Ok(())
}
