//! Orchestration flow tests against the recording transport

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use shunter::api::fake::RecordingTransport;
use shunter::api::requests::GraphqlRequest;
use shunter::api::Transport;
use shunter::config::DeployConfig;
use shunter::deploy::run_deploy;
use shunter::errors::DeployError;
use shunter::services::ServiceSet;

fn make_config(services: &str, overrides: &[(&str, &str)]) -> DeployConfig {
    let mut inputs: HashMap<String, String> = HashMap::new();
    inputs.insert("railway-token".to_string(), "tok-test".to_string());
    inputs.insert("environment-id".to_string(), "env-1".to_string());
    inputs.insert("image".to_string(), "ghcr.io/acme/app:1.2.3".to_string());
    inputs.insert("services".to_string(), services.to_string());
    // Tests never wait for a canary unless they override this
    inputs.insert("wait-seconds".to_string(), "0".to_string());
    for (key, value) in overrides {
        inputs.insert((*key).to_string(), (*value).to_string());
    }
    DeployConfig::from_inputs(&inputs).unwrap()
}

#[tokio::test]
async fn test_single_service_issues_one_update_and_one_redeploy() {
    let config = make_config("api:svc-abc123", &[]);
    let services = ServiceSet::parse(&config.services_input).unwrap();
    let transport = RecordingTransport::new();

    let outcome = run_deploy(&config, &services, &transport).await.unwrap();

    assert_eq!(outcome.deployed, vec!["api"]);
    assert_eq!(outcome.image, "ghcr.io/acme/app:1.2.3");

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].operation, "serviceInstanceUpdate");
    assert_eq!(calls[0].variables["serviceId"], "svc-abc123");
    assert_eq!(calls[0].variables["input"]["source"]["image"], "ghcr.io/acme/app:1.2.3");
    assert_eq!(calls[1].operation, "serviceInstanceRedeploy");
    assert_eq!(calls[1].variables["serviceId"], "svc-abc123");
}

#[tokio::test]
async fn test_canary_flow_updates_all_then_sequences_redeploys() {
    let config = make_config(
        "web:svc-web\nworker:svc-worker\nclock:svc-clock",
        &[("first-service", "web")],
    );
    let services = ServiceSet::parse(&config.services_input).unwrap();
    let transport = RecordingTransport::new();

    let outcome = run_deploy(&config, &services, &transport).await.unwrap();

    // The canary label leads; the rest are present in some order
    assert_eq!(outcome.deployed.len(), 3);
    assert_eq!(outcome.deployed[0], "web");
    assert!(outcome.deployed.contains(&"worker".to_string()));
    assert!(outcome.deployed.contains(&"clock".to_string()));

    let calls = transport.calls();
    assert_eq!(calls.len(), 6);
    for call in &calls[..3] {
        assert_eq!(call.operation, "serviceInstanceUpdate");
    }
    assert_eq!(calls[3].operation, "serviceInstanceRedeploy");
    assert_eq!(calls[3].variables["serviceId"], "svc-web");
    for call in &calls[4..] {
        assert_eq!(call.operation, "serviceInstanceRedeploy");
        assert_ne!(call.variables["serviceId"], "svc-web");
    }
}

#[tokio::test]
async fn test_unknown_first_service_fails_before_any_call() {
    let config = make_config("web:svc-web\nworker:svc-worker", &[("first-service", "bogus")]);
    let services = ServiceSet::parse(&config.services_input).unwrap();
    let transport = RecordingTransport::new();

    let err = run_deploy(&config, &services, &transport).await.unwrap_err();

    match err {
        DeployError::UnknownFirstService { label, available } => {
            assert_eq!(label, "bogus");
            assert!(available.contains("web"));
            assert!(available.contains("worker"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.calls().is_empty());
}

#[test]
fn test_partial_registry_credentials_fail_before_any_network_setup() {
    let mut inputs: HashMap<String, String> = HashMap::new();
    inputs.insert("railway-token".to_string(), "tok-test".to_string());
    inputs.insert("environment-id".to_string(), "env-1".to_string());
    inputs.insert("image".to_string(), "ghcr.io/acme/app:1.2.3".to_string());
    inputs.insert("services".to_string(), "api:svc-1".to_string());
    inputs.insert("registry-username".to_string(), "robot".to_string());

    let err = DeployConfig::from_inputs(&inputs).unwrap_err();
    assert!(matches!(err, DeployError::PartialRegistryCredentials));
}

/// Transport that succeeds for a fixed number of calls, then answers 401
struct FailAfter {
    inner: RecordingTransport,
    fail_on: usize,
}

#[async_trait]
impl Transport for FailAfter {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, DeployError> {
        if self.inner.calls().len() >= self.fail_on {
            return Err(DeployError::Http {
                status: 401,
                body: "Unauthorized".to_string(),
            });
        }
        self.inner.execute(request).await
    }
}

#[tokio::test]
async fn test_http_401_terminates_the_run_immediately() {
    let config = make_config("web:svc-web\nworker:svc-worker\nclock:svc-clock", &[]);
    let services = ServiceSet::parse(&config.services_input).unwrap();
    let transport = FailAfter {
        inner: RecordingTransport::new(),
        fail_on: 2,
    };

    let err = run_deploy(&config, &services, &transport).await.unwrap_err();

    assert!(matches!(err, DeployError::Http { status: 401, .. }));

    // Only the two successful updates went through; no redeploy was issued
    let calls = transport.inner.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.operation, "serviceInstanceUpdate");
    }
}

#[tokio::test]
async fn test_failure_during_redeploy_stops_remaining_services() {
    let config = make_config("web:svc-web\nworker:svc-worker", &[("first-service", "web")]);
    let services = ServiceSet::parse(&config.services_input).unwrap();
    // Both updates succeed, the canary redeploy fails
    let transport = FailAfter {
        inner: RecordingTransport::new(),
        fail_on: 2,
    };

    let err = run_deploy(&config, &services, &transport).await.unwrap_err();
    assert!(matches!(err, DeployError::Http { status: 401, .. }));
    assert_eq!(transport.inner.calls().len(), 2);
}

#[tokio::test]
async fn test_dry_run_sequencing_matches_live_mode() {
    let services_input = "web:svc-web\nworker:svc-worker";
    let live = make_config(services_input, &[("first-service", "web")]);
    let dry = make_config(
        services_input,
        &[("first-service", "web"), ("dry-run", "true")],
    );
    let services = ServiceSet::parse(services_input).unwrap();

    let live_transport = RecordingTransport::new();
    let dry_transport = RecordingTransport::new();

    let live_outcome = run_deploy(&live, &services, &live_transport).await.unwrap();
    let dry_outcome = run_deploy(&dry, &services, &dry_transport).await.unwrap();

    assert_eq!(live_outcome, dry_outcome);

    let live_ops: Vec<String> = live_transport.calls().iter().map(|c| c.operation.clone()).collect();
    let dry_ops: Vec<String> = dry_transport.calls().iter().map(|c| c.operation.clone()).collect();
    assert_eq!(live_ops, dry_ops);
}

#[tokio::test]
async fn test_registry_credentials_travel_with_every_update() {
    let config = make_config(
        "web:svc-web\nworker:svc-worker",
        &[
            ("registry-username", "robot"),
            ("registry-password", "p@\"ss\\word"),
        ],
    );
    let services = ServiceSet::parse(&config.services_input).unwrap();
    let transport = RecordingTransport::new();

    run_deploy(&config, &services, &transport).await.unwrap();

    let calls = transport.calls();
    let updates: Vec<_> = calls
        .iter()
        .filter(|c| c.operation == "serviceInstanceUpdate")
        .collect();
    assert_eq!(updates.len(), 2);
    for call in updates {
        assert_eq!(
            call.variables["input"]["registryCredentials"]["password"],
            "p@\"ss\\word"
        );
    }
}
