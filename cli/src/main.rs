//! Shunter - Entry Point
//!
//! Deployment orchestrator for Railway-hosted services: points every
//! configured service at a new container image and redeploys them,
//! optionally rolling a canary service first.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use shunter::api::client::HttpTransport;
use shunter::api::fake::RecordingTransport;
use shunter::config::DeployConfig;
use shunter::deploy::{run_deploy, DeployOutcome};
use shunter::errors::DeployError;
use shunter::logs::init_logging;
use shunter::output;
use shunter::services::ServiceSet;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        println!(
            "shunter {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            option_env!("GIT_HASH").unwrap_or("unknown"),
            option_env!("BUILD_TIME").unwrap_or("unknown"),
        );
        return ExitCode::SUCCESS;
    }

    match run(&cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli_args: &HashMap<String, String>) -> Result<(), DeployError> {
    let config = DeployConfig::from_env(cli_args)?;

    if let Err(e) = init_logging(config.debug) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let services = ServiceSet::parse(&config.services_input)?;

    let outcome: DeployOutcome = if config.dry_run {
        output::progress("Dry-run mode: no requests will reach the Railway API");
        let transport = RecordingTransport::echoing();
        run_deploy(&config, &services, &transport).await?
    } else {
        let transport = HttpTransport::new(&config)?;
        run_deploy(&config, &services, &transport).await?
    };

    output::write_outputs(&outcome)?;
    Ok(())
}
