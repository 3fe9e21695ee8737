//! Result reporting
//!
//! Progress lines and step outputs go to stdout; the error block and the
//! CI annotation go to stderr. Diagnostic traces live on a separate
//! channel entirely (see `logs`).

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::deploy::DeployOutcome;
use crate::errors::DeployError;

/// Print a human-readable progress line to stdout
pub fn progress(message: &str) {
    println!("{}", message);
}

/// Publish step outputs
///
/// Appends `name=value` lines to the file named by `GITHUB_OUTPUT` when
/// set, otherwise prints the pairs to stdout.
pub fn write_outputs(outcome: &DeployOutcome) -> Result<(), DeployError> {
    let pairs = [
        ("deployed-services", outcome.deployed.join(",")),
        ("image-tag", outcome.image.clone()),
    ];

    match env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => write_output_file(Path::new(&path), &pairs),
        _ => {
            for (name, value) in &pairs {
                println!("{}={}", name, value);
            }
            Ok(())
        }
    }
}

fn write_output_file(path: &Path, pairs: &[(&str, String)]) -> Result<(), DeployError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in pairs {
        writeln!(file, "{}={}", name, value)?;
    }
    Ok(())
}

/// Print the bordered error block and the CI annotation to stderr
pub fn print_error(err: &DeployError) {
    let border = "=".repeat(64);

    eprintln!("{}", border.red());
    eprintln!("{} {}", "Deployment failed:".red().bold(), err);
    if let Some(details) = err.details() {
        eprintln!("  {} {}", "details:".yellow(), details);
    }
    eprintln!("  {} {}", "hint:".cyan(), err.hint());
    eprintln!("{}", border.red());

    // Single-line annotation picked up by the CI log viewer
    eprintln!("::error::{}", err);
}
