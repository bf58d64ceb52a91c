// ABOUTME: Entry point for the marathon-deploy CLI application.
// ABOUTME: Parses arguments, sets up logging, and runs the deploy command.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use marathon_deploy::deploy::{DeployOptions, RolloutOptions};
use marathon_deploy::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    // RUST_LOG wins; otherwise follow the output mode.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match (cli.verbose, mode) {
            (true, _) => "marathon_deploy=debug",
            (false, OutputMode::Normal) => "marathon_deploy=info",
            (false, _) => "warn",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let options = DeployOptions {
        definition: cli.app_definition,
        url: cli.marathon_url,
        credential: cli.credential,
        rollout: RolloutOptions {
            instances: cli.instances,
            zero_downtime: cli.zero_down,
            force: cli.force,
        },
    };

    let output = Output::new(mode);
    let error_output = Output::new(mode);
    if let Err(e) = commands::deploy(options, cli.config.as_deref(), output).await {
        error_output.error(&e.to_string());
        std::process::exit(1);
    }
}
