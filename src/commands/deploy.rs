// ABOUTME: Deploy command implementation.
// ABOUTME: Loads config, runs the deployment, and reports the result.

use marathon_deploy::config::Config;
use marathon_deploy::deploy::{self, DeployOptions};
use marathon_deploy::error::Result;
use marathon_deploy::output::Output;
use std::env;
use std::path::Path;

/// Deploy one app definition and report the outcome.
pub async fn deploy(
    options: DeployOptions,
    config_path: Option<&Path>,
    mut output: Output,
) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    output.start_timer();
    let summary = deploy::run(&options, &config, &output).await?;
    output.summary(&summary);
    Ok(())
}
