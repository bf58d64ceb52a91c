// ABOUTME: Entry points that drive a deployment through every state.
// ABOUTME: `deploy` works against any control plane; `run` wires up Marathon.

use std::path::PathBuf;

use crate::config::Config;
use crate::control_plane::{ControlPlane, MarathonClient};
use crate::definition::AppDefinition;
use crate::error::Result;
use crate::output::Output;

use super::clock::{Clock, TokioClock};
use super::deployment::{Deployment, RolloutOptions};
use super::error::DeployError;
use super::transitions::DeploymentSummary;

/// Everything a single invocation needs besides the config file.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub definition: PathBuf,
    pub url: String,
    pub credential: String,
    pub rollout: RolloutOptions,
}

/// Deploy `definition` and retire the running apps of its service.
///
/// # Errors
///
/// Returns the first error of any step. A creation conflict without force
/// leaves the control plane untouched.
pub async fn deploy<C, K>(
    control_plane: &C,
    clock: &K,
    definition: AppDefinition,
    options: RolloutOptions,
    config: &Config,
    output: &Output,
) -> std::result::Result<DeploymentSummary, DeployError>
where
    C: ControlPlane + ?Sized,
    K: Clock + ?Sized,
{
    let deployment = Deployment::new(definition, options);

    output.progress(&format!("  → Creating {}...", deployment.app_id()));
    let deployment = deployment.create(control_plane, clock, config).await?;
    if deployment.redeployed() {
        output.warning(&format!(
            "{} already existed and was redeployed in place",
            deployment.app_id()
        ));
    }

    output.progress(&format!(
        "  → Looking for running {} apps...",
        deployment.service_name()
    ));
    let deployment = deployment.discover(control_plane).await?;
    for app in deployment.existing() {
        output.progress(&format!("    {} ({} instances)", app.id, app.instances));
    }

    let deployment = deployment.plan(config.default_instances);
    output.progress(&format!(
        "  → Rolling out {} instance(s) ({})...",
        deployment.plan().target,
        deployment.plan().strategy_name()
    ));
    let deployment = deployment.execute(control_plane, clock, config).await?;

    Ok(deployment.finish())
}

/// Deploy against the Marathon instance named in `options`.
///
/// # Errors
///
/// Fails on an invalid URL or definition before anything is sent, and
/// otherwise with whatever `deploy` returns.
pub async fn run(
    options: &DeployOptions,
    config: &Config,
    output: &Output,
) -> Result<DeploymentSummary> {
    let client = MarathonClient::connect(&options.url, &options.credential)?;
    let definition = AppDefinition::load(&options.definition)?;

    output.progress(&format!(
        "Deploying {} to {}",
        definition.id(),
        client.base_url()
    ));

    let summary = deploy(
        &client,
        &TokioClock,
        definition,
        options.rollout,
        config,
        output,
    )
    .await?;
    Ok(summary)
}
