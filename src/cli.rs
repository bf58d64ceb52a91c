// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Single flat command; boolean switches take yes/no values.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marathon-deploy")]
#[command(about = "Blue-green and rolling deployments to Marathon")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON or YAML app definition
    #[arg(short = 'a', long = "app-definition", value_name = "PATH")]
    pub app_definition: PathBuf,

    /// Marathon base URL, e.g. http://marathon.mesos:8080
    #[arg(short = 'm', long = "marathon-url", value_name = "URL")]
    pub marathon_url: String,

    /// Access token sent as `Authorization: token=<TOKEN>`
    #[arg(short = 'c', long, value_name = "TOKEN", env = "MARATHON_DEPLOY_CREDENTIAL")]
    pub credential: String,

    /// Target instance count (defaults to the running app's count)
    #[arg(short = 'i', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub instances: Option<u32>,

    /// Bring new instances up before scaling old ones down (yes/no)
    #[arg(
        short = 'z',
        long = "zero-down",
        value_name = "yes|no",
        default_value = "yes",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub zero_down: bool,

    /// Redeploy in place if the app id already exists (yes/no)
    #[arg(
        short = 'f',
        long,
        value_name = "yes|no",
        default_value = "no",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub force: bool,

    /// Config file (defaults to marathon-deploy.yml in the working directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long)]
    pub quiet: bool,

    /// JSON lines output
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,
}
