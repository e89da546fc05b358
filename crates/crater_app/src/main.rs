mod platform;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "crater",
    about = "Create content from your knowledge base and upload new documents to it"
)]
struct Cli {
    /// RON settings file [default: ./crater.ron when present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend root URL
    #[arg(long, env = "CRATER_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token of the signed-in session
    #[arg(long, env = "CRATER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    platform::logging::initialize(cli.log, level);

    let settings = platform::config::resolve(cli.config.as_deref(), cli.base_url, cli.token)
        .context("loading settings")?;
    platform::app::run_app(settings)
}
