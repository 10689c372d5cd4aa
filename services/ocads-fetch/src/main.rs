//! OCADS median-file retrieval CLI.
//!
//! Downloads (or reuses cached) ensemble-median files for every requested
//! variable × scenario pair and prints a summary of each extracted array.

mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ocads_client::{ClientConfig, OcadsClient};
use ocads_common::{Request, Scenario, Variable};

#[derive(Parser, Debug)]
#[command(name = "ocads-fetch")]
#[command(about = "Retrieve OCADS ocean-chemistry median files by variable and scenario")]
struct Args {
    /// Variable to retrieve (repeatable)
    #[arg(short, long = "variable", required_unless_present = "list")]
    variables: Vec<String>,

    /// Scenario to retrieve (repeatable)
    #[arg(short, long = "scenario", required_unless_present = "list")]
    scenarios: Vec<String>,

    /// Print the available variables and scenarios and exit
    #[arg(long)]
    list: bool,

    /// Cache directory for downloaded files
    #[arg(long, env = "OCADS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Longest wait for data in seconds (headers, then each body chunk)
    #[arg(long, env = "OCADS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Archive directory URL
    #[arg(long, env = "OCADS_BASE_URL")]
    base_url: Option<String>,

    /// Mirror URL used after a read timeout
    #[arg(long, env = "OCADS_MIRROR_URL")]
    mirror_url: Option<String>,

    /// Print summaries as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(url) = &self.mirror_url {
            config = config.with_mirror_url(url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        println!("variables: {}", Variable::names().join(", "));
        println!("scenarios: {}", Scenario::names().join(", "));
        return Ok(());
    }

    let request = Request::parse(args.variables.clone(), args.scenarios.clone())?;
    let config = args.client_config();

    info!(
        pairs = request.len(),
        cache_dir = %config.cache_dir.display(),
        "Retrieving median files"
    );

    let client = OcadsClient::new(config).context("Failed to create client")?;
    let data = client.download_request(&request).await?;

    for (variable, scenario, array) in data.iter() {
        let line = report::SummaryLine::new(variable, scenario, array);
        if args.json {
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
