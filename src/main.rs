use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use roundtrip_arb::app::{self, AppCfg, EnvOverrides};
use roundtrip_arb::cli::Cli;
use roundtrip_arb::config::Config;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit here, before any network connection.
    let cli = Cli::parse();
    dotenv::dotenv().ok();
    init_tracing(cli.log_json);

    // Load base configuration from file if provided
    let file_cfg = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let app_cfg = AppCfg::resolve(&cli, file_cfg, &EnvOverrides::from_env())?;
    app::run(app_cfg).await
}
