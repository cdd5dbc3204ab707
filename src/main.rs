use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use amap_tools::config::AppConfig;
use amap_tools::serve::serve;
use amap_tools::service::AmapService;
use amap_tools::tools::create_default_router;

#[derive(Parser, Debug)]
#[command(name = "amap-tools", version, about = "AMap location services as agent tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every tool definition as JSON
    Tools,
    /// Run one tool and print its response envelope
    Call {
        /// Tool name, e.g. geocoding
        tool: String,
        /// Arguments as a JSON object
        args: Option<String>,
    },
    /// Answer line-delimited tool calls on stdin
    Serve,
}

/// Logs go to stderr; stdout carries results only.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Auto-generate config file on first run; reported once logging is up
    let created = AppConfig::ensure_default();

    let config = AppConfig::load()?;
    init_logging(&config.logging.level);
    match created {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "created default config"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %format!("{:#}", e), "could not create default config"),
    }

    let service = Arc::new(AmapService::from_config(config)?);
    let router = create_default_router(service);

    match cli.command {
        Command::Tools => {
            let definitions = router.definitions();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        Command::Call { tool, args } => {
            let envelope = router.execute(&tool, args.as_deref().unwrap_or("{}")).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::Serve => {
            tracing::info!(tools = router.len(), "serving on stdin");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            serve(&router, stdin, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}
