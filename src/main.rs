use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use neural_limiter::config::{LoggingSettings, NeuralConfig};
use neural_limiter::{watch_rules, LimiterConfig, LimiterRegistry, LimiterRules};

/// Validate and inspect limiter rule documents.
#[derive(Debug, Parser)]
#[command(name = "neural-limiter", version, about)]
struct Cli {
    /// Settings file (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a rule document and print a summary of every rule
    Check {
        /// Rule document; falls back to `rules.path` from the settings
        path: Option<String>,
    },
    /// Print the default limiter configuration
    Defaults,
    /// Reload a rule document periodically until Ctrl+C or SIGTERM
    Watch {
        /// Rule document; falls back to `rules.path` from the settings
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = NeuralConfig::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_tracing(&settings.logging);

    match cli.command {
        Command::Check { path } => {
            let path = rules_path(path, &settings)?;
            let rules = LimiterRules::from_file(&path)
                .with_context(|| format!("Invalid limiter rules in {}", path))?;

            let mut configs: Vec<&LimiterConfig> = rules.iter().map(|(_, c)| c).collect();
            configs.sort_by_key(|c| c.key());
            for config in configs {
                println!("{}", summarize(config));
            }
            info!(count = rules.len(), "Limiter rules are valid");
        }
        Command::Defaults => {
            print!("{}", serde_yaml::to_string(&LimiterConfig::default())?);
        }
        Command::Watch { path } => {
            let path = rules_path(path, &settings)?;
            let interval = Duration::from_secs(settings.rules.reload_interval_secs.max(1));
            let registry = LimiterRegistry::new();

            watch_rules(Path::new(&path), interval, &registry, shutdown_signal()).await;
        }
    }

    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping");
        }
    }
}

fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn rules_path(path: Option<String>, settings: &NeuralConfig) -> anyhow::Result<String> {
    path.or_else(|| settings.rules.path.clone())
        .context("No rule document given and `rules.path` is not set")
}

fn summarize(config: &LimiterConfig) -> String {
    let axes: Vec<&str> = config.enabled_axes().iter().map(|a| a.as_str()).collect();
    format!(
        "{} enabled={} strategy={} window={}ms rate={} max_concurrent={} max_permit_request={}/{}ms axes=[{}]",
        config.key(),
        config.enabled(),
        config.strategy(),
        config.window_ms(),
        config.rate(),
        config.max_concurrent(),
        config.max_permit_request(),
        config.request_interval_ms(),
        axes.join(",")
    )
}
