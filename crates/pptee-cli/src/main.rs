use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pptee_application::AppContext;
use pptee_infrastructure::{ConfigService, PpteePaths};

mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "pptee")]
#[command(about = "PP-TEE - privacy-preserving LLM inference over device and cloud TEEs (simulated)", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (defaults to $PPTEE_HOME, then the user config directory)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Skip all simulated delays
    #[arg(long, global = true)]
    fast: bool,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (any non-empty credentials are accepted)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and discard stored capability results
    Logout,
    /// Show the session phase and stored capabilities
    Status,
    /// Check whether a screen is reachable from the current session
    Screen {
        /// login, home, dashboard, setup, models, inference, security, history or settings
        name: String,
    },
    /// Probe TEE support on the device or the cloud
    CheckCapability {
        /// device or cloud
        target: String,
    },
    /// Provision the device and cloud TEE environments
    Setup,
    /// List models and whether they are unlocked
    Models,
    /// Run a private inference
    Infer {
        #[arg(long)]
        model: String,
        #[arg(long)]
        query: String,
    },
    /// Show the conversation with a model
    Messages {
        #[arg(long)]
        model: String,
    },
    /// Browse inference history
    History {
        /// Case-insensitive text to look for in queries
        #[arg(long)]
        search: Option<String>,
        /// success, failed or processing
        #[arg(long)]
        status: Option<String>,
        /// Model display name, e.g. GPT-4
        #[arg(long)]
        model: Option<String>,
    },
    /// Usage overview
    Dashboard,
    /// Encryption facts, data flow and TEE status
    Security,
    /// View or change platform settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print every setting
    Show,
    /// Change one setting by dotted key, e.g. `inference.temperature 0.5`
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let paths = PpteePaths::resolve(cli.home)?;
    paths
        .ensure_dirs()
        .with_context(|| format!("Failed to create {}", paths.root().display()))?;

    let mut config = ConfigService::new(paths.config_file())
        .get_config()
        .context("Failed to load configuration")?;
    if cli.fast {
        config.simulation.time_scale = 0.0;
    }

    let _log_guard = logging::init(&paths, &config.logging, cli.verbose)?;
    tracing::debug!("Starting pptee with root {}", paths.root().display());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let ctx = AppContext::bootstrap(&paths, Some(config), Some(tx)).await?;

    commands::dispatch(&ctx, &mut rx, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_settings() {
        let cli = Cli::try_parse_from(["pptee", "--fast", "settings", "set", "rag.top_k", "5"]).unwrap();
        assert!(cli.fast);
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: SettingsAction::Set { .. }
            }
        ));
    }
}
