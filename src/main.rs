use anyhow::{bail, Context};
use chorus::config::Config;
use chorus::plugins::{registry, Params};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// Exit status when the caller's action or parameters are rejected
const EXIT_BAD_INPUT: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "chorus", about = "Run automation plugin actions")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print a plugin's metadata and action schemas as JSON
    Describe { plugin: String },
    /// Execute a plugin action and print its outputs as JSON
    Run {
        plugin: String,
        action: String,
        /// Action parameters as a JSON object
        #[arg(short, long, conflicts_with = "params_file")]
        params: Option<String>,
        /// File containing the action parameters as a JSON object
        #[arg(long)]
        params_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    chorus::logging::init(&config)?;
    registry::initialise_plugin_registry(&config)?;
    tracing::info!("Starting chorus '{}'", config.host.id);

    match cli.cmd {
        Cmd::Describe { plugin } => {
            let plugin = registry::resolve_plugin(&plugin)?;
            let description = serde_json::json!({
                "metadata": plugin.metadata(),
                "actions": plugin.actions(),
            });
            println!("{}", serde_json::to_string_pretty(&description)?);
            Ok(())
        }
        Cmd::Run {
            plugin,
            action,
            params,
            params_file,
        } => {
            let text = match (params, params_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading params from {}", path.display()))?,
                (None, None) => "{}".to_string(),
            };
            let params: Params = match serde_json::from_str(&text)? {
                Value::Object(map) => map,
                _ => bail!("action parameters must be a JSON object"),
            };

            let output = match chorus::run_action(&plugin, &action, &params).await {
                Ok(output) => output,
                Err(e) if e.is_input_error() => {
                    eprintln!("error: {}", e);
                    std::process::exit(EXIT_BAD_INPUT);
                }
                Err(e) => return Err(e.into()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}
