mod commands;
mod console;
mod droplets;
mod error;
pub mod parser;
mod playbooks;
mod session;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use console::Console;
use error::CliError;
use parser::Cli;
use session::{ProvisionDefaults, Session};

// Helper function to parse args
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Build the session from the startup configuration and run the console loop
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let token = cli
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            CliError::ConfigError(
                "DigitalOcean API token not provided. Pass --token or set DO_API_TOKEN.".to_string(),
            )
        })?;

    let ssh_key = match cli.key.clone() {
        Some(key) => key,
        None => default_ssh_key()?,
    };

    let playbooks_dir = cli
        .playbooks
        .clone()
        .unwrap_or_else(|| PathBuf::from("playbooks"));

    let defaults = ProvisionDefaults {
        region: cli.region.clone(),
        size: cli.size.clone(),
        image: cli.image.clone(),
    };

    let session = Session::new(token, ssh_key, playbooks_dir, defaults);
    let mut console = Console::new(session);

    if cli.init {
        console.initialize().await;
    }

    console.run().await
}

fn default_ssh_key() -> Result<PathBuf, CliError> {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join("id_rsa"))
        .ok_or_else(|| {
            CliError::ConfigError(
                "Could not determine home directory for the default SSH key; pass --key."
                    .to_string(),
            )
        })
}
