use std::path::PathBuf;

use thiserror::Error;

use super::session::SelectionError;
use crate::playbook::PlaybookError;
use crate::provider::ProviderError;
use crate::runner::RunnerError;

/// Fatal startup failures. Anything that happens after the prompt appears
/// is a `CommandError` and keeps the loop alive.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Console error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failures of a single console command. These are printed at the prompt
/// and never terminate the process.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("No droplet selected. Run 'show_droplets' and 'set_droplet <index>' first.")]
    NoDropletSelected,

    #[error("No playbook selected. Run 'list_playbooks' and 'set_playbook <index>' first.")]
    NoPlaybookSelected,

    #[error("Droplet '{name}' has no public IP address yet")]
    NoPublicAddress { name: String },

    #[error("Playbook not found: {0}")]
    PlaybookNotFound(PathBuf),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    Playbook(#[from] PlaybookError),

    #[error("{0}")]
    Runner(#[from] RunnerError),

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[from] dialoguer::Error),
}
