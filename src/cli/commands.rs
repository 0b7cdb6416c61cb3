use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::error::CommandError;

/// Command names offered by tab completion and the help screen, in the
/// order they are documented.
pub const COMMAND_NAMES: &[&str] = &[
    "show_info",
    "set_token",
    "set_ssh_key",
    "set_region",
    "set_size",
    "set_image",
    "show_droplets",
    "set_droplet",
    "create_droplet",
    "destroy",
    "add_tag",
    "list_playbooks",
    "set_playbook",
    "run_playbook",
    "ssh",
    "help",
    "clear",
    "quit",
    "exit",
];

/// The closed set of console commands. Each input line is parsed into one
/// of these; `help`/`clear`/`quit`/`exit` are handled by the loop itself.
#[derive(Debug, PartialEq, Subcommand)]
pub enum ConsoleCommand {
    /// Show the current session configuration and selections
    #[command(name = "show_info")]
    ShowInfo,

    /// Replace the DigitalOcean API token
    #[command(name = "set_token")]
    SetToken { token: String },

    /// Replace the SSH private key path
    #[command(name = "set_ssh_key")]
    SetSshKey { key: PathBuf },

    /// Set the default region for new droplets
    #[command(name = "set_region")]
    SetRegion { region: String },

    /// Set the default size for new droplets
    #[command(name = "set_size")]
    SetSize { size: String },

    /// Set the default image for new droplets
    #[command(name = "set_image")]
    SetImage { image: String },

    /// Fetch and display the droplet listing
    #[command(name = "show_droplets")]
    ShowDroplets,

    /// Select the target droplet by its listing index
    #[command(name = "set_droplet")]
    SetDroplet { index: usize },

    /// Create a droplet with the session defaults and wait for it to become active
    #[command(name = "create_droplet")]
    CreateDroplet { name: String },

    /// Destroy the target droplet
    Destroy {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Attach a tag to the target droplet
    #[command(name = "add_tag")]
    AddTag { tag: String },

    /// List the playbooks in the configured directory
    #[command(name = "list_playbooks")]
    ListPlaybooks,

    /// Select the active playbook by its listing index
    #[command(name = "set_playbook")]
    SetPlaybook { index: usize },

    /// Run the active playbook (or an explicit path) against the target droplet
    #[command(name = "run_playbook")]
    RunPlaybook { playbook: Option<PathBuf> },

    /// Open an interactive SSH session to the target droplet
    Ssh,
}

#[derive(Debug, Parser)]
struct ConsoleCli {
    #[command(subcommand)]
    command: ConsoleCommand,
}

/// Parse one console input line. Unknown commands and bad arguments come
/// back as a usage error carrying clap's hint text.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let mut argv = vec!["docon"];
    argv.extend(line.split_whitespace());

    ConsoleCli::try_parse_from(argv)
        .map(|cli| cli.command)
        .map_err(|e| CommandError::Usage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(
            parse_command("show_droplets").unwrap(),
            ConsoleCommand::ShowDroplets
        );
        assert_eq!(parse_command("ssh").unwrap(), ConsoleCommand::Ssh);
    }

    #[test]
    fn test_parse_indexed_commands() {
        assert_eq!(
            parse_command("set_droplet 2").unwrap(),
            ConsoleCommand::SetDroplet { index: 2 }
        );
        assert!(parse_command("set_droplet two").is_err());
        assert!(parse_command("set_droplet").is_err());
    }

    #[test]
    fn test_parse_create_droplet_requires_name() {
        assert_eq!(
            parse_command("create_droplet worker-1").unwrap(),
            ConsoleCommand::CreateDroplet {
                name: "worker-1".to_string()
            }
        );
        assert!(parse_command("create_droplet").is_err());
    }

    #[test]
    fn test_parse_destroy_force_flag() {
        assert_eq!(
            parse_command("destroy").unwrap(),
            ConsoleCommand::Destroy { force: false }
        );
        assert_eq!(
            parse_command("destroy --force").unwrap(),
            ConsoleCommand::Destroy { force: true }
        );
    }

    #[test]
    fn test_parse_run_playbook_optional_path() {
        assert_eq!(
            parse_command("run_playbook").unwrap(),
            ConsoleCommand::RunPlaybook { playbook: None }
        );
        assert_eq!(
            parse_command("run_playbook extra/setup.yml").unwrap(),
            ConsoleCommand::RunPlaybook {
                playbook: Some(PathBuf::from("extra/setup.yml"))
            }
        );
    }

    #[test]
    fn test_parse_unknown_command_reports_usage() {
        let err = parse_command("teleport").unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }
}
