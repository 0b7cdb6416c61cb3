use std::path::PathBuf;

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::Editor;
use tracing::debug;

use super::commands::{parse_command, ConsoleCommand, COMMAND_NAMES};
use super::error::{CliError, CommandError};
use super::session::Session;
use super::ui;
use crate::provider::DropletClient;

/// The interactive console: session state plus the API client built from
/// the session token.
pub struct Console {
    pub(super) session: Session,
    pub(super) client: DropletClient,
}

struct ConsoleHelper {
    completer: FilenameCompleter,
    commands: Vec<String>,
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // First try command completion
        let words: Vec<&str> = line.split_whitespace().collect();

        if words.is_empty() || (words.len() == 1 && !line.ends_with(' ')) {
            let prefix = words.first().copied().unwrap_or("");
            let matches: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();

            if !matches.is_empty() {
                return Ok((0, matches));
            }
        }

        // Fall back to filename completion (useful for run_playbook paths)
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for ConsoleHelper {}
impl Hinter for ConsoleHelper {
    type Hint = String;
}
impl Validator for ConsoleHelper {}
impl rustyline::Helper for ConsoleHelper {}

impl Console {
    pub fn new(session: Session) -> Self {
        let client = DropletClient::new(session.token());
        Self { session, client }
    }

    /// Eagerly fetch droplets and playbooks before the first prompt
    /// (`--init`). Failures here are reported but never fatal.
    pub async fn initialize(&mut self) {
        println!("\n{}", ui::format_header("DigitalOcean Console"));
        println!("{}\n", "-".repeat(31));

        if let Err(e) = self.cmd_show_droplets().await {
            print_command_error(&e);
        }
        println!();
        if let Err(e) = self.cmd_list_playbooks().await {
            print_command_error(&e);
        }
        println!();
    }

    pub async fn run(&mut self) -> Result<(), CliError> {
        let helper = ConsoleHelper {
            completer: FilenameCompleter::new(),
            commands: COMMAND_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let history_path = history_path();
        if let Some(parent) = history_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let mut rl: Editor<ConsoleHelper, FileHistory> = Editor::new()?;
        rl.set_helper(Some(helper));

        if rl.load_history(&history_path).is_err() {
            debug!("No previous console history found");
        }

        println!("Type 'help' for available commands, 'quit' to exit.");

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line)?;

                    match line {
                        "quit" | "exit" => break,
                        "clear" => {
                            print!("\x1B[2J\x1B[1;1H");
                        }
                        "help" => print_console_help(),
                        _ => match parse_command(line) {
                            Ok(command) => {
                                if let Err(e) = self.dispatch(command).await {
                                    print_command_error(&e);
                                }
                            }
                            Err(e) => print_command_error(&e),
                        },
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'quit' to exit");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    rl.save_history(&history_path).ok();
                    return Err(err.into());
                }
            }
        }

        rl.save_history(&history_path).ok();
        Ok(())
    }

    fn prompt(&self) -> String {
        match self.session.selected_droplet() {
            Some(droplet) => format!(
                "{} {}> ",
                "docon".green().bold(),
                droplet.name.as_str().cyan()
            ),
            None => format!("{}> ", "docon".green().bold()),
        }
    }

    async fn dispatch(&mut self, command: ConsoleCommand) -> Result<(), CommandError> {
        match command {
            ConsoleCommand::ShowInfo => self.cmd_show_info(),
            ConsoleCommand::SetToken { token } => self.cmd_set_token(token),
            ConsoleCommand::SetSshKey { key } => self.cmd_set_ssh_key(key),
            ConsoleCommand::SetRegion { region } => self.cmd_set_region(region),
            ConsoleCommand::SetSize { size } => self.cmd_set_size(size),
            ConsoleCommand::SetImage { image } => self.cmd_set_image(image),
            ConsoleCommand::ShowDroplets => self.cmd_show_droplets().await,
            ConsoleCommand::SetDroplet { index } => self.cmd_set_droplet(index),
            ConsoleCommand::CreateDroplet { name } => self.cmd_create_droplet(name).await,
            ConsoleCommand::Destroy { force } => self.cmd_destroy(force).await,
            ConsoleCommand::AddTag { tag } => self.cmd_add_tag(tag).await,
            ConsoleCommand::ListPlaybooks => self.cmd_list_playbooks().await,
            ConsoleCommand::SetPlaybook { index } => self.cmd_set_playbook(index),
            ConsoleCommand::RunPlaybook { playbook } => self.cmd_run_playbook(playbook).await,
            ConsoleCommand::Ssh => self.cmd_ssh().await,
        }
    }

    fn cmd_show_info(&self) -> Result<(), CommandError> {
        println!("\n{}", ui::format_header("DigitalOcean Console"));
        println!("{}", "-".repeat(31));
        println!("API token: {}", ui::mask_secret(self.session.token()));
        println!("SSH key: {}", self.session.ssh_key().display());
        println!(
            "Playbooks directory: {}",
            self.session.playbooks_dir().display()
        );
        println!(
            "Defaults: region={} size={} image={}",
            ui::format_highlight(&self.session.defaults.region),
            ui::format_highlight(&self.session.defaults.size),
            ui::format_highlight(&self.session.defaults.image),
        );

        match self.session.selected_droplet() {
            Some(droplet) => println!(
                "Target droplet: ID: {}, Name: {} ({})",
                droplet.id,
                ui::format_highlight(&droplet.name),
                droplet.public_ipv4().unwrap_or("no public IP"),
            ),
            None => println!("Target droplet: (none)"),
        }

        match self.session.selected_playbook() {
            Some(playbook) => println!(
                "Active playbook: {}",
                ui::format_highlight(&playbook.display().to_string())
            ),
            None => println!("Active playbook: (none)"),
        }
        println!();
        Ok(())
    }

    fn cmd_set_token(&mut self, token: String) -> Result<(), CommandError> {
        self.session.set_token(token);
        // The client carries the token, so a new one is needed
        self.client = DropletClient::new(self.session.token());
        println!("API token set successfully.");
        Ok(())
    }

    fn cmd_set_ssh_key(&mut self, key: PathBuf) -> Result<(), CommandError> {
        self.session.set_ssh_key(key);
        println!("SSH key set: {}", self.session.ssh_key().display());
        Ok(())
    }

    fn cmd_set_region(&mut self, region: String) -> Result<(), CommandError> {
        self.session.defaults.region = region;
        println!(
            "Default region set: {}",
            ui::format_highlight(&self.session.defaults.region)
        );
        Ok(())
    }

    fn cmd_set_size(&mut self, size: String) -> Result<(), CommandError> {
        self.session.defaults.size = size;
        println!(
            "Default size set: {}",
            ui::format_highlight(&self.session.defaults.size)
        );
        Ok(())
    }

    fn cmd_set_image(&mut self, image: String) -> Result<(), CommandError> {
        self.session.defaults.image = image;
        println!(
            "Default image set: {}",
            ui::format_highlight(&self.session.defaults.image)
        );
        Ok(())
    }
}

fn history_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("docon").join("history.txt"))
        .unwrap_or_else(|| PathBuf::from(".docon_history"))
}

fn print_command_error(err: &CommandError) {
    eprintln!("{}: {}", "Error".red().bold(), err);
}

fn print_console_help() {
    println!("\n{}", ui::format_header("DigitalOcean Console"));
    println!();
    println!("{}", "Session:".bold());
    println!("  show_info               Show the current configuration and selections");
    println!("  set_token <token>       Replace the API token");
    println!("  set_ssh_key <path>      Replace the SSH private key path");
    println!("  set_region <slug>       Default region for new droplets");
    println!("  set_size <slug>         Default size for new droplets");
    println!("  set_image <id>          Default image for new droplets");
    println!();
    println!("{}", "Droplets:".bold());
    println!("  show_droplets           Fetch and display the droplet listing");
    println!("  set_droplet <index>     Select the target droplet");
    println!("  create_droplet <name>   Create a droplet and wait for it to become active");
    println!("  destroy [--force]       Destroy the target droplet");
    println!("  add_tag <tag>           Attach a tag to the target droplet");
    println!();
    println!("{}", "Playbooks:".bold());
    println!("  list_playbooks          List playbooks in the configured directory");
    println!("  set_playbook <index>    Select the active playbook");
    println!("  run_playbook [path]     Run the active playbook against the target droplet");
    println!();
    println!("{}", "Other:".bold());
    println!("  ssh                     Open an interactive SSH session to the target droplet");
    println!("  clear                   Clear the screen");
    println!("  help                    Show this help message");
    println!("  quit, exit              Leave the console");
    println!();
}
