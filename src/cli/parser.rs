use clap::{ArgAction, Parser};
use std::path::PathBuf;

const VERSION_INFO: &str = env!("DOCON_BUILD_VERSION");

#[derive(Parser, Debug)]
#[command(name = "docon")]
#[command(about = "Interactive DigitalOcean droplet console", long_about = None, version = VERSION_INFO)]
pub struct Cli {
    /// DigitalOcean API token (falls back to the DO_API_TOKEN environment variable)
    #[arg(short = 't', long = "token", env = "DO_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the SSH private key for droplet access (defaults to ~/.ssh/id_rsa)
    #[arg(short = 'k', long = "key")]
    pub key: Option<PathBuf>,

    /// Directory containing Ansible playbooks
    #[arg(long = "playbooks")]
    pub playbooks: Option<PathBuf>,

    /// Default region slug for new droplets
    #[arg(long, default_value = "nyc1")]
    pub region: String,

    /// Default size slug for new droplets
    #[arg(long, default_value = "s-1vcpu-1gb")]
    pub size: String,

    /// Default image identifier for new droplets
    #[arg(long, default_value = "ubuntu-20-04-x64")]
    pub image: String,

    /// List droplets and playbooks before entering the console
    #[arg(long)]
    pub init: bool,

    /// Increase message verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
