pub mod client;
pub mod error;
pub mod types;

pub use client::DropletClient;
pub use error::{ProviderError, ProviderResult};
pub use types::{CreateDropletRequest, Droplet, SshKey};
