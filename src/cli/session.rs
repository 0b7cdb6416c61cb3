use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::provider::Droplet;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error(
        "Invalid droplet index {index}: the last listing has {len} entries. Run 'show_droplets' to refresh."
    )]
    DropletOutOfRange { index: usize, len: usize },

    #[error(
        "Invalid playbook index {index}: the last listing has {len} entries. Run 'list_playbooks' to refresh."
    )]
    PlaybookOutOfRange { index: usize, len: usize },
}

/// Provisioning parameters applied to `create_droplet`. Free-form strings,
/// passed to the API verbatim.
#[derive(Debug, Clone)]
pub struct ProvisionDefaults {
    pub region: String,
    pub size: String,
    pub image: String,
}

impl Default for ProvisionDefaults {
    fn default() -> Self {
        Self {
            region: "nyc1".to_string(),
            size: "s-1vcpu-1gb".to_string(),
            image: "ubuntu-20-04-x64".to_string(),
        }
    }
}

/// The console's mutable state for the process lifetime: credentials,
/// provisioning defaults, and the cached droplet/playbook listings with
/// their selections. Selections are indices into the cached listings and
/// can go stale after a refresh; a stale index resolves to `None` instead
/// of pointing at the wrong entry.
pub struct Session {
    token: String,
    ssh_key: PathBuf,
    playbooks_dir: PathBuf,
    pub defaults: ProvisionDefaults,
    droplets: Vec<Droplet>,
    selected_droplet: Option<usize>,
    playbooks: Vec<PathBuf>,
    selected_playbook: Option<usize>,
}

impl Session {
    pub fn new(
        token: String,
        ssh_key: PathBuf,
        playbooks_dir: PathBuf,
        defaults: ProvisionDefaults,
    ) -> Self {
        Self {
            token,
            ssh_key,
            playbooks_dir,
            defaults,
            droplets: Vec::new(),
            selected_droplet: None,
            playbooks: Vec::new(),
            selected_playbook: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn set_token(&mut self, token: String) {
        self.token = token;
    }

    pub fn ssh_key(&self) -> &Path {
        &self.ssh_key
    }

    /// The key path is not checked for existence here; the file only has
    /// to exist once a playbook run or SSH session actually uses it.
    pub fn set_ssh_key(&mut self, key: PathBuf) {
        self.ssh_key = key;
    }

    pub fn playbooks_dir(&self) -> &Path {
        &self.playbooks_dir
    }

    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    /// Replace the cached droplet listing. The selection index is kept
    /// as-is; if it no longer fits the new listing it resolves to `None`.
    pub fn set_droplets(&mut self, droplets: Vec<Droplet>) {
        self.droplets = droplets;
    }

    pub fn select_droplet(&mut self, index: usize) -> Result<&Droplet, SelectionError> {
        if index >= self.droplets.len() {
            return Err(SelectionError::DropletOutOfRange {
                index,
                len: self.droplets.len(),
            });
        }
        self.selected_droplet = Some(index);
        Ok(&self.droplets[index])
    }

    pub fn selected_droplet(&self) -> Option<&Droplet> {
        self.selected_droplet.and_then(|i| self.droplets.get(i))
    }

    pub fn clear_droplet_selection(&mut self) {
        self.selected_droplet = None;
    }

    pub fn playbooks(&self) -> &[PathBuf] {
        &self.playbooks
    }

    pub fn set_playbooks(&mut self, playbooks: Vec<PathBuf>) {
        self.playbooks = playbooks;
    }

    pub fn select_playbook(&mut self, index: usize) -> Result<&Path, SelectionError> {
        if index >= self.playbooks.len() {
            return Err(SelectionError::PlaybookOutOfRange {
                index,
                len: self.playbooks.len(),
            });
        }
        self.selected_playbook = Some(index);
        Ok(&self.playbooks[index])
    }

    pub fn selected_playbook(&self) -> Option<&Path> {
        self.selected_playbook
            .and_then(|i| self.playbooks.get(i))
            .map(|p| p.as_path())
    }
}
