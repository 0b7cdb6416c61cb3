use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::error::{RunnerError, RunnerResult};

const ANSIBLE_PLAYBOOK: &str = "ansible-playbook";

/// Runs Ansible playbooks against a single remote host.
pub struct AnsibleRunner;

impl AnsibleRunner {
    /// Probe for a working `ansible-playbook` on PATH by running its
    /// version command. Errors if the binary is missing or broken.
    pub async fn detect() -> RunnerResult<Self> {
        let output = Command::new(ANSIBLE_PLAYBOOK)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                debug!("Error executing '{} --version': {}", ANSIBLE_PLAYBOOK, e);
                RunnerError::AnsibleNotFound
            })?;

        if !output.status.success() {
            debug!(
                "'{} --version' failed: {}",
                ANSIBLE_PLAYBOOK,
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(RunnerError::AnsibleNotFound);
        }

        let first_line = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        debug!("Detected {}", first_line);

        Ok(Self)
    }

    /// Run a playbook against `host` as root, streaming the runner's
    /// output to the controlling terminal until it exits.
    pub async fn run(&self, host: &str, key: &Path, playbook: &Path) -> RunnerResult<()> {
        let args = playbook_args(host, key, playbook);
        debug!("Running: {} {}", ANSIBLE_PLAYBOOK, args.join(" "));

        let status = Command::new(ANSIBLE_PLAYBOOK)
            .args(&args)
            .status()
            .await
            .map_err(|e| RunnerError::Spawn {
                command: ANSIBLE_PLAYBOOK.to_string(),
                source: e,
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(RunnerError::PlaybookFailed { code }),
            None => Err(RunnerError::Terminated),
        }
    }
}

/// Argument list for a single-host playbook run. The trailing comma in the
/// inventory tells Ansible the value is a host list, not a file path.
pub fn playbook_args(host: &str, key: &Path, playbook: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        format!("{},", host),
        "-u".to_string(),
        "root".to_string(),
        "--private-key".to_string(),
        key.display().to_string(),
        playbook.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_playbook_args_inventory_has_trailing_comma() {
        let key = PathBuf::from("/home/user/.ssh/id_rsa");
        let playbook = PathBuf::from("playbooks/webserver.yml");

        let args = playbook_args("104.236.32.182", &key, &playbook);

        assert_eq!(
            args,
            vec![
                "-i",
                "104.236.32.182,",
                "-u",
                "root",
                "--private-key",
                "/home/user/.ssh/id_rsa",
                "playbooks/webserver.yml",
            ]
        );
    }
}
