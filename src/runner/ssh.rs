use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::debug;

use super::error::{RunnerError, RunnerResult};

const SSH: &str = "ssh";

/// Open an interactive SSH session to `user@host` with the given private
/// key. The subprocess inherits the controlling terminal; this returns
/// once the user's remote shell exits, with whatever status it produced.
pub async fn open_session(host: &str, user: &str, key: &Path) -> RunnerResult<ExitStatus> {
    let args = ssh_args(host, user, key);
    debug!("Running: {} {}", SSH, args.join(" "));

    let status = Command::new(SSH)
        .args(&args)
        .status()
        .await
        .map_err(|e| RunnerError::Spawn {
            command: SSH.to_string(),
            source: e,
        })?;

    Ok(status)
}

pub fn ssh_args(host: &str, user: &str, key: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        key.display().to_string(),
        format!("{}@{}", user, host),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ssh_args() {
        let key = PathBuf::from("/home/user/.ssh/id_ed25519");

        let args = ssh_args("104.236.32.182", "root", &key);

        assert_eq!(
            args,
            vec!["-i", "/home/user/.ssh/id_ed25519", "root@104.236.32.182"]
        );
    }
}
