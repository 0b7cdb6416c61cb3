use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("'ansible-playbook' could not be found or executed. Install Ansible and make sure it is on PATH.")]
    AnsibleNotFound,

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Playbook run failed with exit code {code}")]
    PlaybookFailed { code: i32 },

    #[error("Process terminated by signal")]
    Terminated,
}

// Type alias for Result with RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
