use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PlaybookError {
    #[error("Playbooks directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read playbooks directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Type alias for Result with PlaybookError
pub type PlaybookResult<T> = Result<T, PlaybookError>;

/// List the Ansible playbook files (`*.yml` / `*.yaml`) in a directory,
/// sorted by file name so selection indices stay stable between listings.
pub async fn list_playbooks(dir: &Path) -> PlaybookResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PlaybookError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        PlaybookError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        }
    })?;

    let mut playbooks = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        PlaybookError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        }
    })? {
        let path = entry.path();
        if is_playbook_file(&path) {
            playbooks.push(path);
        }
    }

    playbooks.sort();
    debug!(
        "Found {} playbook(s) in {}",
        playbooks.len(),
        dir.display()
    );
    Ok(playbooks)
}

fn is_playbook_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_playbooks_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("webserver.yml"), "---\n").unwrap();
        fs::write(temp_dir.path().join("database.yaml"), "---\n").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not a playbook").unwrap();
        fs::create_dir(temp_dir.path().join("roles.yml")).unwrap();

        let playbooks = list_playbooks(temp_dir.path()).await.unwrap();

        let names: Vec<_> = playbooks
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["database.yaml", "webserver.yml"]);
    }

    #[tokio::test]
    async fn test_list_playbooks_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let playbooks = list_playbooks(temp_dir.path()).await.unwrap();
        assert!(playbooks.is_empty());
    }

    #[tokio::test]
    async fn test_list_playbooks_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = list_playbooks(&missing).await;
        assert!(matches!(result, Err(PlaybookError::DirectoryNotFound(_))));
    }
}
