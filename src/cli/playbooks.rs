use std::path::{Path, PathBuf};

use colored::Colorize;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};

use super::console::Console;
use super::error::CommandError;
use super::session::Session;
use super::ui;
use crate::playbook;
use crate::runner::{ssh, AnsibleRunner};

#[derive(Tabled)]
struct PlaybookRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Playbook")]
    name: String,
}

/// Everything a playbook run needs, resolved from the session before any
/// subprocess is spawned.
#[derive(Debug)]
pub(super) struct PlaybookInvocation {
    pub host: String,
    pub key: PathBuf,
    pub playbook: PathBuf,
}

/// Resolve the target address, key and playbook for `run_playbook`. An
/// explicit path overrides the selected playbook; missing requirements are
/// user errors and nothing external gets invoked.
pub(super) fn playbook_invocation(
    session: &Session,
    overridden: Option<PathBuf>,
) -> Result<PlaybookInvocation, CommandError> {
    let droplet = session
        .selected_droplet()
        .ok_or(CommandError::NoDropletSelected)?;
    let host = droplet
        .public_ipv4()
        .ok_or_else(|| CommandError::NoPublicAddress {
            name: droplet.name.clone(),
        })?
        .to_string();

    let playbook = match overridden {
        Some(path) => path,
        None => session
            .selected_playbook()
            .ok_or(CommandError::NoPlaybookSelected)?
            .to_path_buf(),
    };

    Ok(PlaybookInvocation {
        host,
        key: session.ssh_key().to_path_buf(),
        playbook,
    })
}

/// Resolve the target address for `ssh`, same guard discipline as above.
pub(super) fn ssh_invocation(session: &Session) -> Result<(String, PathBuf), CommandError> {
    let droplet = session
        .selected_droplet()
        .ok_or(CommandError::NoDropletSelected)?;
    let host = droplet
        .public_ipv4()
        .ok_or_else(|| CommandError::NoPublicAddress {
            name: droplet.name.clone(),
        })?
        .to_string();

    Ok((host, session.ssh_key().to_path_buf()))
}

impl Console {
    /// List the playbook files and cache them for index-based selection.
    pub(super) async fn cmd_list_playbooks(&mut self) -> Result<(), CommandError> {
        let playbooks = playbook::list_playbooks(self.session.playbooks_dir()).await?;
        self.session.set_playbooks(playbooks);
        print_playbook_table(self.session.playbooks());
        Ok(())
    }

    pub(super) fn cmd_set_playbook(&mut self, index: usize) -> Result<(), CommandError> {
        let playbook = self.session.select_playbook(index)?;
        println!(
            "Active playbook set to: {}",
            ui::format_highlight(&file_name(playbook))
        );
        Ok(())
    }

    /// Run the active playbook (or an explicit path) against the target
    /// droplet, streaming the runner's output until it exits.
    pub(super) async fn cmd_run_playbook(
        &mut self,
        overridden: Option<PathBuf>,
    ) -> Result<(), CommandError> {
        let invocation = playbook_invocation(&self.session, overridden)?;
        if !invocation.playbook.exists() {
            return Err(CommandError::PlaybookNotFound(invocation.playbook));
        }

        let runner = AnsibleRunner::detect().await?;
        println!(
            "Running {} against {}...",
            ui::format_highlight(&invocation.playbook.display().to_string()),
            ui::format_highlight(&invocation.host)
        );

        runner
            .run(&invocation.host, &invocation.key, &invocation.playbook)
            .await?;

        println!(
            "{}",
            ui::format_success(&format!(
                "Playbook {} finished successfully.",
                file_name(&invocation.playbook)
            ))
        );
        Ok(())
    }

    /// Hand the terminal to an interactive SSH session on the target
    /// droplet until the remote shell exits.
    pub(super) async fn cmd_ssh(&mut self) -> Result<(), CommandError> {
        let (host, key) = ssh_invocation(&self.session)?;

        println!("Connecting to {}...", ui::format_highlight(&host));
        let status = ssh::open_session(&host, "root", &key).await?;

        if !status.success() {
            println!(
                "{}",
                ui::format_warning(&format!("SSH session ended with {}", status))
            );
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_playbook_table(playbooks: &[PathBuf]) {
    if playbooks.is_empty() {
        println!("{}", ui::format_warning("(no playbooks)"));
        return;
    }

    let rows: Vec<PlaybookRow> = playbooks
        .iter()
        .enumerate()
        .map(|(index, path)| PlaybookRow {
            index,
            name: file_name(path),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::ProvisionDefaults;
    use crate::provider::types::{Droplet, Networks, NetworkV4, Region};

    fn droplet(id: u64, name: &str, public_ip: Option<&str>) -> Droplet {
        let v4 = public_ip
            .map(|ip| {
                vec![NetworkV4 {
                    ip_address: ip.to_string(),
                    kind: "public".to_string(),
                }]
            })
            .unwrap_or_default();

        Droplet {
            id,
            name: name.to_string(),
            status: "active".to_string(),
            created_at: "2020-07-21T18:37:44Z".to_string(),
            memory: 1024,
            vcpus: 1,
            disk: 25,
            tags: Vec::new(),
            networks: Networks { v4 },
            region: Region {
                slug: "nyc1".to_string(),
                name: String::new(),
            },
            size_slug: "s-1vcpu-1gb".to_string(),
        }
    }

    fn session() -> Session {
        Session::new(
            "dop_v1_token".to_string(),
            PathBuf::from("/home/user/.ssh/id_rsa"),
            PathBuf::from("playbooks"),
            ProvisionDefaults::default(),
        )
    }

    #[test]
    fn test_invocation_requires_selected_droplet() {
        let session = session();

        let result = playbook_invocation(&session, Some(PathBuf::from("setup.yml")));
        assert!(matches!(result, Err(CommandError::NoDropletSelected)));

        let result = ssh_invocation(&session);
        assert!(matches!(result, Err(CommandError::NoDropletSelected)));
    }

    #[test]
    fn test_invocation_requires_public_address() {
        let mut session = session();
        session.set_droplets(vec![droplet(1, "fresh", None)]);
        session.select_droplet(0).unwrap();

        let result = playbook_invocation(&session, Some(PathBuf::from("setup.yml")));
        assert!(matches!(
            result,
            Err(CommandError::NoPublicAddress { .. })
        ));
    }

    #[test]
    fn test_invocation_requires_selected_playbook() {
        let mut session = session();
        session.set_droplets(vec![droplet(1, "web", Some("104.236.32.182"))]);
        session.select_droplet(0).unwrap();

        let result = playbook_invocation(&session, None);
        assert!(matches!(result, Err(CommandError::NoPlaybookSelected)));
    }

    #[test]
    fn test_invocation_uses_selected_playbook_and_session_key() {
        let mut session = session();
        session.set_droplets(vec![droplet(1, "web", Some("104.236.32.182"))]);
        session.select_droplet(0).unwrap();
        session.set_playbooks(vec![PathBuf::from("playbooks/webserver.yml")]);
        session.select_playbook(0).unwrap();

        let invocation = playbook_invocation(&session, None).unwrap();
        assert_eq!(invocation.host, "104.236.32.182");
        assert_eq!(invocation.key, PathBuf::from("/home/user/.ssh/id_rsa"));
        assert_eq!(invocation.playbook, PathBuf::from("playbooks/webserver.yml"));
    }

    #[test]
    fn test_invocation_explicit_path_overrides_selection() {
        let mut session = session();
        session.set_droplets(vec![droplet(1, "web", Some("104.236.32.182"))]);
        session.select_droplet(0).unwrap();
        session.set_playbooks(vec![PathBuf::from("playbooks/webserver.yml")]);
        session.select_playbook(0).unwrap();

        let invocation =
            playbook_invocation(&session, Some(PathBuf::from("extra/database.yml"))).unwrap();
        assert_eq!(invocation.playbook, PathBuf::from("extra/database.yml"));
    }
}
