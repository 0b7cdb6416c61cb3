use std::time::Duration;

use colored::Colorize;
use dialoguer::Confirm;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};
use tracing::debug;

use super::console::Console;
use super::error::CommandError;
use super::ui;
use crate::provider::{CreateDropletRequest, Droplet};

/// How long `create_droplet` waits for the new droplet to become active.
const CREATE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Tabled)]
struct DropletRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Public IP")]
    public_ip: String,
    #[tabled(rename = "Created at")]
    created_at: String,
}

impl Console {
    /// Fetch the droplet listing, cache it for index-based selection, and
    /// render it in provider-assigned order.
    pub(super) async fn cmd_show_droplets(&mut self) -> Result<(), CommandError> {
        let droplets = self.client.list_droplets().await?;
        self.session.set_droplets(droplets);
        print_droplet_table(self.session.droplets());
        Ok(())
    }

    pub(super) fn cmd_set_droplet(&mut self, index: usize) -> Result<(), CommandError> {
        let droplet = self.session.select_droplet(index)?;
        let name = droplet.name.clone();
        let address = droplet
            .public_ipv4()
            .unwrap_or("no public IP")
            .to_string();

        println!(
            "Target droplet set: {} ({})",
            ui::format_highlight(&name),
            address
        );
        Ok(())
    }

    /// Create a droplet with the session defaults and every SSH key on the
    /// account, then block until it is active or the timeout elapses.
    pub(super) async fn cmd_create_droplet(&mut self, name: String) -> Result<(), CommandError> {
        let keys = self.client.list_ssh_keys().await?;
        if keys.is_empty() {
            println!(
                "{}",
                ui::format_warning(
                    "No SSH keys registered on the account; the droplet password will be emailed."
                )
            );
        }

        let request = CreateDropletRequest {
            name: name.clone(),
            region: self.session.defaults.region.clone(),
            size: self.session.defaults.size.clone(),
            image: self.session.defaults.image.clone(),
            ssh_keys: keys.iter().map(|k| k.id).collect(),
            backups: false,
            tags: Vec::new(),
        };

        let droplet = self.client.create_droplet(&request).await?;
        println!(
            "Creating droplet {}. This may take a few minutes.",
            ui::format_highlight(&name)
        );

        let pb = ui::create_spinner("Waiting for droplet to become active...");
        let waited = self.client.wait_for_active(droplet.id, CREATE_TIMEOUT).await;
        match &waited {
            Ok(_) => pb.finish_with_message("Droplet is active."),
            Err(_) => pb.finish_and_clear(),
        }

        // Refresh the cached listing so selection indices include the new
        // droplet, whatever the wait outcome was.
        match self.client.list_droplets().await {
            Ok(droplets) => self.session.set_droplets(droplets),
            Err(e) => debug!("Failed to refresh droplet listing: {}", e),
        }

        let active = waited?;
        println!(
            "{}",
            ui::format_success("Droplet has been created successfully!")
        );
        println!(
            "ID: {}\nName: {}\nStatus: {}\nPublic IP: {}\nCreated at: {}",
            active.id,
            active.name,
            active.status,
            active.public_ipv4().unwrap_or("-"),
            active.created_at,
        );
        Ok(())
    }

    /// Destroy the target droplet after confirmation, then refresh the
    /// listing and drop the selection.
    pub(super) async fn cmd_destroy(&mut self, force: bool) -> Result<(), CommandError> {
        let droplet = self
            .session
            .selected_droplet()
            .ok_or(CommandError::NoDropletSelected)?;
        let id = droplet.id;
        let name = droplet.name.clone();

        if !force {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Are you sure you want to destroy droplet {}?",
                    ui::format_highlight(&name)
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Droplet destruction cancelled.");
                return Ok(());
            }
        }

        self.client.delete_droplet(id).await?;
        println!(
            "{}",
            ui::format_success(&format!("Droplet {} has been destroyed.", name))
        );

        self.session.clear_droplet_selection();
        match self.client.list_droplets().await {
            Ok(droplets) => self.session.set_droplets(droplets),
            Err(e) => debug!("Failed to refresh droplet listing: {}", e),
        }
        Ok(())
    }

    /// Attach a tag to the target droplet, creating the tag first if the
    /// account has never used it.
    pub(super) async fn cmd_add_tag(&mut self, tag: String) -> Result<(), CommandError> {
        let droplet = self
            .session
            .selected_droplet()
            .ok_or(CommandError::NoDropletSelected)?;
        let id = droplet.id;
        let name = droplet.name.clone();

        self.client.create_tag(&tag).await?;
        self.client.tag_droplet(&tag, id).await?;

        println!(
            "Tag {} added to droplet {}.",
            ui::format_highlight(&tag),
            ui::format_highlight(&name)
        );
        Ok(())
    }
}

fn print_droplet_table(droplets: &[Droplet]) {
    if droplets.is_empty() {
        println!("{}", ui::format_warning("(no droplets)"));
        return;
    }

    let rows: Vec<DropletRow> = droplets
        .iter()
        .enumerate()
        .map(|(index, droplet)| DropletRow {
            index,
            id: droplet.id,
            name: droplet.name.clone(),
            status: droplet.status.clone(),
            public_ip: droplet.public_ipv4().unwrap_or("-").to_string(),
            created_at: droplet.created_at.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_GREEN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    println!("{}", table);
}
