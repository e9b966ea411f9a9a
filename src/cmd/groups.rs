use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::Subcommand;
use gmhistory::error::GmErrorContext;
use gmhistory::{Id, Transport};

#[derive(Subcommand, Debug, Clone)]
pub enum GroupsCommand {
    /// List groups (first page of 100)
    List,
    /// Show a single group with its members
    Show {
        /// Group ID
        #[arg(long)]
        id: String,
    },
    /// Remove a user from a group
    RemoveMember {
        /// Group ID
        #[arg(long)]
        group: String,
        /// User ID (not membership ID)
        #[arg(long)]
        user: String,
    },
}

pub async fn run(cli: &Cli, cmd: &GroupsCommand) -> Result<()> {
    let (client, _) = super::connect(cli)?;

    match cmd {
        GroupsCommand::List => {
            let groups = client.index_all_groups().await.context_groups()?;

            if cli.output.is_json() {
                out::write_json(&groups)?;
            } else if !cli.output.is_none() {
                println!("{:<14} {:<30} {:<8} {:<10} UPDATED", "ID", "NAME", "MEMBERS", "MESSAGES");
                for g in &groups {
                    println!(
                        "{:<14} {:<30} {:<8} {:<10} {}",
                        g.id,
                        out::truncate(&g.name, 28),
                        g.members.len(),
                        g.messages.count,
                        g.updated_at.format("%Y-%m-%d %H:%M:%S"),
                    );
                }
            }
        }
        GroupsCommand::Show { id } => {
            let group = client
                .transport
                .show_group(&Id::new(id.as_str()))
                .await
                .context_groups()?;

            if cli.output.is_json() {
                out::write_json(&group)?;
            } else if !cli.output.is_none() {
                println!("ID: {}", group.id);
                println!("Name: {}", group.name);
                if !group.description.is_empty() {
                    println!("Description: {}", group.description);
                }
                if let Some(last) = &group.messages.last_message_id {
                    println!("Last message: {}", last);
                }
                println!("Members:");
                for m in &group.members {
                    println!("  {:<14} {:<14} {}", m.user_id, m.id, m.nickname);
                }
            }
        }
        GroupsCommand::RemoveMember { group, user } => {
            client
                .remove_from_group(&Id::new(user.as_str()), &Id::new(group.as_str()))
                .await
                .context_remove(user, group)?;
            if !cli.output.is_none() {
                eprintln!("Removed {} from {}", user, group);
            }
        }
    }
    Ok(())
}
