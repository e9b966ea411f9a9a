use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::Subcommand;
use gmhistory::error::GmErrorContext;

#[derive(Subcommand, Debug, Clone)]
pub enum ChatsCommand {
    /// List direct conversations (first page of 100)
    List,
}

pub async fn run(cli: &Cli, cmd: &ChatsCommand) -> Result<()> {
    let (client, _) = super::connect(cli)?;

    match cmd {
        ChatsCommand::List => {
            let chats = client.index_all_chats().await.context_chats()?;

            if cli.output.is_json() {
                out::write_json(&chats)?;
            } else if !cli.output.is_none() {
                println!("{:<14} {:<28} {:<10} {}", "USER", "NAME", "MESSAGES", "LAST MESSAGE");
                for c in &chats {
                    let last = c
                        .last_message
                        .as_ref()
                        .map(|m| out::message_line(m, 50))
                        .unwrap_or_default();
                    println!(
                        "{:<14} {:<28} {:<10} {}",
                        c.other_user.id,
                        out::truncate(&c.other_user.name, 26),
                        c.messages_count,
                        last,
                    );
                }
            }
        }
    }
    Ok(())
}
