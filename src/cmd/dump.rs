use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::Args;
use gmhistory::api::{DirectMessagesQuery, MessagesQuery};
use gmhistory::error::GmErrorContext;
use gmhistory::{Conversation, Message, Transport};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// How many groups and how many DMs to walk
    #[arg(long, default_value = "5")]
    pub count: usize,
    /// Messages to show per group
    #[arg(long, default_value = "10")]
    pub limit: u32,
}

#[derive(Serialize)]
struct Dumped {
    conversation: Conversation,
    name: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Walks the most recent conversations without any cursor, the same way a
/// first sync would see them.
pub async fn run(cli: &Cli, args: &DumpArgs) -> Result<()> {
    let (client, _) = super::connect(cli)?;
    let text = !cli.output.is_json() && !cli.output.is_none();
    let mut dumped = Vec::new();

    let groups = client.index_all_groups().await.context_groups()?;
    if text {
        println!("Found {} groups. Processing...", groups.len());
    }
    for (i, group) in groups.iter().take(args.count).enumerate() {
        if text {
            println!(
                "Processing Group {}/{}: {} (ID: {})",
                i + 1,
                groups.len().min(args.count),
                group.name,
                group.id
            );
        }
        let query = MessagesQuery {
            cursor: None,
            limit: Some(args.limit),
        };
        let result = client.transport.index_messages(&group.id, &query).await;
        dumped.push(entry(
            Conversation::Group(group.id.clone()),
            &group.name,
            result.map(|p| p.messages),
            text,
        ));
    }

    if text {
        println!("------------------------------------------------");
    }
    match client.index_all_chats().await {
        Ok(chats) => {
            if text {
                println!("Found {} DMs. Processing...", chats.len());
            }
            for (i, chat) in chats.iter().take(args.count).enumerate() {
                let other = &chat.other_user;
                if text {
                    println!(
                        "Processing DM {}/{}: With {} (ID: {})",
                        i + 1,
                        chats.len().min(args.count),
                        other.name,
                        other.id
                    );
                }
                let result = client
                    .transport
                    .index_direct_messages(&other.id, &DirectMessagesQuery::default())
                    .await;
                dumped.push(entry(
                    Conversation::Direct(other.id.clone()),
                    &other.name,
                    result.map(|p| p.messages),
                    text,
                ));
            }
        }
        Err(e) if text => println!("Failed to fetch DMs: {}", e),
        Err(_) => {}
    }

    if cli.output.is_json() {
        out::write_json(&dumped)?;
    } else if text {
        println!("Done.");
    }
    Ok(())
}

fn entry(
    conversation: Conversation,
    name: &str,
    result: gmhistory::Result<Vec<Message>>,
    text: bool,
) -> Dumped {
    match result {
        Ok(messages) => {
            if text {
                println!("  Fetched {} messages:", messages.len());
                for m in &messages {
                    println!("    - [{}] {}: {}", m.id, m.name, out::message_line(m, 50));
                }
            }
            Dumped {
                conversation,
                name: name.to_string(),
                messages,
                error: None,
            }
        }
        Err(e) => {
            if text {
                println!("  Failed to fetch messages for {}: {}", name, e);
            }
            Dumped {
                conversation,
                name: name.to_string(),
                messages: vec![],
                error: Some(e.to_string()),
            }
        }
    }
}
