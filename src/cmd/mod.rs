pub mod chats;
pub mod download;
pub mod dump;
pub mod groups;
pub mod messages;
pub mod ping;
pub mod relations;

use crate::Cli;
use anyhow::Result;
use clap::Subcommand;
use gmhistory::error::GmErrorContext;
use gmhistory::{Client, HttpTransport, LogFacade, MediaRetriever};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List and show groups, remove members
    Groups {
        #[command(subcommand)]
        cmd: groups::GroupsCommand,
    },
    /// List direct conversations
    Chats {
        #[command(subcommand)]
        cmd: chats::ChatsCommand,
    },
    /// List relations (contacts)
    Relations,
    /// Load history after or before a message
    Messages {
        #[command(subcommand)]
        cmd: messages::MessagesCommand,
    },
    /// Download images, files and videos
    Download {
        #[command(subcommand)]
        cmd: download::DownloadCommand,
    },
    /// Check the connection to GroupMe
    Ping,
    /// Print recent history of the first few groups and DMs
    Dump(dump::DumpArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Groups { cmd } => groups::run(&cli, cmd).await,
        Command::Chats { cmd } => chats::run(&cli, cmd).await,
        Command::Relations => relations::run(&cli).await,
        Command::Messages { cmd } => messages::run(&cli, cmd).await,
        Command::Download { cmd } => download::run(&cli, cmd).await,
        Command::Ping => ping::run(&cli).await,
        Command::Dump(args) => dump::run(&cli, args).await,
    }
}

/// Build the API client and media retriever from CLI flags.
pub fn connect(cli: &Cli) -> Result<(Client, MediaRetriever)> {
    let config = cli.config()?;
    Client::<HttpTransport>::connect(config, LogFacade::shared()).context_client()
}
