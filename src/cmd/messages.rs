use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::{Args, Subcommand};
use gmhistory::error::GmErrorContext;
use gmhistory::{Conversation, Id};

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Group ID
    #[arg(long)]
    group: Option<String>,
    /// Other user's ID, for a direct conversation
    #[arg(long)]
    dm: Option<String>,
}

impl Target {
    fn conversation(&self) -> Result<Conversation> {
        match (&self.group, &self.dm) {
            (Some(group), _) => Ok(Conversation::Group(Id::new(group.as_str()))),
            (None, Some(user)) => Ok(Conversation::Direct(Id::new(user.as_str()))),
            (None, None) => anyhow::bail!("Pass --group or --dm"),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MessagesCommand {
    /// Messages newer than a message, oldest first
    After {
        #[command(flatten)]
        target: Target,
        /// Reference message ID
        #[arg(long)]
        cursor: String,
    },
    /// Messages older than a message
    Before {
        #[command(flatten)]
        target: Target,
        /// Reference message ID
        #[arg(long)]
        cursor: String,
    },
}

pub async fn run(cli: &Cli, cmd: &MessagesCommand) -> Result<()> {
    let (client, _) = super::connect(cli)?;

    let msgs = match cmd {
        MessagesCommand::After { target, cursor } => {
            let conversation = target.conversation()?;
            client
                .load_messages_after(&conversation, &Id::new(cursor.as_str()))
                .await
                .context_messages(&conversation)?
        }
        MessagesCommand::Before { target, cursor } => {
            let conversation = target.conversation()?;
            client
                .load_messages_before(&conversation, &Id::new(cursor.as_str()))
                .await
                .context_messages(&conversation)?
        }
    };

    out::print_messages(cli.output, &msgs)?;
    if msgs.is_empty() && !cli.output.is_none() && !cli.output.is_json() {
        eprintln!("No more history in this direction.");
    }
    Ok(())
}
