//! Error types for the adapter, plus context wrappers for the CLI.
//!
//! Library calls return the typed [`Error`]. The CLI converts them into
//! `anyhow` errors with a human-readable line of context through
//! [`GmErrorContext`].

use crate::types::{Conversation, Id};
use anyhow::Context;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, request or body-read failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The JSON API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The file metadata lookup returned no records; the file is gone.
    #[error("no file data found for {file_id}")]
    EmptyMetadata { file_id: String },

    /// Video download answered with something other than 200.
    #[error("failed to download video: status {0}")]
    UnexpectedStatus(u16),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("user {user_id} is not a member of group {group_id}")]
    MemberNotFound { user_id: Id, group_id: Id },
}

impl Error {
    /// Status code carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::UnexpectedStatus(status) => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Extension trait to add GroupMe-specific context to errors.
pub trait GmErrorContext<T> {
    /// Add context for reading the access token.
    fn context_token(self) -> anyhow::Result<T>;

    /// Add context for building the HTTP client.
    fn context_client(self) -> anyhow::Result<T>;

    /// Add context for listing groups.
    fn context_groups(self) -> anyhow::Result<T>;

    /// Add context for listing direct conversations.
    fn context_chats(self) -> anyhow::Result<T>;

    /// Add context for listing relations.
    fn context_relations(self) -> anyhow::Result<T>;

    /// Add context for loading history.
    fn context_messages(self, conversation: &Conversation) -> anyhow::Result<T>;

    /// Add context for downloading media.
    fn context_download(self, what: &str) -> anyhow::Result<T>;

    /// Add context for removing a member.
    fn context_remove(self, user_id: &str, group_id: &str) -> anyhow::Result<T>;

    /// Add context for the ping call.
    fn context_ping(self) -> anyhow::Result<T>;

    /// Add context for writing output to disk.
    fn context_write(self, path: &str) -> anyhow::Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> GmErrorContext<T>
    for std::result::Result<T, E>
{
    fn context_token(self) -> anyhow::Result<T> {
        self.context("Failed to read access token")
    }

    fn context_client(self) -> anyhow::Result<T> {
        self.context("Failed to build HTTP client")
    }

    fn context_groups(self) -> anyhow::Result<T> {
        self.context("Failed to fetch groups from GroupMe")
    }

    fn context_chats(self) -> anyhow::Result<T> {
        self.context("Failed to fetch direct conversations from GroupMe")
    }

    fn context_relations(self) -> anyhow::Result<T> {
        self.context("Failed to fetch relations from GroupMe")
    }

    fn context_messages(self, conversation: &Conversation) -> anyhow::Result<T> {
        self.with_context(|| format!("Failed to fetch messages from {}", conversation))
    }

    fn context_download(self, what: &str) -> anyhow::Result<T> {
        self.with_context(|| format!("Failed to download {}", what))
    }

    fn context_remove(self, user_id: &str, group_id: &str) -> anyhow::Result<T> {
        self.with_context(|| {
            format!(
                "Failed to remove user {} from group {}. You may not have permission.",
                user_id, group_id
            )
        })
    }

    fn context_ping(self) -> anyhow::Result<T> {
        self.context("Ping failed. Check your token and internet connection.")
    }

    fn context_write(self, path: &str) -> anyhow::Result<T> {
        self.with_context(|| format!("Failed to write {}", path))
    }
}
