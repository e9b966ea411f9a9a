//! GroupMe message history and media retrieval.
//!
//! Groups and direct conversations are paged differently by the remote API
//! and come back in different orders. [`Client`] hides that: both
//! [`Client::load_messages_after`] and [`Client::load_messages_before`]
//! return messages oldest first for either kind of [`Conversation`].
//! [`MediaRetriever`] downloads images, attached files and videos.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod media;
pub mod types;

pub use api::{HttpTransport, Transport};
pub use app::{Client, GROUP_PAGE_SIZE, INDEX_PAGE_SIZE};
pub use config::Config;
pub use error::{Error, Result};
pub use logger::{LogFacade, Logger};
pub use media::{FileFetch, MediaRetriever};
pub use types::{
    Attachment, Chat, Conversation, Cursor, FileMetadata, Group, Id, Message, RetrievedFile,
    RetrievedMedia, User,
};
