//! Transport contract for the GroupMe REST API.
//!
//! The history and indexing code only depends on [`Transport`]; the real
//! implementation is [`http::HttpTransport`], tests plug in stubs.

pub mod http;

use crate::error::Result;
use crate::types::{Chat, Cursor, Group, Id, Me, Message, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpTransport;

#[derive(Debug, Clone, Default)]
pub struct GroupsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Comma separated fields to leave out, e.g. `memberships`.
    pub omit: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MessagesQuery {
    pub cursor: Option<Cursor>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DirectMessagesQuery {
    pub cursor: Option<Cursor>,
}

/// One page of a message listing, in the order the server produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub count: u64,
    #[serde(default, alias = "direct_messages")]
    pub messages: Vec<Message>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn index_groups(&self, query: &GroupsQuery) -> Result<Vec<Group>>;

    async fn index_chats(&self, query: &ChatsQuery) -> Result<Vec<Chat>>;

    async fn index_relations(&self) -> Result<Vec<User>>;

    async fn show_group(&self, group_id: &Id) -> Result<Group>;

    async fn remove_member(&self, group_id: &Id, membership_id: &Id) -> Result<()>;

    /// Group history. Ordering is whatever the endpoint returns.
    async fn index_messages(&self, group_id: &Id, query: &MessagesQuery) -> Result<MessagePage>;

    /// Direct-conversation history with `other_user_id`. `since_id` pages
    /// come back newest first.
    async fn index_direct_messages(
        &self,
        other_user_id: &Id,
        query: &DirectMessagesQuery,
    ) -> Result<MessagePage>;

    async fn my_user(&self) -> Result<Me>;
}
