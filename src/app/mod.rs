pub mod history;
pub mod index;

use crate::api::{HttpTransport, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::logger::Logger;
use crate::media::MediaRetriever;
use std::sync::Arc;

/// History page size for groups. Matches what the direct-message endpoint
/// returns by default so both kinds come back in similar batches.
pub const GROUP_PAGE_SIZE: u32 = 20;

/// Page size for the bulk index helpers. Results past this are not fetched.
pub const INDEX_PAGE_SIZE: u32 = 100;

/// Entry point for history and index calls.
///
/// Holds no mutable state; share it behind an `Arc` or clone the transport.
pub struct Client<T = HttpTransport> {
    pub transport: T,
    log: Arc<dyn Logger>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, log: Arc<dyn Logger>) -> Self {
        Self { transport, log }
    }
}

impl Client<HttpTransport> {
    /// Connect to the real API. Returns the client plus a media retriever
    /// sharing the same HTTP connection pool.
    pub fn connect(config: Config, log: Arc<dyn Logger>) -> Result<(Self, MediaRetriever)> {
        let http = config.http_client()?;
        let media = MediaRetriever::with_client(&config, http.clone(), Arc::clone(&log));
        let transport = HttpTransport::with_client(config, http);
        Ok((Self::new(transport, log), media))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::api::{
        ChatsQuery, DirectMessagesQuery, GroupsQuery, MessagePage, MessagesQuery, Transport,
    };
    use crate::error::{Error, Result};
    use crate::types::{Chat, Cursor, Group, Id, Me, Message, User};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// A recorded transport call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Groups(Option<u32>),
        Chats(Option<u32>),
        Relations,
        ShowGroup(Id),
        RemoveMember(Id, Id),
        Messages(Id, Option<Cursor>, Option<u32>),
        Direct(Id, Option<Cursor>),
        Me,
    }

    /// Canned answers, in the order the "server" would return them.
    #[derive(Default)]
    pub struct StubTransport {
        pub groups: Vec<Group>,
        pub chats: Vec<Chat>,
        pub relations: Vec<User>,
        pub group: Option<Group>,
        pub messages: Vec<Message>,
        pub direct: Vec<Message>,
        pub fail_with: Option<u16>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl StubTransport {
        pub fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with {
                Some(status) => Err(Error::Api {
                    status,
                    message: "stub failure".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn index_groups(&self, query: &GroupsQuery) -> Result<Vec<Group>> {
            self.record(Call::Groups(query.per_page))?;
            Ok(self.groups.clone())
        }

        async fn index_chats(&self, query: &ChatsQuery) -> Result<Vec<Chat>> {
            self.record(Call::Chats(query.per_page))?;
            Ok(self.chats.clone())
        }

        async fn index_relations(&self) -> Result<Vec<User>> {
            self.record(Call::Relations)?;
            Ok(self.relations.clone())
        }

        async fn show_group(&self, group_id: &Id) -> Result<Group> {
            self.record(Call::ShowGroup(group_id.clone()))?;
            self.group.clone().ok_or(Error::Api {
                status: 404,
                message: "not found".to_string(),
            })
        }

        async fn remove_member(&self, group_id: &Id, membership_id: &Id) -> Result<()> {
            self.record(Call::RemoveMember(group_id.clone(), membership_id.clone()))
        }

        async fn index_messages(&self, group_id: &Id, query: &MessagesQuery) -> Result<MessagePage> {
            self.record(Call::Messages(
                group_id.clone(),
                query.cursor.clone(),
                query.limit,
            ))?;
            Ok(MessagePage {
                count: self.messages.len() as u64,
                messages: self.messages.clone(),
            })
        }

        async fn index_direct_messages(
            &self,
            other_user_id: &Id,
            query: &DirectMessagesQuery,
        ) -> Result<MessagePage> {
            self.record(Call::Direct(other_user_id.clone(), query.cursor.clone()))?;
            Ok(MessagePage {
                count: self.direct.len() as u64,
                messages: self.direct.clone(),
            })
        }

        async fn my_user(&self) -> Result<Me> {
            self.record(Call::Me)?;
            Ok(Me {
                id: "1".into(),
                user_id: "1".into(),
                name: "Me".to_string(),
                email: String::new(),
            })
        }
    }

    pub fn message(id: u64) -> Message {
        Message {
            id: Id::from(id),
            source_guid: format!("guid-{}", id),
            created_at: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
            user_id: "1".into(),
            group_id: None,
            recipient_id: None,
            conversation_id: None,
            name: "Alice".to_string(),
            avatar_url: String::new(),
            text: format!("message {}", id),
            system: false,
            favorited_by: vec![],
            attachments: vec![],
        }
    }

    pub fn messages(ids: &[u64]) -> Vec<Message> {
        ids.iter().copied().map(message).collect()
    }

    pub fn ids(messages: &[Message]) -> Vec<u64> {
        messages
            .iter()
            .map(|m| m.id.as_str().parse().unwrap())
            .collect()
    }
}
