use super::{Client, GROUP_PAGE_SIZE};
use crate::api::{DirectMessagesQuery, MessagesQuery, Transport};
use crate::error::Result;
use crate::types::{Conversation, Cursor, Id, Message};

impl<T: Transport> Client<T> {
    /// Messages newer than `last_message_id`, oldest first.
    ///
    /// Empty means there is nothing newer. Group pages are capped at
    /// [`GROUP_PAGE_SIZE`]; direct pages use the server's default size.
    pub async fn load_messages_after(
        &self,
        conversation: &Conversation,
        last_message_id: &Id,
    ) -> Result<Vec<Message>> {
        match conversation {
            Conversation::Direct(other_user) => {
                let query = DirectMessagesQuery {
                    cursor: Some(Cursor::Since(last_message_id.clone())),
                };
                let page = self
                    .transport
                    .index_direct_messages(other_user, &query)
                    .await?;
                // since_id pages arrive newest first
                let mut messages = page.messages;
                messages.reverse();
                self.log.debug(&format!(
                    "Loaded {} messages after {} in {}",
                    messages.len(),
                    last_message_id,
                    conversation
                ));
                Ok(messages)
            }
            Conversation::Group(group_id) => {
                let query = MessagesQuery {
                    cursor: Some(Cursor::After(last_message_id.clone())),
                    limit: Some(GROUP_PAGE_SIZE),
                };
                let page = self.transport.index_messages(group_id, &query).await?;
                self.log.debug(&format!(
                    "Loaded {} messages after {} in {}",
                    page.messages.len(),
                    last_message_id,
                    conversation
                ));
                Ok(page.messages)
            }
        }
    }

    /// Messages older than `last_message_id`, returned in the order the
    /// endpoint produced them.
    pub async fn load_messages_before(
        &self,
        conversation: &Conversation,
        last_message_id: &Id,
    ) -> Result<Vec<Message>> {
        let cursor = Some(Cursor::Before(last_message_id.clone()));
        let page = match conversation {
            Conversation::Direct(other_user) => {
                self.transport
                    .index_direct_messages(other_user, &DirectMessagesQuery { cursor })
                    .await?
            }
            Conversation::Group(group_id) => {
                let query = MessagesQuery {
                    cursor,
                    limit: Some(GROUP_PAGE_SIZE),
                };
                self.transport.index_messages(group_id, &query).await?
            }
        };
        self.log.debug(&format!(
            "Loaded {} messages before {} in {}",
            page.messages.len(),
            last_message_id,
            conversation
        ));
        Ok(page.messages)
    }
}
